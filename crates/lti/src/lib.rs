//! # Handbook LTI
//!
//! LTI 1.3 tool support for the handbook service.
//!
//! Handles:
//! - Platform registrations read from a JSON tool configuration file
//! - OIDC third-party login initiation (state and nonce generation)
//! - Resource link launch validation (id_token signature, issuer, audience, nonce, deployment)
//!
//! Only resource link launches are supported. HTTP concerns live in `handbook-web`.

#![warn(rust_2018_idioms)]

pub mod claims;
pub mod keyset;
pub mod launch;
pub mod login;
pub mod settings;
pub mod storage;
pub mod tool_config;

pub use claims::{ContextClaim, LaunchClaims, ResourceLinkClaim};
pub use login::LoginRequest;
pub use settings::LtiSettings;
pub use storage::LaunchDataStorage;
pub use tool_config::{Registration, ToolConfig};

pub use jsonwebtoken::jwk::JwkSet;

use std::path::PathBuf;

/// Errors returned by the LTI layer.
#[derive(Debug, thiserror::Error)]
pub enum LtiError {
    #[error("failed to read tool configuration {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid tool configuration JSON: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("invalid tool configuration: {0}")]
    InvalidConfig(String),
    #[error("no registration for issuer {0}")]
    UnknownIssuer(String),
    #[error("invalid login request: {0}")]
    InvalidLogin(String),
    #[error("launch state not found or expired")]
    StateNotFound,
    #[error("invalid id_token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("unsupported id_token algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("no platform key matches kid {0:?}")]
    KeyNotFound(Option<String>),
    #[error("failed to fetch platform key set: {0}")]
    KeyFetch(#[from] reqwest::Error),
    #[error("id_token nonce does not match the login request")]
    NonceMismatch,
    #[error("invalid launch claim: {0}")]
    InvalidClaim(String),
}

pub type LtiResult<T> = std::result::Result<T, LtiError>;

/// The tool side of LTI 1.3: platform registrations, pending logins and the launch URL.
#[derive(Debug)]
pub struct LtiTool {
    config: ToolConfig,
    storage: LaunchDataStorage,
    launch_url: String,
}

impl LtiTool {
    pub fn new(config: ToolConfig, storage: LaunchDataStorage, launch_url: String) -> Self {
        Self {
            config,
            storage,
            launch_url,
        }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn launch_url(&self) -> &str {
        &self.launch_url
    }
}
