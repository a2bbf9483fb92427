//! OIDC third-party login initiation.
//!
//! The platform first sends the user to the tool's login URL. The tool answers with a redirect to
//! the platform's authorisation endpoint, carrying a fresh `state` and `nonce` that the launch
//! must echo back.

use crate::{LtiError, LtiResult, LtiTool};
use reqwest::Url;
use serde::Deserialize;
use uuid::Uuid;

/// Parameters of a login initiation request (query string or form body).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub iss: String,
    #[serde(default)]
    pub login_hint: String,
    #[serde(default)]
    pub target_link_uri: String,
    #[serde(default)]
    pub lti_message_hint: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub lti_deployment_id: Option<String>,
}

impl LtiTool {
    /// Build the authorisation redirect for a login initiation request.
    ///
    /// A new `state`/`nonce` pair is stored for the launch that follows.
    ///
    /// # Errors
    ///
    /// Returns `LtiError` if:
    /// - `iss`, `login_hint` or `target_link_uri` is missing,
    /// - the issuer has no registration,
    /// - the registration's `auth_login_url` is not a valid URL.
    pub fn login_redirect(&self, req: &LoginRequest) -> LtiResult<Url> {
        for (name, value) in [
            ("iss", &req.iss),
            ("login_hint", &req.login_hint),
            ("target_link_uri", &req.target_link_uri),
        ] {
            if value.trim().is_empty() {
                return Err(LtiError::InvalidLogin(format!("missing {name}")));
            }
        }

        let registration = self
            .config()
            .find_registration(&req.iss, req.client_id.as_deref())
            .ok_or_else(|| LtiError::UnknownIssuer(req.iss.clone()))?;

        let state = format!("state-{}", Uuid::new_v4().simple());
        let nonce = Uuid::new_v4().simple().to_string();

        let mut params = vec![
            ("scope", "openid"),
            ("response_type", "id_token"),
            ("response_mode", "form_post"),
            ("prompt", "none"),
            ("client_id", registration.client_id.as_str()),
            ("redirect_uri", self.launch_url()),
            ("login_hint", req.login_hint.as_str()),
            ("state", state.as_str()),
            ("nonce", nonce.as_str()),
        ];
        if let Some(hint) = req.lti_message_hint.as_deref() {
            params.push(("lti_message_hint", hint));
        }

        let url = Url::parse_with_params(&registration.auth_login_url, &params).map_err(|e| {
            LtiError::InvalidConfig(format!(
                "auth_login_url {:?} is not a valid URL: {e}",
                registration.auth_login_url
            ))
        })?;

        self.storage.save(state, nonce);
        tracing::info!(
            "OIDC login for {} (client {}) redirecting to platform",
            registration.issuer,
            registration.client_id
        );

        Ok(url)
    }
}
