//! LTI 1.3 launch claims.
//!
//! Claim names are the IMS URIs carried in the platform's id_token.

use serde::{Deserialize, Serialize};

pub const MESSAGE_TYPE_CLAIM: &str = "https://purl.imsglobal.org/spec/lti/claim/message_type";
pub const VERSION_CLAIM: &str = "https://purl.imsglobal.org/spec/lti/claim/version";
pub const DEPLOYMENT_ID_CLAIM: &str = "https://purl.imsglobal.org/spec/lti/claim/deployment_id";
pub const CONTEXT_CLAIM: &str = "https://purl.imsglobal.org/spec/lti/claim/context";
pub const RESOURCE_LINK_CLAIM: &str = "https://purl.imsglobal.org/spec/lti/claim/resource_link";

pub const LTI_VERSION: &str = "1.3.0";
pub const RESOURCE_LINK_REQUEST: &str = "LtiResourceLinkRequest";

/// Course code used when the launch carries no context label.
pub const UNKNOWN_COURSE_CODE: &str = "UNKNOWN";

/// Display name used when the launch carries no `name` claim.
pub const DEFAULT_DISPLAY_NAME: &str = "Student";

/// Claims of a validated resource link launch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchClaims {
    pub iss: String,
    #[serde(default)]
    pub sub: Option<String>,
    pub nonce: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "https://purl.imsglobal.org/spec/lti/claim/message_type")]
    pub message_type: String,
    #[serde(rename = "https://purl.imsglobal.org/spec/lti/claim/version")]
    pub version: String,
    #[serde(rename = "https://purl.imsglobal.org/spec/lti/claim/deployment_id")]
    pub deployment_id: String,
    #[serde(rename = "https://purl.imsglobal.org/spec/lti/claim/context", default)]
    pub context: Option<ContextClaim>,
    #[serde(
        rename = "https://purl.imsglobal.org/spec/lti/claim/resource_link",
        default
    )]
    pub resource_link: Option<ResourceLinkClaim>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextClaim {
    #[serde(default)]
    pub id: Option<String>,
    /// Course code, for example `EDET100`.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLinkClaim {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl LaunchClaims {
    /// The user's display name, or "Student".
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_DISPLAY_NAME)
    }

    /// The course code from the context label, used verbatim, or "UNKNOWN".
    pub fn course_code(&self) -> &str {
        self.context
            .as_ref()
            .and_then(|context| context.label.as_deref())
            .unwrap_or(UNKNOWN_COURSE_CODE)
    }
}
