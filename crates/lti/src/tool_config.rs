//! Platform registrations.
//!
//! The tool configuration is a JSON object keyed by platform issuer. Each value is a single
//! registration or a list of them (one per client id):
//!
//! ```json
//! {
//!   "https://canvas.instructure.com": [{
//!     "default": true,
//!     "client_id": "10000000000001",
//!     "auth_login_url": "https://canvas.instructure.com/api/lti/authorize_redirect",
//!     "auth_token_url": "https://canvas.instructure.com/login/oauth2/token",
//!     "key_set_url": "https://canvas.instructure.com/api/lti/security/jwks",
//!     "deployment_ids": ["1:abc"]
//!   }]
//! }
//! ```
//!
//! A registration may carry its platform keys inline as `key_set` instead of `key_set_url`.
//! Unknown keys (for example `private_key_file`) are ignored.

use crate::{LtiError, LtiResult};
use jsonwebtoken::jwk::JwkSet;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One platform registration of this tool.
#[derive(Clone, Debug, Deserialize)]
pub struct Registration {
    /// Platform issuer; filled from the configuration key.
    #[serde(skip)]
    pub issuer: String,
    pub client_id: String,
    pub auth_login_url: String,
    #[serde(default)]
    pub auth_token_url: Option<String>,
    #[serde(default)]
    pub key_set_url: Option<String>,
    #[serde(default)]
    pub key_set: Option<JwkSet>,
    #[serde(default)]
    pub deployment_ids: Vec<String>,
    #[serde(default)]
    pub default: bool,
}

impl Registration {
    pub fn has_deployment(&self, deployment_id: &str) -> bool {
        self.deployment_ids.iter().any(|id| id == deployment_id)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(Box<Registration>),
    Many(Vec<Registration>),
}

/// All platform registrations, keyed by issuer.
#[derive(Clone, Debug, Default)]
pub struct ToolConfig {
    registrations: HashMap<String, Vec<Registration>>,
}

impl ToolConfig {
    /// Parse a tool configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `LtiError` if the JSON does not match the configuration shape, or a registration
    /// has neither `key_set_url` nor `key_set`.
    pub fn from_json_str(text: &str) -> LtiResult<Self> {
        let raw: HashMap<String, OneOrMany> = serde_json::from_str(text)?;

        let mut registrations = HashMap::with_capacity(raw.len());
        for (issuer, entry) in raw {
            let mut list = match entry {
                OneOrMany::One(registration) => vec![*registration],
                OneOrMany::Many(list) => list,
            };

            for registration in &mut list {
                if registration.key_set_url.is_none() && registration.key_set.is_none() {
                    return Err(LtiError::InvalidConfig(format!(
                        "registration {} for {issuer} has no key_set_url or key_set",
                        registration.client_id
                    )));
                }
                registration.issuer = issuer.clone();
            }

            registrations.insert(issuer, list);
        }

        Ok(Self { registrations })
    }

    /// Read and parse a tool configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`LtiError::ConfigRead`] if the file cannot be read, otherwise as
    /// [`ToolConfig::from_json_str`].
    pub fn from_json_file(path: &Path) -> LtiResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| LtiError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(
            "loaded {} LTI platform issuer(s) from {}",
            config.registrations.len(),
            path.display()
        );
        Ok(config)
    }

    /// Find the registration for an issuer.
    ///
    /// Prefers the registration whose client id matches, then the one marked `default`, then
    /// the first one listed.
    pub fn find_registration(&self, issuer: &str, client_id: Option<&str>) -> Option<&Registration> {
        let list = self.registrations.get(issuer)?;

        if let Some(client_id) = client_id {
            if let Some(found) = list.iter().find(|r| r.client_id == client_id) {
                return Some(found);
            }
        }

        list.iter().find(|r| r.default).or_else(|| list.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{tool_config_json, CLIENT_ID, DEPLOYMENT_ID, ISSUER};
    use serde_json::json;

    #[test]
    fn test_parses_list_of_registrations() {
        let config = ToolConfig::from_json_str(&tool_config_json().to_string()).unwrap();
        let registration = config.find_registration(ISSUER, None).unwrap();

        assert_eq!(registration.issuer, ISSUER);
        assert_eq!(registration.client_id, CLIENT_ID);
        assert!(registration.has_deployment(DEPLOYMENT_ID));
        assert!(!registration.has_deployment("other"));
        assert!(registration.key_set.is_some());
        assert!(config.find_registration("https://other.example", None).is_none());
    }

    #[test]
    fn test_parses_single_registration_object() {
        let text = json!({
            "https://canvas.instructure.com": {
                "client_id": "abc",
                "auth_login_url": "https://canvas.instructure.com/api/lti/authorize_redirect",
                "key_set_url": "https://canvas.instructure.com/api/lti/security/jwks",
                "deployment_ids": ["1:abc"]
            }
        })
        .to_string();

        let config = ToolConfig::from_json_str(&text).unwrap();
        let registration = config
            .find_registration("https://canvas.instructure.com", Some("abc"))
            .unwrap();
        assert_eq!(
            registration.key_set_url.as_deref(),
            Some("https://canvas.instructure.com/api/lti/security/jwks")
        );
    }

    #[test]
    fn test_find_registration_prefers_client_id_then_default() {
        let registration = |client_id: &str, default: bool| {
            json!({
                "client_id": client_id,
                "auth_login_url": "https://lms.example/auth",
                "key_set_url": "https://lms.example/jwks",
                "default": default
            })
        };
        let text = json!({
            "https://lms.example": [registration("a", false), registration("b", true), registration("c", false)]
        })
        .to_string();
        let config = ToolConfig::from_json_str(&text).unwrap();

        let find = |client_id| {
            config
                .find_registration("https://lms.example", client_id)
                .map(|r| r.client_id.as_str())
        };
        assert_eq!(find(Some("c")), Some("c"));
        assert_eq!(find(Some("zzz")), Some("b"));
        assert_eq!(find(None), Some("b"));
    }

    #[test]
    fn test_registration_without_keys_is_rejected() {
        let text = json!({
            "https://lms.example": { "client_id": "a", "auth_login_url": "https://lms.example/auth" }
        })
        .to_string();

        assert!(matches!(
            ToolConfig::from_json_str(&text),
            Err(LtiError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_json_file_reports_missing_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let missing = temp_dir.path().join("canvas_config.json");

        assert!(matches!(
            ToolConfig::from_json_file(&missing),
            Err(LtiError::ConfigRead { .. })
        ));

        std::fs::write(&missing, tool_config_json().to_string()).unwrap();
        assert!(ToolConfig::from_json_file(&missing).is_ok());
    }
}
