//! LTI runtime settings, resolved once at startup.

use std::path::PathBuf;

pub const DEFAULT_TOOL_CONFIG_PATH: &str = "handbook/lti_configs/canvas_config.json";
pub const DEFAULT_LAUNCH_URL: &str = "http://localhost:8000/handbook/launch/";
pub const DEFAULT_PUBLIC_KEY_PATH: &str = "handbook/lti_configs/public.key";

/// Where the tool finds its registrations and keys, and the URL platforms launch into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LtiSettings {
    pub tool_config: PathBuf,
    pub launch_url: String,
    /// Tool public key; optional at runtime, the JWKS endpoint is empty without it.
    pub public_key: PathBuf,
    /// Key id to publish; `None` leaves the choice to the caller.
    pub key_id: Option<String>,
}

impl LtiSettings {
    /// Build settings from optional override values, e.g. `std::env::var(..).ok()`.
    ///
    /// `None` or blank values fall back to the defaults.
    pub fn from_env_values(
        tool_config: Option<String>,
        launch_url: Option<String>,
        public_key: Option<String>,
        key_id: Option<String>,
    ) -> Self {
        Self {
            tool_config: non_blank(tool_config)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TOOL_CONFIG_PATH)),
            launch_url: non_blank(launch_url).unwrap_or_else(|| DEFAULT_LAUNCH_URL.into()),
            public_key: non_blank(public_key)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_KEY_PATH)),
            key_id: non_blank(key_id),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
