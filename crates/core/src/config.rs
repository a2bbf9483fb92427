//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services, so that
//! request handling never reads process-wide environment variables.

use crate::{HandbookError, HandbookResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct HandbookConfig {
    data_dir: PathBuf,
}

impl HandbookConfig {
    /// Create a new `HandbookConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`HandbookError::InvalidConfig`] if `data_dir` is empty or is not an existing
    /// directory.
    pub fn new(data_dir: PathBuf) -> HandbookResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(HandbookError::InvalidConfig(
                "handbook data directory cannot be empty".into(),
            ));
        }

        if !data_dir.is_dir() {
            return Err(HandbookError::InvalidConfig(format!(
                "handbook data directory does not exist: {}",
                data_dir.display()
            )));
        }

        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Resolve the data directory from an optional override value.
///
/// `None` or a blank value falls back to [`crate::DEFAULT_HANDBOOK_DATA_DIR`].
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(crate::DEFAULT_HANDBOOK_DATA_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_accepts_existing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = HandbookConfig::new(temp_dir.path().to_path_buf()).expect("config should build");
        assert_eq!(cfg.data_dir(), temp_dir.path());
    }

    #[test]
    fn test_new_rejects_missing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("nope");

        let err = HandbookConfig::new(missing).expect_err("missing dir should be rejected");
        assert!(matches!(err, HandbookError::InvalidConfig(_)));
    }

    #[test]
    fn test_data_dir_from_env_value_defaults_when_blank() {
        assert_eq!(
            data_dir_from_env_value(None),
            PathBuf::from(crate::DEFAULT_HANDBOOK_DATA_DIR)
        );
        assert_eq!(
            data_dir_from_env_value(Some("   ".into())),
            PathBuf::from(crate::DEFAULT_HANDBOOK_DATA_DIR)
        );
        assert_eq!(
            data_dir_from_env_value(Some(" /srv/handbooks ".into())),
            PathBuf::from("/srv/handbooks")
        );
    }
}
