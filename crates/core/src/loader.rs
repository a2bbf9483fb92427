//! Handbook document loading.
//!
//! Each course has at most one handbook document, stored as `<data_dir>/<COURSE_CODE>.json`.
//! Documents are re-read from disk on every call; nothing is cached.

use crate::constants::HANDBOOK_FILE_EXTENSION;
use crate::{HandbookConfig, HandbookError, HandbookResult};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Read-only access to the handbook data directory.
#[derive(Clone, Debug)]
pub struct HandbookStore {
    cfg: Arc<HandbookConfig>,
}

impl HandbookStore {
    pub fn new(cfg: Arc<HandbookConfig>) -> Self {
        Self { cfg }
    }

    pub fn data_dir(&self) -> &Path {
        self.cfg.data_dir()
    }

    /// Path of the handbook document for `course_code`.
    ///
    /// Returns `None` when the code cannot name a single file directly inside the data
    /// directory (empty, `.`/`..`, or containing a path separator).
    pub fn document_path(&self, course_code: &str) -> Option<PathBuf> {
        let unsafe_code = course_code.is_empty()
            || course_code == "."
            || course_code == ".."
            || course_code.contains(['/', '\\', '\0']);
        if unsafe_code {
            return None;
        }

        Some(
            self.data_dir()
                .join(format!("{course_code}.{HANDBOOK_FILE_EXTENSION}")),
        )
    }

    /// Load and parse the handbook document for a course.
    ///
    /// The course code is used verbatim (case-sensitive) to build the file name.
    ///
    /// # Errors
    ///
    /// - [`HandbookError::NotFound`] if no file exists for the course code,
    /// - [`HandbookError::Parse`] if the file is not valid JSON,
    /// - [`HandbookError::Read`] for any other I/O failure, including non-UTF-8 content.
    pub fn load(&self, course_code: &str) -> HandbookResult<Value> {
        let Some(path) = self.document_path(course_code) else {
            tracing::debug!("course code {:?} cannot name a handbook file", course_code);
            return Err(HandbookError::NotFound {
                path: self.data_dir().to_path_buf(),
            });
        };

        tracing::debug!("loading handbook: {}", path.display());

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(HandbookError::NotFound { path });
            }
            Err(source) => return Err(HandbookError::Read { path, source }),
        };

        serde_json::from_str(&contents).map_err(|source| HandbookError::Parse { path, source })
    }

    /// Load a handbook document, treating "no usable document" as `None`.
    ///
    /// Missing files and invalid JSON are expected conditions for a course without a handbook
    /// entry; they are logged and mapped to `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`HandbookError::Read`] for unexpected I/O failures.
    pub fn load_optional(&self, course_code: &str) -> HandbookResult<Option<Value>> {
        match self.load(course_code) {
            Ok(doc) => Ok(Some(doc)),
            Err(HandbookError::NotFound { path }) => {
                tracing::debug!("no handbook for {}: {}", course_code, path.display());
                Ok(None)
            }
            Err(e @ HandbookError::Parse { .. }) => {
                tracing::warn!("ignoring handbook for {}: {}", course_code, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Lists the course codes that have a handbook document, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`HandbookError::ListDir`] if the data directory cannot be read.
    pub fn course_codes(&self) -> HandbookResult<Vec<String>> {
        let dir = self.data_dir();
        let entries = fs::read_dir(dir).map_err(|source| HandbookError::ListDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut codes: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.extension()
                    .is_some_and(|ext| ext == HANDBOOK_FILE_EXTENSION)
            })
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_owned)
            })
            .collect();

        codes.sort();
        Ok(codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store(dir: &Path) -> HandbookStore {
        let cfg = HandbookConfig::new(dir.to_path_buf()).expect("HandbookConfig::new should succeed");
        HandbookStore::new(Arc::new(cfg))
    }

    #[test]
    fn test_load_reads_document_for_course_code() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(
            temp_dir.path().join("EDET100.json"),
            r#"{"code": "EDET100", "name": "Intro to Tech"}"#,
        )
        .expect("write fixture");

        let store = test_store(temp_dir.path());
        let doc = store.load("EDET100").expect("load should succeed");

        assert_eq!(doc["code"], "EDET100");
        assert_eq!(doc["name"], "Intro to Tech");
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());

        let err = store.load("NRSG264").expect_err("missing file should fail");
        assert!(matches!(err, HandbookError::NotFound { .. }));
        assert!(store.load_optional("NRSG264").expect("absent is not an error").is_none());
    }

    #[test]
    fn test_load_is_case_sensitive() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("EDET100.json"), "{}").expect("write fixture");

        let store = test_store(temp_dir.path());
        assert!(store.load("EDET100").is_ok());
        // Case-insensitive filesystems would find the file; skip the check there.
        if !temp_dir.path().join("edet100.json").exists() {
            assert!(matches!(
                store.load("edet100"),
                Err(HandbookError::NotFound { .. })
            ));
        }
    }

    #[test]
    fn test_load_invalid_json_is_parse_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("BAD100.json"), "{ not json").expect("write fixture");

        let store = test_store(temp_dir.path());
        let err = store.load("BAD100").expect_err("invalid JSON should fail");

        assert!(matches!(err, HandbookError::Parse { .. }));
        assert!(store.load_optional("BAD100").expect("parse errors are absorbed").is_none());
    }

    #[test]
    fn test_load_non_utf8_is_read_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("ENC100.json"), [0xff, 0xfe, 0x7b, 0x7d])
            .expect("write fixture");

        let store = test_store(temp_dir.path());
        let err = store.load("ENC100").expect_err("non-UTF-8 should fail");

        assert!(matches!(err, HandbookError::Read { .. }));
        assert!(store.load_optional("ENC100").is_err());
    }

    #[test]
    fn test_load_directory_in_place_of_file_is_read_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(temp_dir.path().join("DIR100.json")).expect("create dir");

        let store = test_store(temp_dir.path());
        let err = store.load("DIR100").expect_err("directory should fail");
        assert!(matches!(err, HandbookError::Read { .. }));
    }

    #[test]
    fn test_unsafe_course_codes_are_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("data");
        fs::create_dir(&data_dir).expect("create data dir");
        fs::write(temp_dir.path().join("SECRET.json"), "{}").expect("write fixture");

        let store = test_store(&data_dir);
        for code in ["", ".", "..", "../SECRET", "a/b", "a\\b"] {
            assert!(store.document_path(code).is_none(), "{code:?} should be rejected");
            assert!(
                matches!(store.load(code), Err(HandbookError::NotFound { .. })),
                "{code:?} should be NotFound"
            );
        }
    }

    #[test]
    fn test_course_codes_lists_json_stems_sorted() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for name in ["NRSG264.json", "EDET100.json", "notes.txt"] {
            fs::write(temp_dir.path().join(name), "{}").expect("write fixture");
        }
        fs::create_dir(temp_dir.path().join("archive.json")).expect("create dir");

        let store = test_store(temp_dir.path());
        assert_eq!(
            store.course_codes().expect("listing should succeed"),
            vec!["EDET100".to_string(), "NRSG264".to_string()]
        );
    }
}
