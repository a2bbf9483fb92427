//! # Handbook Core
//!
//! Core logic for the handbook LTI tool.
//!
//! This crate contains pure data operations and read-only file access:
//! - Loading one handbook JSON document per course code from the data directory
//! - Extracting a normalised [`HandbookRecord`] from the semi-structured `payload.components` list
//!
//! **No API concerns**: LTI launches, HTTP routing and page rendering belong in `handbook-lti` and
//! `handbook-web`.

pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod loader;
pub mod record;

pub use config::HandbookConfig;
pub use constants::DEFAULT_HANDBOOK_DATA_DIR;
pub use error::{HandbookError, HandbookResult};
pub use extract::extract;
pub use loader::HandbookStore;
pub use record::{Assessment, GraduateCapability, HandbookRecord, LearningOutcome};
