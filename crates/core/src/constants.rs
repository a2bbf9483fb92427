//! Constants used throughout the handbook core crate.
//!
//! Component identifiers are the `componentIntegrationIdentifier` values found in the handbook
//! export. They are matched exactly, including the upstream misspelling of "capabilities".

/// Default directory for handbook JSON files when no explicit directory is configured.
pub const DEFAULT_HANDBOOK_DATA_DIR: &str = "handbook/data";

/// File extension of handbook documents.
pub const HANDBOOK_FILE_EXTENSION: &str = "json";

pub const UNIT_DESCRIPTION_ID: &str = "unit_desc";
pub const PREREQUISITES_ID: &str = "handbook_prereq";
pub const UNIT_CONTENT_ID: &str = "unit_content";
pub const TEACHING_ORG_ID: &str = "teaching_org";
pub const LEARNING_STRATEGY_ID: &str = "learning_strategy";
pub const ASSESSMENT_STRATEGY_ID: &str = "assessment_strategy";
pub const REFERENCES_ID: &str = "text_and_references";

/// Table of learning outcomes: cells are `[number, description]`.
pub const LEARNING_OUTCOMES_ID: &str = "learning_outcomes_v2";

/// Table of graduate capabilities: cells are `[id, name, description]`.
pub const GRADUATE_CAPABILITIES_ID: &str = "graduate_capabillities_v2";

/// Table of assessment tasks; column order varies, so roles are resolved from headings.
pub const ASSESSMENT_OVERVIEW_ID: &str = "assessment_overview_v2";

/// Lower-case heading fragments that mark the assessment description column.
pub const DESCRIPTION_HEADINGS: &[&str] = &["description", "kind and purpose"];

/// Lower-case heading fragments that mark the assessment weighting column.
pub const WEIGHTING_HEADINGS: &[&str] = &["weighting"];
