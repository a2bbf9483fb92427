//! Normalised handbook record types.
//!
//! Every field is always present. Text that the source document lacks is `""` and tables that
//! are missing are empty lists, so consumers never branch on optional fields.

use serde::Serialize;
use utoipa::ToSchema;

/// Handbook information for one course, extracted from its handbook document.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct HandbookRecord {
    pub code: String,
    pub name: String,
    /// Credit points (`unitsMaximum`), kept as the number found in the document.
    #[schema(value_type = f64)]
    pub credit_points: serde_json::Number,
    pub year: String,
    pub description: String,
    pub prerequisites: String,
    pub teaching_org: String,
    pub content: String,
    pub learning_strategy: String,
    pub assessment_strategy: String,
    pub references: String,
    pub learning_outcomes: Vec<LearningOutcome>,
    pub graduate_capabilities: Vec<GraduateCapability>,
    pub assessments: Vec<Assessment>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct LearningOutcome {
    pub number: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct GraduateCapability {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// One assessment task. `description` is never empty; `weighting` may be.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct Assessment {
    pub description: String,
    pub weighting: String,
}
