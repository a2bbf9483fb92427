//! Handbook field extraction.
//!
//! A handbook document is a root object with a few top-level fields and a `payload.components`
//! list. Each component is identified by `componentIntegrationIdentifier` and carries either a
//! scalar `payload.value` or a table (`payload.columns` and `payload.rows`, each row holding
//! `cells` with a `value`).
//!
//! Extraction is a pure function of the document. Missing keys, short rows and unrecognised
//! columns degrade to empty values; nothing here returns an error.

use crate::constants::{
    ASSESSMENT_OVERVIEW_ID, ASSESSMENT_STRATEGY_ID, DESCRIPTION_HEADINGS,
    GRADUATE_CAPABILITIES_ID, LEARNING_OUTCOMES_ID, LEARNING_STRATEGY_ID, PREREQUISITES_ID,
    REFERENCES_ID, TEACHING_ORG_ID, UNIT_CONTENT_ID, UNIT_DESCRIPTION_ID, WEIGHTING_HEADINGS,
};
use crate::record::{Assessment, GraduateCapability, HandbookRecord, LearningOutcome};
use serde_json::{Map, Number, Value};

static NULL: Value = Value::Null;

/// Extract a [`HandbookRecord`] from a parsed handbook document.
///
/// Returns `None` when the document is null, empty, or not a JSON object: the course simply has
/// no handbook entry.
pub fn extract(doc: &Value) -> Option<HandbookRecord> {
    let Some(root) = doc.as_object().filter(|root| !root.is_empty()) else {
        tracing::debug!("handbook document is empty or not an object");
        return None;
    };

    let components = components(root);
    tracing::debug!("found {} components", components.len());

    let record = HandbookRecord {
        code: text(root.get("code")),
        name: text(root.get("name")),
        credit_points: credit_points(root.get("unitsMaximum")),
        year: text(root.get("yearApplied")),
        description: component_value(components, UNIT_DESCRIPTION_ID),
        prerequisites: component_value(components, PREREQUISITES_ID),
        teaching_org: component_value(components, TEACHING_ORG_ID),
        content: component_value(components, UNIT_CONTENT_ID),
        learning_strategy: component_value(components, LEARNING_STRATEGY_ID),
        assessment_strategy: component_value(components, ASSESSMENT_STRATEGY_ID),
        references: component_value(components, REFERENCES_ID),
        learning_outcomes: learning_outcomes(components),
        graduate_capabilities: graduate_capabilities(components),
        assessments: assessments(components),
    };

    tracing::debug!(
        "extracted {}: {} outcomes, {} capabilities, {} assessments",
        record.code,
        record.learning_outcomes.len(),
        record.graduate_capabilities.len(),
        record.assessments.len()
    );

    Some(record)
}

fn components(root: &Map<String, Value>) -> &[Value] {
    root.get("payload")
        .and_then(|payload| payload.get("components"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Payload of the first component with the given identifier.
///
/// Identifiers are assumed unique; any later duplicates are ignored.
fn find_payload<'a>(components: &'a [Value], identifier: &str) -> Option<&'a Value> {
    components
        .iter()
        .find(|component| {
            component
                .get("componentIntegrationIdentifier")
                .and_then(Value::as_str)
                == Some(identifier)
        })
        .map(|component| component.get("payload").unwrap_or(&NULL))
}

fn component_value(components: &[Value], identifier: &str) -> String {
    text(find_payload(components, identifier).and_then(|payload| payload.get("value")))
}

/// Renders a scalar JSON value as text; anything else is empty.
fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn credit_points(value: Option<&Value>) -> Number {
    match value {
        Some(Value::Number(n)) => n.clone(),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map(Number::from)
            .ok()
            .or_else(|| s.trim().parse::<f64>().ok().and_then(Number::from_f64))
            .unwrap_or_else(|| Number::from(0)),
        _ => Number::from(0),
    }
}

fn rows(payload: &Value) -> &[Value] {
    payload
        .get("rows")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn cells(row: &Value) -> &[Value] {
    row.get("cells")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn cell_text(cells: &[Value], index: usize) -> String {
    text(cells.get(index).and_then(|cell| cell.get("value")))
}

fn learning_outcomes(components: &[Value]) -> Vec<LearningOutcome> {
    let Some(payload) = find_payload(components, LEARNING_OUTCOMES_ID) else {
        return Vec::new();
    };

    rows(payload)
        .iter()
        .map(|row| cells(row))
        .filter(|cells| cells.len() >= 2)
        .map(|cells| LearningOutcome {
            number: cell_text(cells, 0),
            description: cell_text(cells, 1),
        })
        .collect()
}

fn graduate_capabilities(components: &[Value]) -> Vec<GraduateCapability> {
    let Some(payload) = find_payload(components, GRADUATE_CAPABILITIES_ID) else {
        return Vec::new();
    };

    rows(payload)
        .iter()
        .map(|row| cells(row))
        .filter(|cells| cells.len() >= 3)
        .map(|cells| GraduateCapability {
            id: cell_text(cells, 0),
            name: cell_text(cells, 1),
            description: cell_text(cells, 2),
        })
        .collect()
}

/// Column positions of the assessment table roles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct AssessmentColumns {
    description: Option<usize>,
    weighting: Option<usize>,
}

impl AssessmentColumns {
    /// Resolves each role to the first column whose heading contains one of its fragments,
    /// compared case-insensitively.
    fn resolve(columns: &[Value]) -> Self {
        let headings: Vec<String> = columns
            .iter()
            .map(|column| {
                column
                    .get("heading")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_lowercase()
            })
            .collect();

        let first_match = |fragments: &[&str]| {
            headings
                .iter()
                .position(|heading| fragments.iter().any(|f| heading.contains(*f)))
        };

        Self {
            description: first_match(DESCRIPTION_HEADINGS),
            weighting: first_match(WEIGHTING_HEADINGS),
        }
    }

    fn read(&self, cells: &[Value]) -> Assessment {
        let at = |index: Option<usize>| index.map(|i| cell_text(cells, i)).unwrap_or_default();
        Assessment {
            description: at(self.description),
            weighting: at(self.weighting),
        }
    }
}

fn assessments(components: &[Value]) -> Vec<Assessment> {
    let Some(payload) = find_payload(components, ASSESSMENT_OVERVIEW_ID) else {
        return Vec::new();
    };

    let columns = payload
        .get("columns")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let roles = AssessmentColumns::resolve(columns);
    tracing::debug!(
        "assessment columns: description={:?}, weighting={:?}",
        roles.description,
        roles.weighting
    );

    rows(payload)
        .iter()
        .map(|row| roles.read(cells(row)))
        // Emptiness is judged on the rendered text, so a numeric 0 or `false` cell is kept.
        .filter(|assessment| !assessment.description.is_empty())
        .collect()
}
