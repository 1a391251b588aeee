//! Layer 1: XSD schema validation passthrough.
//!
//! The core never re-implements schema checking; it only folds the external
//! validator's (location, message) pairs into findings.

use define_model::{Finding, LayerId, SchemaOutcome, Severity};

use super::finding;

pub fn run(outcome: &SchemaOutcome) -> Vec<Finding> {
    if outcome.valid {
        return Vec::new();
    }
    let mut findings = Vec::new();
    for (i, message) in outcome.messages.iter().enumerate() {
        let text = match &message.location {
            Some(location) => format!("{}: {}", location, message.message),
            None => message.message.clone(),
        };
        findings.push(finding(
            LayerId::Schema,
            &format!("XSD-{:03}", i + 1),
            "xsd_schema",
            Severity::Critical,
            text,
            None,
        ));
    }
    if findings.is_empty() {
        // Invalid with no detail still has to fail the layer.
        findings.push(finding(
            LayerId::Schema,
            "XSD-001",
            "xsd_schema",
            Severity::Critical,
            "document failed XSD schema validation".to_string(),
            None,
        ));
    }
    findings
}
