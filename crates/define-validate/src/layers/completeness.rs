//! Layer 5: metadata completeness.

use define_model::{DocumentModel, Finding, LayerId, Severity, ValidationConfig};

use super::finding;

pub fn run(model: &DocumentModel, config: &ValidationConfig) -> Vec<Finding> {
    let mut findings = Vec::new();

    // CHECK 5.1: every variable has a non-empty label.
    for variable in &model.variables {
        if variable.label.as_deref().is_none_or(|l| l.trim().is_empty()) {
            findings.push(finding(
                LayerId::Completeness,
                "COMP-001",
                "variable_labels",
                config.severity_for("variable_labels", Severity::Warning),
                format!("Variable '{}' missing description/label", variable.name),
                Some(&variable.oid),
            ));
        }
    }

    // CHECK 5.2: every dataset has a non-empty description.
    for dataset in &model.datasets {
        if dataset.description.as_deref().is_none_or(|d| d.trim().is_empty()) {
            findings.push(finding(
                LayerId::Completeness,
                "COMP-002",
                "dataset_descriptions",
                config.severity_for("dataset_descriptions", Severity::Warning),
                format!("Dataset '{}' missing description", dataset.name),
                Some(&dataset.oid),
            ));
        }
    }

    // CHECK 5.3: every method description meets the minimum length.
    for method in &model.methods {
        let length = method.description.as_deref().map_or(0, |d| d.trim().len());
        if length < config.min_method_description_len {
            findings.push(finding(
                LayerId::Completeness,
                "COMP-003",
                "method_documentation",
                config.severity_for("method_documentation", Severity::Warning),
                format!(
                    "Method '{}' has insufficient documentation (<{} chars)",
                    method.oid, config.min_method_description_len
                ),
                Some(&method.oid),
            ));
        }
    }

    findings
}
