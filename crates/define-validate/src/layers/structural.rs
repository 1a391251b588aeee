//! Layer 2: structural checks over the built model.

use define_model::{DocumentModel, Finding, LayerId, Severity, ValidationConfig};

use super::finding;
use crate::graph::{RefKind, ReferenceGraph};

pub fn run(
    model: &DocumentModel,
    graph: &ReferenceGraph,
    config: &ValidationConfig,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    for dataset in &model.datasets {
        if dataset.structure.is_none() {
            findings.push(finding(
                LayerId::Structural,
                "STR-001",
                "missing_structure",
                config.severity_for("missing_structure", Severity::Major),
                format!("Dataset '{}' has no structure keyword", dataset.name),
                Some(&dataset.oid),
            ));
        }
    }

    // Every variable must be pulled in by some dataset's ItemRef.
    for variable in &model.variables {
        let referenced = graph
            .referencers_of(&variable.oid)
            .iter()
            .any(|edge| edge.kind == RefKind::DatasetVariable);
        if !referenced {
            findings.push(finding(
                LayerId::Structural,
                "STR-002",
                "variable_not_in_dataset",
                config.severity_for("variable_not_in_dataset", Severity::Warning),
                format!(
                    "Variable '{}' is not referenced by any declared dataset",
                    variable.name
                ),
                Some(&variable.oid),
            ));
        }
    }

    findings
}
