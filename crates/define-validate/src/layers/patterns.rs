//! Layer 7: advanced graph patterns.
//!
//! Orphaned references, duplicate OIDs, variable ordering consistency,
//! empty value-level metadata lists, and the default-off unused-entity
//! scan. All output is in document declaration order so repeated runs
//! report identically.

use define_model::{DocumentModel, EntityKind, Finding, LayerId, Severity, ValidationConfig};

use super::finding;
use crate::graph::ReferenceGraph;

pub fn run(
    model: &DocumentModel,
    graph: &ReferenceGraph,
    config: &ValidationConfig,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    // CHECK 7.1: orphaned OID references, one finding per distinct edge.
    for edge in graph.orphaned_edges() {
        findings.push(finding(
            LayerId::Graph,
            "PAT-001",
            "orphaned_reference",
            config.severity_for("orphaned_reference", Severity::Critical),
            format!(
                "{} '{}' references undefined OID '{}' via {}",
                edge.source_kind, edge.source_name, edge.target_oid, edge.kind
            ),
            Some(&edge.target_oid),
        ));
    }

    // CHECK 7.2: duplicate OID declarations, one finding per OID citing
    // every declaration site.
    for (oid, declarers) in graph.duplicate_oids() {
        let sites = declarers
            .iter()
            .map(|decl| format!("{} '{}'", decl.kind, decl.name))
            .collect::<Vec<_>>()
            .join(", ");
        findings.push(finding(
            LayerId::Graph,
            "PAT-002",
            "duplicate_oid",
            config.severity_for("duplicate_oid", Severity::Critical),
            format!(
                "OID '{}' is declared {} times: {}",
                oid,
                declarers.len(),
                sites
            ),
            Some(oid),
        ));
    }

    // CHECK 7.3: variable ordering consistency within each dataset.
    for dataset in &model.datasets {
        findings.extend(ordering_findings(dataset, config));
    }

    // CHECK 7.4: a declared value-level metadata list must carry at least
    // one item reference.
    for value_list in &model.value_lists {
        if value_list.item_refs.is_empty() {
            findings.push(finding(
                LayerId::Graph,
                "PAT-006",
                "vlm_validation",
                config.severity_for("vlm_validation", Severity::Warning),
                format!("ValueListDef '{}' is empty", value_list.oid),
                Some(&value_list.oid),
            ));
        }
    }

    // CHECK 7.5: declared-but-unreferenced codelists and methods.
    if config.report_unused {
        for kind in [EntityKind::CodeList, EntityKind::Method] {
            for decl in graph.unused_of_kind(kind) {
                findings.push(finding(
                    LayerId::Graph,
                    "PAT-007",
                    "unused_entity",
                    config.severity_for("unused_entity", Severity::Info),
                    format!("{} '{}' is declared but never referenced", kind, decl.name),
                    Some(&decl.oid),
                ));
            }
        }
    }

    findings
}

fn ordering_findings(
    dataset: &define_model::Dataset,
    config: &ValidationConfig,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut order_numbers = Vec::new();
    let mut has_non_numeric = false;

    for variable_ref in &dataset.variable_refs {
        let Some(raw) = &variable_ref.order_number else {
            continue;
        };
        match raw.trim().parse::<i64>() {
            Ok(n) => order_numbers.push(n),
            Err(_) => has_non_numeric = true,
        }
    }

    if has_non_numeric {
        findings.push(finding(
            LayerId::Graph,
            "PAT-003",
            "variable_ordering",
            config.severity_for("variable_ordering", Severity::Warning),
            format!("Dataset '{}' has non-numeric OrderNumber", dataset.name),
            Some(&dataset.oid),
        ));
    }

    let mut sorted = order_numbers.clone();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != order_numbers.len() {
        findings.push(finding(
            LayerId::Graph,
            "PAT-004",
            "variable_ordering",
            config.severity_for("variable_ordering", Severity::Warning),
            format!("Dataset '{}' has duplicate OrderNumbers", dataset.name),
            Some(&dataset.oid),
        ));
    }
    if !order_numbers.is_sorted() {
        findings.push(finding(
            LayerId::Graph,
            "PAT-005",
            "variable_ordering",
            config.severity_for("variable_ordering", Severity::Info),
            format!("Dataset '{}' has non-sequential OrderNumbers", dataset.name),
            Some(&dataset.oid),
        ));
    }

    findings
}
