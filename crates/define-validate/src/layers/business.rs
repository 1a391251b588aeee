//! Layer 3: business rules. The most critical FDA/CDISC compliance checks.

use define_model::{DocumentModel, EntityKind, Finding, LayerId, Severity, ValidationConfig};

use super::finding;
use crate::graph::ReferenceGraph;

pub fn run(
    model: &DocumentModel,
    graph: &ReferenceGraph,
    config: &ValidationConfig,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    // CHECK 3.1: derived variables must cite a computational method.
    for variable in &model.variables {
        if variable.is_derived() && variable.method_oid.is_none() {
            findings.push(finding(
                LayerId::Business,
                "BUS-001",
                "derived_no_method",
                config.severity_for("derived_no_method", Severity::Critical),
                format!("Derived variable '{}' missing MethodOID", variable.name),
                Some(&variable.oid),
            ));
        }
    }

    // CHECK 3.2: CodeListOID references must resolve to a declared codelist.
    for variable in &model.variables {
        let Some(codelist_oid) = &variable.codelist_oid else {
            continue;
        };
        let resolves_to_codelist = graph
            .resolve(codelist_oid)
            .is_some_and(|decl| decl.kind == EntityKind::CodeList);
        if !resolves_to_codelist {
            findings.push(finding(
                LayerId::Business,
                "BUS-002",
                "invalid_codelist_ref",
                config.severity_for("invalid_codelist_ref", Severity::Critical),
                format!(
                    "Variable '{}' references undefined CodeList '{}'",
                    variable.name, codelist_oid
                ),
                Some(&variable.oid),
            ));
        }
    }

    // CHECK 3.3: datasets must declare a Structure attribute.
    for dataset in &model.datasets {
        if dataset.structure.is_none() {
            findings.push(finding(
                LayerId::Business,
                "BUS-003",
                "missing_structure",
                config.severity_for("missing_structure", Severity::Major),
                format!("Dataset '{}' missing def:Structure attribute", dataset.name),
                Some(&dataset.oid),
            ));
        }
    }

    // CHECK 3.4: the declared SDTMIG version must be an accepted one.
    for standard in &model.standards {
        let is_sdtmig = standard.name.to_uppercase().contains("SDTMIG")
            || standard.standard_type.as_deref() == Some("IG");
        let Some(version) = &standard.version else {
            continue;
        };
        if is_sdtmig && !config.required_sdtmig_versions.contains(version) {
            findings.push(finding(
                LayerId::Business,
                "BUS-004",
                "sdtmig_version",
                config.severity_for("sdtmig_version", Severity::Warning),
                format!(
                    "Standard '{}' declares SDTMIG version {} (accepted: {})",
                    standard.name,
                    version,
                    config
                        .required_sdtmig_versions
                        .iter()
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
                Some(&standard.oid),
            ));
        }
    }

    findings
}
