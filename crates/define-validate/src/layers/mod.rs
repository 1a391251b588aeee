//! The seven validation layers.
//!
//! Each layer is a pure function of `(model, graph, config)` producing a
//! list of findings. Layers share no mutable state and never read each
//! other's results; only their execution order is fixed, so output stays
//! deterministic.

mod business;
mod completeness;
mod methods;
mod patterns;
mod schema;
mod structural;
mod terminology;

use tracing::debug;

use define_model::{
    DocumentModel, Finding, LayerId, LayerReport, SchemaOutcome, Severity, ValidationConfig,
};

use crate::graph::ReferenceGraph;

/// Run one layer. Returns `None` for layer 1 when no external schema
/// outcome was supplied (skipped, not passed).
pub fn run_layer(
    layer: LayerId,
    model: &DocumentModel,
    graph: &ReferenceGraph,
    config: &ValidationConfig,
    schema_outcome: Option<&SchemaOutcome>,
) -> Option<LayerReport> {
    let findings = match layer {
        LayerId::Schema => schema::run(schema_outcome?),
        LayerId::Structural => structural::run(model, graph, config),
        LayerId::Business => business::run(model, graph, config),
        LayerId::Terminology => terminology::run(model, config),
        LayerId::Completeness => completeness::run(model, config),
        LayerId::Methods => methods::run(model, graph, config),
        LayerId::Graph => patterns::run(model, graph, config),
    };
    debug!(layer = layer.number(), findings = findings.len(), "layer complete");
    Some(LayerReport { layer, findings })
}

/// Uniform finding constructor used by every layer.
fn finding(
    layer: LayerId,
    rule_id: &str,
    check: &str,
    severity: Severity,
    message: String,
    oid: Option<&str>,
) -> Finding {
    Finding {
        layer,
        rule_id: rule_id.to_string(),
        check: check.to_string(),
        severity,
        message,
        oid: oid.map(str::to_string),
    }
}

/// Every (rule id, check id, default severity, description) the engine can
/// emit, for documentation and the `checks` CLI listing.
pub const CHECK_CATALOG: &[(LayerId, &str, &str, Severity, &str)] = &[
    (LayerId::Schema, "XSD-001", "xsd_schema", Severity::Critical, "External XSD schema validation messages (passthrough)"),
    (LayerId::Structural, "STR-001", "missing_structure", Severity::Major, "Dataset declares a Structure keyword"),
    (LayerId::Structural, "STR-002", "variable_not_in_dataset", Severity::Warning, "Variable belongs to a declared dataset"),
    (LayerId::Business, "BUS-001", "derived_no_method", Severity::Critical, "Derived variable cites a computational method"),
    (LayerId::Business, "BUS-002", "invalid_codelist_ref", Severity::Critical, "CodeList reference resolves to a declared codelist"),
    (LayerId::Business, "BUS-003", "missing_structure", Severity::Major, "Dataset declares a def:Structure attribute"),
    (LayerId::Business, "BUS-004", "sdtmig_version", Severity::Warning, "Declared SDTMIG version is an accepted version"),
    (LayerId::Terminology, "TERM-001", "race_terminology", Severity::Major, "RACE codelist covers all required terms"),
    (LayerId::Terminology, "TERM-002", "sex_terminology", Severity::Major, "SEX codelist covers all required terms"),
    (LayerId::Terminology, "TERM-003", "ct_standard_refs", Severity::Info, "Codelists reference a published CT standard"),
    (LayerId::Completeness, "COMP-001", "variable_labels", Severity::Warning, "Variable has a non-empty label"),
    (LayerId::Completeness, "COMP-002", "dataset_descriptions", Severity::Warning, "Dataset has a non-empty description"),
    (LayerId::Completeness, "COMP-003", "method_documentation", Severity::Warning, "Method description meets the minimum length"),
    (LayerId::Methods, "METH-001", "methods_present", Severity::Info, "Derived variables exist but no methods are defined"),
    (LayerId::Methods, "METH-002", "method_quality", Severity::Warning, "Method description is not overly brief"),
    (LayerId::Methods, "METH-003", "method_quality", Severity::Info, "Method description references the derivation logic"),
    (LayerId::Methods, "METH-004", "method_quality", Severity::Major, "Derived variable's method has a description"),
    (LayerId::Graph, "PAT-001", "orphaned_reference", Severity::Critical, "Referenced OID is declared somewhere"),
    (LayerId::Graph, "PAT-002", "duplicate_oid", Severity::Critical, "No OID is declared more than once"),
    (LayerId::Graph, "PAT-003", "variable_ordering", Severity::Warning, "OrderNumber values are numeric"),
    (LayerId::Graph, "PAT-004", "variable_ordering", Severity::Warning, "OrderNumber values are unique within a dataset"),
    (LayerId::Graph, "PAT-005", "variable_ordering", Severity::Info, "OrderNumber values ascend in declaration order"),
    (LayerId::Graph, "PAT-006", "vlm_validation", Severity::Warning, "Value-level metadata lists carry at least one item reference"),
    (LayerId::Graph, "PAT-007", "unused_entity", Severity::Info, "Declared codelists and methods are referenced (default-off)"),
];
