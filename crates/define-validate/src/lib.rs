//! Layered rule-validation engine for define.xml documents.
//!
//! Pipeline: document model → reference graph → rule layers (1–7) →
//! aggregation → audit sealing. Each stage's output feeds the next; layers
//! themselves are pure and independent.

pub mod aggregate;
pub mod audit;
pub mod graph;
pub mod layers;

pub use aggregate::aggregate;
pub use audit::{seal, seal_at, sha256_hex};
pub use graph::{Declaration, RefKind, ReferenceEdge, ReferenceGraph};
pub use layers::{CHECK_CATALOG, run_layer};

use std::collections::BTreeSet;

use tracing::info;

use define_model::{
    DefineError, DocumentModel, LayerId, Result, SchemaOutcome, ValidationConfig,
    ValidationResult,
};

/// Per-run options: strictness, requested layers, and the external schema
/// validator's outcome for layer 1.
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    pub strict: bool,
    /// Layers to run. Unrequested layers are skipped entirely, not passed.
    pub layers: BTreeSet<LayerId>,
    /// External schema outcome. Without one, layer 1 is skipped.
    pub schema_outcome: Option<SchemaOutcome>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            strict: false,
            layers: LayerId::ALL.into_iter().collect(),
            schema_outcome: None,
        }
    }
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_layers(mut self, layers: BTreeSet<LayerId>) -> Self {
        self.layers = layers;
        self
    }

    pub fn with_schema_outcome(mut self, outcome: SchemaOutcome) -> Self {
        self.schema_outcome = Some(outcome);
        self
    }

    /// Parse a caller-supplied list of layer numbers (1..7).
    pub fn layer_set(numbers: &[u8]) -> Result<BTreeSet<LayerId>> {
        numbers
            .iter()
            .map(|&n| {
                LayerId::from_number(n)
                    .ok_or_else(|| DefineError::Config(format!("no such layer: {n}")))
            })
            .collect()
    }
}

/// Run the requested layers against an already-built model and aggregate.
///
/// `input_bytes` are the raw document bytes as received; the audit record
/// hash is computed over them before any parsing or normalization.
pub fn validate_model(
    model: &DocumentModel,
    input_bytes: &[u8],
    config: &ValidationConfig,
    options: &ValidationOptions,
) -> ValidationResult {
    let audit = audit::seal(input_bytes);
    info!(
        validation_id = %audit.validation_id,
        sha256 = %audit.sha256,
        layers = options.layers.len(),
        "starting validation run"
    );

    let graph = ReferenceGraph::build(model);
    let mut reports = Vec::new();
    for layer in LayerId::ALL {
        if !options.layers.contains(&layer) {
            continue;
        }
        if let Some(report) =
            run_layer(layer, model, &graph, config, options.schema_outcome.as_ref())
        {
            reports.push(report);
        }
    }

    let result = aggregate(reports, options.strict, audit);
    info!(
        status = %result.status,
        findings = result.finding_count(),
        "validation run complete"
    );
    result
}

/// Parse raw define.xml bytes, then validate. Structural build errors are
/// fatal and short-circuit rule execution.
pub fn validate_bytes(
    bytes: &[u8],
    config: &ValidationConfig,
    options: &ValidationOptions,
) -> Result<ValidationResult> {
    let model = define_ingest::parse_define(bytes)?;
    Ok(validate_model(&model, bytes, config, options))
}
