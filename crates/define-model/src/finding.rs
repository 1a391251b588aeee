use serde::{Deserialize, Serialize};
use std::fmt;

/// Finding severity. Ordering is ascending so `max()` picks the worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Warning,
    Major,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Major => "MAJOR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The seven validation layers, executed in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerId {
    Schema,
    Structural,
    Business,
    Terminology,
    Completeness,
    Methods,
    Graph,
}

impl LayerId {
    pub const ALL: [LayerId; 7] = [
        LayerId::Schema,
        LayerId::Structural,
        LayerId::Business,
        LayerId::Terminology,
        LayerId::Completeness,
        LayerId::Methods,
        LayerId::Graph,
    ];

    pub fn number(&self) -> u8 {
        match self {
            LayerId::Schema => 1,
            LayerId::Structural => 2,
            LayerId::Business => 3,
            LayerId::Terminology => 4,
            LayerId::Completeness => 5,
            LayerId::Methods => 6,
            LayerId::Graph => 7,
        }
    }

    pub fn from_number(n: u8) -> Option<LayerId> {
        LayerId::ALL.iter().copied().find(|layer| layer.number() == n)
    }

    pub fn name(&self) -> &'static str {
        match self {
            LayerId::Schema => "XSD Schema",
            LayerId::Structural => "Structural",
            LayerId::Business => "Business Rules",
            LayerId::Terminology => "Controlled Terminology",
            LayerId::Completeness => "Completeness",
            LayerId::Methods => "Computational Methods",
            LayerId::Graph => "Advanced Patterns",
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Layer {} ({})", self.number(), self.name())
    }
}

/// One rule violation. Append-only; never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub layer: LayerId,
    /// Stable rule id, e.g. "BUS-001".
    pub rule_id: String,
    /// Check id keyed into the configured criticality table,
    /// e.g. "derived_no_method".
    pub check: String,
    pub severity: Severity,
    pub message: String,
    /// OID of the offending entity, when one exists. Lookup only; a finding
    /// never keeps the entity alive.
    pub oid: Option<String>,
}

/// Findings emitted by a single layer, in emission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerReport {
    pub layer: LayerId,
    pub findings: Vec<Finding>,
}

impl LayerReport {
    pub fn count_at(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }

    pub fn worst(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunStatus {
    Pass,
    Fail,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Pass => write!(f, "PASS"),
            RunStatus::Fail => write!(f, "FAIL"),
        }
    }
}

/// Tamper-evident provenance record bound to one validation run.
///
/// The hash covers the raw input bytes as received, before any parsing or
/// normalization, so any byte change in the document is detectable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// "VAL-<UTC timestamp>-<hash prefix>".
    pub validation_id: String,
    /// 64-char lowercase hex SHA-256 of the raw input bytes.
    pub sha256: String,
    /// RFC 3339 UTC timestamp of the run.
    pub timestamp: String,
    pub input_bytes: u64,
}

/// The complete outcome of one validation run. Immutable once produced;
/// a new run always produces a new result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Per-layer reports in fixed layer order. Layers that were not
    /// requested (or had no external outcome, for layer 1) are absent.
    pub layers: Vec<LayerReport>,
    pub status: RunStatus,
    pub strict: bool,
    pub audit: AuditRecord,
}

impl ValidationResult {
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.layers.iter().flat_map(|report| report.findings.iter())
    }

    pub fn finding_count(&self) -> usize {
        self.layers.iter().map(|report| report.findings.len()).sum()
    }

    pub fn count_at(&self, severity: Severity) -> usize {
        self.layers.iter().map(|report| report.count_at(severity)).sum()
    }

    pub fn layer(&self, layer: LayerId) -> Option<&LayerReport> {
        self.layers.iter().find(|report| report.layer == layer)
    }

    pub fn is_pass(&self) -> bool {
        self.status == RunStatus::Pass
    }
}

/// Outcome of the external XML-schema validator, consumed as-is by layer 1.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaOutcome {
    pub valid: bool,
    #[serde(default)]
    pub messages: Vec<SchemaMessage>,
}

/// One (location, message) pair from the external schema validator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaMessage {
    #[serde(default)]
    pub location: Option<String>,
    pub message: String,
}
