use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{DefineError, Result};
use crate::finding::Severity;

/// Immutable per-run validation configuration.
///
/// Passed explicitly into each run, never held as global state, so runs stay
/// independent. Every field has a default; a JSON config file only needs the
/// keys it wants to override.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Accepted SDTMIG versions for the declared standard.
    pub required_sdtmig_versions: BTreeSet<String>,
    /// Decoded values the RACE codelist must cover (FDA-required set).
    pub required_race_terms: Vec<String>,
    /// Submission values the SEX codelist must cover.
    pub required_sex_terms: Vec<String>,
    /// Per-check severity overrides, keyed by check id.
    pub validation_criticality: BTreeMap<String, Severity>,
    /// Minimum method description length before a completeness finding.
    pub min_method_description_len: usize,
    /// Descriptions shorter than this draw a quality warning in layer 6.
    pub brief_method_description_len: usize,
    /// Emit INFO findings for declared-but-unreferenced codelists/methods.
    pub report_unused: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        let mut criticality = BTreeMap::new();
        criticality.insert("derived_no_method".to_string(), Severity::Critical);
        criticality.insert("invalid_codelist_ref".to_string(), Severity::Critical);
        criticality.insert("missing_structure".to_string(), Severity::Major);
        Self {
            required_sdtmig_versions: ["3.2", "3.3", "3.4"]
                .iter()
                .map(|v| (*v).to_string())
                .collect(),
            required_race_terms: [
                "AMERICAN INDIAN OR ALASKA NATIVE",
                "ASIAN",
                "BLACK OR AFRICAN AMERICAN",
                "NATIVE HAWAIIAN OR OTHER PACIFIC ISLANDER",
                "WHITE",
                "MULTIPLE",
                "NOT REPORTED",
                "OTHER",
                "UNKNOWN",
            ]
            .iter()
            .map(|v| (*v).to_string())
            .collect(),
            required_sex_terms: ["M", "F", "U"].iter().map(|v| (*v).to_string()).collect(),
            validation_criticality: criticality,
            min_method_description_len: 20,
            brief_method_description_len: 50,
            report_unused: false,
        }
    }
}

impl ValidationConfig {
    /// Parse a JSON override file. Unspecified keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| DefineError::Config(e.to_string()))
    }

    /// Severity for a check, falling back when no override is configured.
    pub fn severity_for(&self, check: &str, fallback: Severity) -> Severity {
        self.validation_criticality
            .get(check)
            .copied()
            .unwrap_or(fallback)
    }
}
