//! Layer 6: computational method quality.
//!
//! Looks at each derived variable's method and judges whether its
//! description clears the configured quality bar.

use define_model::{DocumentModel, Finding, LayerId, Method, Severity, ValidationConfig, Variable};

use super::finding;
use crate::graph::ReferenceGraph;

/// Tokens that indicate a description actually spells out derivation logic
/// (SAS fragments, assignments, conditionals).
const DERIVATION_KEYWORDS: &[&str] = &["proc ", "data ", "if ", "then", "="];

pub fn run(
    model: &DocumentModel,
    _graph: &ReferenceGraph,
    config: &ValidationConfig,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    let has_derived = model.variables.iter().any(Variable::is_derived);
    if model.methods.is_empty() {
        if has_derived {
            findings.push(finding(
                LayerId::Methods,
                "METH-001",
                "methods_present",
                config.severity_for("methods_present", Severity::Info),
                "No computational methods defined (unusual for derived variables)".to_string(),
                None,
            ));
        }
        return findings;
    }

    for variable in &model.variables {
        if !variable.is_derived() {
            continue;
        }
        let Some(method_oid) = &variable.method_oid else {
            // Missing reference is BUS-001; an unresolved one is PAT-001.
            continue;
        };
        let Some(method) = model.method(method_oid) else {
            continue;
        };
        findings.extend(method_quality_findings(variable, method, config));
    }

    findings
}

fn method_quality_findings(
    variable: &Variable,
    method: &Method,
    config: &ValidationConfig,
) -> Vec<Finding> {
    let description = method.description.as_deref().map(str::trim).unwrap_or("");
    if description.is_empty() {
        return vec![finding(
            LayerId::Methods,
            "METH-004",
            "method_quality",
            config.severity_for("method_quality", Severity::Major),
            format!(
                "Method '{}' for derived variable '{}' has no description",
                method.name, variable.name
            ),
            Some(&method.oid),
        )];
    }

    let mut findings = Vec::new();
    if description.len() < config.brief_method_description_len {
        findings.push(finding(
            LayerId::Methods,
            "METH-002",
            "method_quality",
            config.severity_for("method_quality", Severity::Warning),
            format!(
                "Method '{}' has very brief description ({} chars)",
                method.name,
                description.len()
            ),
            Some(&method.oid),
        ));
    }
    if !references_derivation(variable, method, description) {
        findings.push(finding(
            LayerId::Methods,
            "METH-003",
            "method_quality",
            config.severity_for("method_quality", Severity::Info),
            format!(
                "Method '{}' description does not reference the derivation of '{}'",
                method.name, variable.name
            ),
            Some(&method.oid),
        ));
    }
    findings
}

/// A description references the derivation logic when it names the derived
/// variable, carries a formal expression, or contains code-like tokens.
fn references_derivation(variable: &Variable, method: &Method, description: &str) -> bool {
    if method.formal_expression.is_some() {
        return true;
    }
    let lower = description.to_lowercase();
    if lower.contains(&variable.name.to_lowercase()) {
        return true;
    }
    DERIVATION_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}
