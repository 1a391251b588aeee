//! Layer 4: controlled terminology.
//!
//! The declared term set of configured codelists must be a superset of the
//! externally mandated term set; missing terms are reported individually,
//! in configured-list order.

use std::collections::BTreeSet;

use define_model::{CodeList, DocumentModel, Finding, LayerId, Severity, ValidationConfig};

use super::finding;

pub fn run(model: &DocumentModel, config: &ValidationConfig) -> Vec<Finding> {
    let mut findings = Vec::new();

    // CHECK 4.1: RACE codelist completeness. Only documents that carry
    // terminology at all are expected to declare RACE.
    match model.codelist_by_name_or_oid("RACE", "CL.RACE") {
        Some(codelist) => findings.extend(missing_term_findings(
            codelist,
            &config.required_race_terms,
            "TERM-001",
            "race_terminology",
            config.severity_for("race_terminology", Severity::Major),
        )),
        None if !model.codelists.is_empty() => findings.push(finding(
            LayerId::Terminology,
            "TERM-001A",
            "race_terminology",
            config.severity_for("race_terminology", Severity::Major),
            "RACE codelist not found in define.xml".to_string(),
            None,
        )),
        None => {}
    }

    // CHECK 4.2: SEX codelist completeness. Absence is not itself a finding.
    if let Some(codelist) = model.codelist_by_name_or_oid("SEX", "CL.SEX") {
        findings.extend(missing_term_findings(
            codelist,
            &config.required_sex_terms,
            "TERM-002",
            "sex_terminology",
            config.severity_for("sex_terminology", Severity::Major),
        ));
    }

    // CHECK 4.3: at least one codelist should cite a published CT standard.
    let has_standard_refs = model.codelists.iter().any(|c| c.standard_oid.is_some());
    if !model.codelists.is_empty() && !has_standard_refs {
        findings.push(finding(
            LayerId::Terminology,
            "TERM-003",
            "ct_standard_refs",
            config.severity_for("ct_standard_refs", Severity::Info),
            "No CDISC CT standard OID references found".to_string(),
            None,
        ));
    }

    findings
}

fn missing_term_findings(
    codelist: &CodeList,
    required: &[String],
    rule_id: &str,
    check: &str,
    severity: Severity,
) -> Vec<Finding> {
    // Match against both submission values and decoded values, uppercased.
    let declared: BTreeSet<String> = codelist
        .terms
        .iter()
        .flat_map(|term| {
            std::iter::once(term.coded_value.to_uppercase())
                .chain(term.decode.as_deref().map(str::to_uppercase))
        })
        .collect();

    required
        .iter()
        .filter(|term| !declared.contains(&term.to_uppercase()))
        .map(|term| {
            finding(
                LayerId::Terminology,
                rule_id,
                check,
                severity,
                format!(
                    "{} codelist missing required term: '{}'",
                    codelist.name, term
                ),
                Some(&codelist.oid),
            )
        })
        .collect()
}
