//! JSON report payload for machine consumers.

use anyhow::Result;
use serde::Serialize;

use define_model::{AuditRecord, Finding, Severity, ValidationResult};

const REPORT_SCHEMA: &str = "define-validator.validation-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub struct ReportPayload<'a> {
    pub schema: &'static str,
    pub schema_version: u32,
    pub status: String,
    pub strict: bool,
    pub total_findings: usize,
    pub critical_findings: usize,
    pub audit: &'a AuditRecord,
    pub layers: Vec<LayerSummary<'a>>,
}

#[derive(Debug, Serialize)]
pub struct LayerSummary<'a> {
    pub layer: u8,
    pub name: &'static str,
    pub finding_count: usize,
    pub findings: &'a [Finding],
}

pub fn payload(result: &ValidationResult) -> ReportPayload<'_> {
    ReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        status: result.status.to_string(),
        strict: result.strict,
        total_findings: result.finding_count(),
        critical_findings: result.count_at(Severity::Critical),
        audit: &result.audit,
        layers: result
            .layers
            .iter()
            .map(|report| LayerSummary {
                layer: report.layer.number(),
                name: report.layer.name(),
                finding_count: report.findings.len(),
                findings: &report.findings,
            })
            .collect(),
    }
}

pub fn render_json(result: &ValidationResult) -> Result<String> {
    let json = serde_json::to_string_pretty(&payload(result))?;
    Ok(format!("{json}\n"))
}
