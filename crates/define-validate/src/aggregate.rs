//! Finding aggregation and the severity policy.

use define_model::{AuditRecord, LayerReport, RunStatus, Severity, ValidationResult};

/// Merge per-layer findings into one result.
///
/// Reports are stably ordered by layer number regardless of execution
/// order; in-layer order is preserved. Status policy: FAIL iff any finding
/// is CRITICAL or MAJOR, or (`strict` and any WARNING). INFO findings never
/// affect status.
pub fn aggregate(
    mut reports: Vec<LayerReport>,
    strict: bool,
    audit: AuditRecord,
) -> ValidationResult {
    reports.sort_by_key(|report| report.layer.number());

    let mut status = RunStatus::Pass;
    for report in &reports {
        for finding in &report.findings {
            let fails = match finding.severity {
                Severity::Critical | Severity::Major => true,
                Severity::Warning => strict,
                Severity::Info => false,
            };
            if fails {
                status = RunStatus::Fail;
            }
        }
    }

    ValidationResult {
        layers: reports,
        status,
        strict,
        audit,
    }
}
