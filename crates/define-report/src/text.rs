//! Plain-text report rendering for terminals and review archives.

use std::fmt::Write;

use define_model::{Severity, ValidationResult};

pub fn render_text(result: &ValidationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Define-XML Validation Report");
    let _ = writeln!(out, "============================");
    let _ = writeln!(out, "Validation ID: {}", result.audit.validation_id);
    let _ = writeln!(out, "SHA-256:       {}", result.audit.sha256);
    let _ = writeln!(out, "Timestamp:     {}", result.audit.timestamp);
    let _ = writeln!(out, "Status:        {}", result.status);
    let _ = writeln!(out);

    if result.layers.is_empty() {
        let _ = writeln!(out, "No layers were run.");
        return out;
    }

    for report in &result.layers {
        let _ = writeln!(out, "{}: {} finding(s)", report.layer, report.findings.len());
        for finding in &report.findings {
            match &finding.oid {
                Some(oid) => {
                    let _ = writeln!(
                        out,
                        "  [{}] {} {} ({})",
                        finding.severity, finding.rule_id, finding.message, oid
                    );
                }
                None => {
                    let _ = writeln!(
                        out,
                        "  [{}] {} {}",
                        finding.severity, finding.rule_id, finding.message
                    );
                }
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Total: {} finding(s), {} critical",
        result.finding_count(),
        result.count_at(Severity::Critical)
    );
    out
}
