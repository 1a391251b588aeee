//! Rendering tests over a fixed validation result.

use chrono::TimeZone;
use chrono::Utc;

use define_model::{Finding, LayerId, LayerReport, RunStatus, Severity, ValidationResult};
use define_report::{render_json, render_text};
use define_validate::seal_at;

fn fixed_result() -> ValidationResult {
    let at = Utc.with_ymd_and_hms(2026, 1, 2, 10, 0, 0).unwrap();
    ValidationResult {
        layers: vec![LayerReport {
            layer: LayerId::Business,
            findings: vec![Finding {
                layer: LayerId::Business,
                rule_id: "BUS-001".to_string(),
                check: "derived_no_method".to_string(),
                severity: Severity::Critical,
                message: "Derived variable 'USUBJID' missing MethodOID".to_string(),
                oid: Some("IT.DM.USUBJID".to_string()),
            }],
        }],
        status: RunStatus::Fail,
        strict: false,
        audit: seal_at(b"<ODM/>", at),
    }
}

#[test]
fn text_report_carries_audit_and_findings() {
    let text = render_text(&fixed_result());
    assert!(text.starts_with("Define-XML Validation Report"));
    assert!(text.contains("Status:        FAIL"));
    assert!(text.contains("Timestamp:     2026-01-02T10:00:00Z"));
    assert!(text.contains("Layer 3 (Business Rules): 1 finding(s)"));
    assert!(text.contains(
        "  [CRITICAL] BUS-001 Derived variable 'USUBJID' missing MethodOID (IT.DM.USUBJID)"
    ));
    assert!(text.contains("Total: 1 finding(s), 1 critical"));
}

#[test]
fn json_report_is_schema_tagged_and_parseable() {
    let json = render_json(&fixed_result()).expect("render json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("parse json");
    assert_eq!(value["schema"], "define-validator.validation-report");
    assert_eq!(value["schema_version"], 1);
    assert_eq!(value["status"], "FAIL");
    assert_eq!(value["critical_findings"], 1);
    assert_eq!(value["layers"][0]["layer"], 3);
    assert_eq!(value["layers"][0]["findings"][0]["rule_id"], "BUS-001");
    assert_eq!(value["layers"][0]["findings"][0]["severity"], "CRITICAL");
    assert_eq!(value["audit"]["sha256"].as_str().unwrap().len(), 64);
}

#[test]
fn rendering_is_deterministic() {
    let result = fixed_result();
    assert_eq!(render_text(&result), render_text(&result));
    assert_eq!(
        render_json(&result).expect("render json"),
        render_json(&result).expect("render json")
    );
}
