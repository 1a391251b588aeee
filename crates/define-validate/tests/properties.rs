//! Property tests for aggregation and audit sealing.

use proptest::prelude::*;

use define_model::{Finding, LayerId, LayerReport, RunStatus, Severity};
use define_validate::{aggregate, seal, sha256_hex};

fn severity_strategy() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Info),
        Just(Severity::Warning),
        Just(Severity::Major),
        Just(Severity::Critical),
    ]
}

fn layer_strategy() -> impl Strategy<Value = LayerId> {
    (1u8..=7).prop_map(|n| LayerId::from_number(n).unwrap())
}

fn reports_strategy() -> impl Strategy<Value = Vec<LayerReport>> {
    prop::collection::vec(
        (layer_strategy(), prop::collection::vec(severity_strategy(), 0..5)),
        0..7,
    )
    .prop_map(|layers| {
        layers
            .into_iter()
            .map(|(layer, severities)| LayerReport {
                layer,
                findings: severities
                    .into_iter()
                    .enumerate()
                    .map(|(i, severity)| Finding {
                        layer,
                        rule_id: format!("T-{:03}", i + 1),
                        check: "test".to_string(),
                        severity,
                        message: "generated".to_string(),
                        oid: None,
                    })
                    .collect(),
            })
            .collect()
    })
}

proptest! {
    /// Enabling strict can only change status PASS -> FAIL, never FAIL -> PASS.
    #[test]
    fn strict_is_monotonic(reports in reports_strategy()) {
        let audit = seal(b"input");
        let relaxed = aggregate(reports.clone(), false, audit.clone());
        let strict = aggregate(reports, true, audit);
        if relaxed.status == RunStatus::Fail {
            prop_assert_eq!(strict.status, RunStatus::Fail);
        }
    }

    /// Aggregation emits layers in ascending layer order, preserving
    /// in-layer finding order.
    #[test]
    fn aggregation_orders_layers(reports in reports_strategy()) {
        let expected_findings: usize = reports.iter().map(|r| r.findings.len()).sum();
        let result = aggregate(reports, false, seal(b"input"));
        prop_assert_eq!(result.finding_count(), expected_findings);
        let numbers: Vec<u8> = result.layers.iter().map(|r| r.layer.number()).collect();
        let mut sorted = numbers.clone();
        sorted.sort_unstable();
        prop_assert_eq!(numbers, sorted);
    }

    /// INFO findings never affect status.
    #[test]
    fn info_only_always_passes(layers in prop::collection::vec(layer_strategy(), 0..7), strict in any::<bool>()) {
        let reports: Vec<LayerReport> = layers
            .into_iter()
            .map(|layer| LayerReport {
                layer,
                findings: vec![Finding {
                    layer,
                    rule_id: "T-001".to_string(),
                    check: "test".to_string(),
                    severity: Severity::Info,
                    message: "informational".to_string(),
                    oid: None,
                }],
            })
            .collect();
        let result = aggregate(reports, strict, seal(b"input"));
        prop_assert_eq!(result.status, RunStatus::Pass);
    }

    /// The content hash is a pure function of the raw bytes.
    #[test]
    fn hash_is_deterministic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        prop_assert_eq!(sha256_hex(&bytes), sha256_hex(&bytes));
        prop_assert_eq!(seal(&bytes).sha256, sha256_hex(&bytes));
    }
}
