//! Terminal summary tables.

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};

use define_model::{Severity, ValidationResult};
use define_validate::CHECK_CATALOG;

/// Print a per-layer severity breakdown after a validation run.
pub fn print_summary(result: &ValidationResult) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Layer", "Name", "Critical", "Major", "Warning", "Info"]);

    for report in &result.layers {
        table.add_row(vec![
            report.layer.number().to_string(),
            report.layer.name().to_string(),
            report.count_at(Severity::Critical).to_string(),
            report.count_at(Severity::Major).to_string(),
            report.count_at(Severity::Warning).to_string(),
            report.count_at(Severity::Info).to_string(),
        ]);
    }

    eprintln!("{table}");
    eprintln!(
        "Status: {} ({} finding(s), validation id {})",
        result.status,
        result.finding_count(),
        result.audit.validation_id
    );
}

/// Print the full check catalog for the `checks` subcommand.
pub fn print_check_catalog() {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Layer", "Rule", "Check", "Default", "Description"]);

    for (layer, rule_id, check, severity, description) in CHECK_CATALOG {
        table.add_row(vec![
            layer.number().to_string(),
            (*rule_id).to_string(),
            (*check).to_string(),
            severity.to_string(),
            (*description).to_string(),
        ]);
    }

    println!("{table}");
}
