//! Command implementations.

use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use define_model::{SchemaOutcome, ValidationConfig, ValidationResult};
use define_report::{render_json, render_text};
use define_validate::{ValidationOptions, validate_bytes};

use crate::cli::{ReportFormatArg, ValidateArgs};

pub fn run_validate(args: &ValidateArgs) -> Result<ValidationResult> {
    let bytes = fs::read(&args.file)
        .with_context(|| format!("read define.xml from {}", args.file.display()))?;

    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read config from {}", path.display()))?;
            let config = ValidationConfig::from_json_str(&text)
                .with_context(|| format!("parse config {}", path.display()))?;
            info!(path = %path.display(), "loaded validation configuration");
            config
        }
        None => ValidationConfig::default(),
    };

    let mut options = ValidationOptions::new().with_strict(args.strict);
    if !args.layers.is_empty() {
        options = options.with_layers(
            ValidationOptions::layer_set(&args.layers).context("parse --layers")?,
        );
    }
    if let Some(path) = &args.schema_result {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read schema outcome from {}", path.display()))?;
        let outcome: SchemaOutcome = serde_json::from_str(&text)
            .with_context(|| format!("parse schema outcome {}", path.display()))?;
        options = options.with_schema_outcome(outcome);
    }

    let result = validate_bytes(&bytes, &config, &options)
        .with_context(|| format!("validate {}", args.file.display()))?;

    let rendered = match args.format {
        ReportFormatArg::Text => render_text(&result),
        ReportFormatArg::Json => render_json(&result)?,
    };
    match &args.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("write report to {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => print!("{rendered}"),
    }

    Ok(result)
}

pub fn run_checks() {
    crate::summary::print_check_catalog();
}
