//! CLI argument definitions for the Define-XML validator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "define-validator",
    version,
    about = "Define-XML Validator - layered compliance checks for define.xml",
    long_about = "Validate CDISC define.xml metadata documents for regulatory submission.\n\n\
                  Runs up to seven ordered rule layers (structural, business rules,\n\
                  controlled terminology, completeness, computational methods, and\n\
                  reference-graph patterns) and seals every run with a SHA-256 audit record."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a define.xml file.
    Validate(ValidateArgs),

    /// List every check the engine can emit.
    Checks,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Path to the define.xml file.
    #[arg(value_name = "DEFINE_XML")]
    pub file: PathBuf,

    /// JSON configuration with severity overrides and required term lists.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// JSON outcome of an external XSD schema validator (layer 1 input).
    /// Without it, layer 1 is skipped.
    #[arg(long = "schema-result", value_name = "PATH")]
    pub schema_result: Option<PathBuf>,

    /// Write the report to a file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Report format.
    #[arg(long = "format", short = 'f', value_enum, default_value = "text")]
    pub format: ReportFormatArg,

    /// Fail the run when any WARNING finding exists.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Specific validation layers to run (1-7), comma separated.
    #[arg(long = "layers", value_name = "N", value_delimiter = ',')]
    pub layers: Vec<u8>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportFormatArg {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
