use thiserror::Error;

#[derive(Debug, Error)]
pub enum DefineError {
    /// The input cannot be turned into a document model at all. Fatal to the
    /// run; no rule layer executes.
    #[error("structural error: {0}")]
    Structural(String),
    /// The raw bytes are not well-formed XML. Surfaced by the parser
    /// collaborator, never downgraded to a finding.
    #[error("xml parse error: {0}")]
    Parse(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DefineError>;
