pub mod config;
pub mod entities;
pub mod error;
pub mod finding;

pub use config::ValidationConfig;
pub use entities::{
    CodeList, Dataset, DocumentModel, EntityKind, Method, OriginKind, StandardDecl, Term,
    ValueList, Variable, VariableRef,
};
pub use error::{DefineError, Result};
pub use finding::{
    AuditRecord, Finding, LayerId, LayerReport, RunStatus, SchemaMessage, SchemaOutcome,
    Severity, ValidationResult,
};
