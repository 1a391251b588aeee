//! Audit record sealing.
//!
//! The hash covers the raw input bytes as received, before any parsing or
//! normalization, so a report can later be proven to correspond to one
//! byte-identical input.

use chrono::{DateTime, SecondsFormat, Utc};
use sha2::Digest;

use define_model::AuditRecord;

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    hex::encode(digest)
}

/// Seal an audit record over the raw input bytes at the current time.
pub fn seal(input_bytes: &[u8]) -> AuditRecord {
    seal_at(input_bytes, Utc::now())
}

/// Seal at an explicit timestamp. The validation id is derived from the
/// content hash, so identical input sealed at the same instant yields an
/// identical record.
pub fn seal_at(input_bytes: &[u8], at: DateTime<Utc>) -> AuditRecord {
    let sha256 = sha256_hex(input_bytes);
    let validation_id = format!("VAL-{}-{}", at.format("%Y%m%d%H%M%S"), &sha256[..8]);
    AuditRecord {
        validation_id,
        sha256,
        timestamp: at.to_rfc3339_opts(SecondsFormat::Secs, true),
        input_bytes: input_bytes.len() as u64,
    }
}
