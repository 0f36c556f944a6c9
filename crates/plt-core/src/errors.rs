//! ---
//! plt_section: "01-telemetry-core"
//! plt_subsection: "module"
//! plt_type: "source"
//! plt_scope: "code"
//! plt_description: "Error types for the telemetry processing core."
//! plt_version: "v0.1.0"
//! plt_owner: "tbd"
//! ---
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Failure to turn one raw input line into a [`crate::TelemetryRecord`].
///
/// There is no recovery at the parsing layer; the caller decides whether to
/// skip, halt, or report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected 4 comma-separated fields, found {found}")]
    FieldCount { found: usize },
    #[error("unrecognised timestamp {token:?}")]
    Timestamp { token: String },
    #[error("field {field} is not a number: {token:?}")]
    Number { field: &'static str, token: String },
}

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("malformed telemetry line {line:?}: {source}")]
    Parse {
        line: String,
        #[source]
        source: ParseError,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
