//! Error types for the anonymization engine.
//!
//! Two families of failure exist. Input errors (no quasi-identifiers selected,
//! a dataset without columns, an unknown column name) are caller-side
//! precondition violations and are surfaced to the user. Everything else wraps
//! I/O, Polars or JSON failures from the collaborators around the engine.
//! Odd cell content is never an error: the generalizer passes it through.
//!
//! Errors are serializable so they can be handed to a frontend as
//! `{ "code": ..., "message": ... }`.

use crate::config::ConfigValidationError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the anonymization engine.
#[derive(Error, Debug)]
pub enum AnonymizationError {
    /// No quasi-identifier column was selected.
    #[error("Select at least one quasi-identifier column")]
    NoQuasiIdentifiers,

    /// The dataset has no columns at all.
    #[error("Dataset has no columns")]
    EmptySchema,

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigValidationError),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnonymizationError>,
    },
}

impl AnonymizationError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnonymizationError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoQuasiIdentifiers => "NO_QUASI_IDENTIFIERS",
            Self::EmptySchema => "EMPTY_SCHEMA",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Config(_) => "INVALID_CONFIG",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is a caller-side input problem (bad selection,
    /// bad configuration) rather than a processing failure.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::NoQuasiIdentifiers
            | Self::EmptySchema
            | Self::ColumnNotFound(_)
            | Self::InvalidConfig(_)
            | Self::Config(_) => true,
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for AnonymizationError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnonymizationError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for anonymization operations.
pub type Result<T> = std::result::Result<T, AnonymizationError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnonymizationError::Polars(e).with_context(context))
    }
}
