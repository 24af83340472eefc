//! Error types for Screen Wellness

use thiserror::Error;

/// Errors that can occur around the scoring engine.
///
/// Scoring itself never fails for a well-typed snapshot; these variants cover
/// the parsing and encoding stages on either side of it.
#[derive(Debug, Error)]
pub enum WellnessError {
    #[error("Failed to parse usage snapshot: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("No data provided")]
    EmptyInput,

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

/// Errors raised by a networked insight generator.
///
/// These never leave [`crate::insight::InsightService`]; they are logged and
/// replaced by the local template.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("Missing API key: {0} not set")]
    MissingApiKey(String),

    #[error("Insight request failed: {0}")]
    RequestFailed(String),

    #[error("Insight API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse insight response: {0}")]
    ParseError(String),
}
