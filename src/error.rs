//! Error types for the mcqgen library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`McqGenError`] — **Fatal**: the quiz cannot be generated at all
//!   (unsupported file, unreadable PDF, missing API key, failed completion
//!   call). Returned as `Err(McqGenError)` from the top-level `generate*`
//!   functions.
//!
//! * [`ParseError`] — **Non-fatal**: the completion call succeeded but the
//!   model's reply could not be shaped into quiz rows. Stored inside
//!   [`crate::output::QuizOutput`] so callers can fall back to displaying
//!   the raw reply instead of aborting the whole interaction.
//!
//! The separation encodes the failure policy directly in the types: reader
//! and invoker failures propagate, parser failures degrade gracefully.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the mcqgen library.
///
/// Reply-shape failures use [`ParseError`] and are stored in
/// [`crate::output::QuizOutput`] rather than propagated here.
#[derive(Debug, Error)]
pub enum McqGenError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file extension is neither `.pdf` nor `.txt`.
    ///
    /// Content is never sniffed; an unknown extension fails immediately.
    #[error("Unsupported file format '{extension}' for '{name}'\nSupported formats: .pdf, .txt")]
    UnsupportedFormat { name: String, extension: String },

    /// The PDF could not be opened or a page's text extraction failed.
    #[error("Failed to extract text from PDF '{name}': {detail}")]
    PdfExtraction { name: String, detail: String },

    /// A `.txt` input was not valid UTF-8.
    #[error("File '{name}' is not valid UTF-8 text: {detail}")]
    InvalidUtf8 { name: String, detail: String },

    /// The document yielded no text to build a quiz from.
    #[error("Source document is empty: nothing to build a quiz from")]
    EmptyDocument,

    // ── LLM errors ────────────────────────────────────────────────────────
    /// No API key was found in the environment.
    #[error(
        "No API key configured.\nSet {var} (or pass an explicit provider) before generating."
    )]
    MissingApiKey { var: &'static str },

    /// The completion endpoint rejected the credentials (HTTP 401/403).
    #[error("Authentication failed for '{endpoint}': {detail}")]
    AuthFailed { endpoint: String, detail: String },

    /// The completion endpoint returned a non-2xx status.
    #[error("Chat API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The completion call exceeded the configured timeout.
    #[error("Chat completion timed out after {secs}s\nIncrease --api-timeout.")]
    ApiTimeout { secs: u64 },

    /// Network-level failure before or during the completion call.
    #[error("Chat completion request failed: {detail}\nCheck your internet connection.")]
    Transport { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal reply-shaping failure.
///
/// Produced by [`crate::pipeline::parse::extract_rows`] when the model's
/// reply is not the expected JSON mapping. Stored in
/// [`crate::output::QuizOutput::parse_error`]; the caller shows the raw
/// reply text instead of a table.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum ParseError {
    /// The (fence-stripped) reply is not valid JSON at all.
    #[error("Reply is not valid JSON: {detail}")]
    InvalidJson { detail: String },

    /// The reply parsed, but the top-level value is not an object.
    #[error("Reply is valid JSON but not an object (got {found})")]
    NotAnObject { found: String },

    /// A question record is missing a required field.
    #[error("Question {question:?} is missing required field `{field}`")]
    MissingField { question: String, field: String },

    /// A question record field has the wrong JSON type.
    #[error("Question {question:?}: field `{field}` must be {expected}")]
    WrongType {
        question: String,
        field: String,
        expected: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_display() {
        let e = McqGenError::UnsupportedFormat {
            name: "notes.docx".into(),
            extension: "docx".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("docx"), "got: {msg}");
        assert!(msg.contains(".pdf, .txt"), "got: {msg}");
    }

    #[test]
    fn missing_api_key_display() {
        let e = McqGenError::MissingApiKey {
            var: "OPENAI_API_KEY",
        };
        assert!(e.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn api_timeout_display() {
        let e = McqGenError::ApiTimeout { secs: 60 };
        assert!(e.to_string().contains("60s"));
    }

    #[test]
    fn auth_failed_display() {
        let e = McqGenError::AuthFailed {
            endpoint: "https://openrouter.ai/api/v1".into(),
            detail: "invalid key".into(),
        };
        assert!(e.to_string().contains("openrouter.ai"));
        assert!(e.to_string().contains("invalid key"));
    }

    #[test]
    fn parse_error_missing_field_display() {
        let e = ParseError::MissingField {
            question: "2".into(),
            field: "options".into(),
        };
        assert!(e.to_string().contains("\"2\""));
        assert!(e.to_string().contains("`options`"));
    }

    #[test]
    fn parse_error_round_trips_through_serde() {
        let e = ParseError::WrongType {
            question: "1".into(),
            field: "mcq".into(),
            expected: "a string".into(),
        };
        let json = serde_json::to_string(&e).unwrap();
        let back: ParseError = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, ParseError::WrongType { .. }));
    }
}
