//! Generation entry points: read a document, invoke the model once, shape
//! the reply.
//!
//! ## Failure policy
//!
//! Reader and invoker failures are fatal and return `Err`. A parser failure
//! is not: the completion already cost money and the raw reply may still be
//! useful, so it is recorded in [`QuizOutput::parse_error`] and the caller
//! decides how to display it.

use crate::config::QuizConfig;
use crate::error::McqGenError;
use crate::output::QuizOutput;
use crate::pipeline::{llm, parse, reader};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Generate a quiz from a `.pdf` or `.txt` file.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// Returns `Err(McqGenError)` for unsupported formats, unreadable inputs,
/// missing credentials, and failed completion calls. An unparsable reply is
/// **not** an error; check [`QuizOutput::parse_error`].
pub async fn generate_quiz(
    input: impl AsRef<Path>,
    config: &QuizConfig,
) -> Result<QuizOutput, McqGenError> {
    let input = input.as_ref();
    info!("Reading source document: {}", input.display());
    let text = reader::read_file(input)?;
    generate_from_text(&text, config).await
}

/// Generate a quiz from an in-memory upload (`{name, bytes}`).
pub async fn generate_from_bytes(
    name: &str,
    bytes: &[u8],
    config: &QuizConfig,
) -> Result<QuizOutput, McqGenError> {
    let text = reader::read_named_bytes(name, bytes)?;
    generate_from_text(&text, config).await
}

/// Generate a quiz from already-extracted source text.
///
/// One completion call, one parse pass; no retry, no partial results.
pub async fn generate_from_text(
    text: &str,
    config: &QuizConfig,
) -> Result<QuizOutput, McqGenError> {
    if text.trim().is_empty() {
        return Err(McqGenError::EmptyDocument);
    }

    let start = Instant::now();
    let provider = llm::resolve_provider(config)?;
    let result = llm::request_quiz(&provider, text, config).await?;

    let (rows, parse_error) = match parse::extract_rows(&result.quiz) {
        Ok(rows) => (rows, None),
        Err(e) => {
            warn!(error = %e, "Could not shape reply into quiz rows; raw text preserved");
            (Vec::new(), Some(e))
        }
    };

    let duration_ms = start.elapsed().as_millis() as u64;
    info!(
        model = %result.model,
        questions = rows.len(),
        parsed = parse_error.is_none(),
        total_tokens = result.usage.total_tokens,
        duration_ms,
        "Quiz generation complete"
    );

    Ok(QuizOutput {
        raw_reply: result.quiz,
        rows,
        parse_error,
        usage: result.usage,
        model: result.model,
        duration_ms,
    })
}

/// Synchronous wrapper around [`generate_quiz`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(
    input: impl AsRef<Path>,
    config: &QuizConfig,
) -> Result<QuizOutput, McqGenError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| McqGenError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(generate_quiz(input, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_text_is_rejected_before_any_call() {
        // No provider configured; the emptiness check must fire first.
        let config = QuizConfig::default();
        let err = generate_from_text("   \n\t  ", &config).await.unwrap_err();
        assert!(matches!(err, McqGenError::EmptyDocument), "got: {err}");
    }
}
