//! Output types: the raw invoker result, parsed rows, and usage accounting.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};

/// Token and cost accounting for a single completion call.
///
/// All token counts are non-negative by type; `total_cost` is USD and never
/// negative. When the provider omits `total_tokens` it is synthesised as
/// `prompt_tokens + completion_tokens`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    /// Tokens consumed by the assembled prompt.
    pub prompt_tokens: u64,
    /// Tokens generated in the completion.
    pub completion_tokens: u64,
    /// Total tokens for the call.
    pub total_tokens: u64,
    /// Estimated cost in USD (provider-reported or pricing-table derived).
    pub total_cost: f64,
}

/// The invoker's product: the model's reply verbatim plus usage accounting.
///
/// `quiz` is untouched text; fence stripping and JSON parsing are the
/// parser's job, not the invoker's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResult {
    /// Raw textual reply from the model, byte-for-byte.
    pub quiz: String,
    /// Token/cost accounting for the call.
    pub usage: UsageStats,
    /// Model identifier that served the request.
    pub model: String,
}

/// One multiple-choice question as a flat table row.
///
/// Serde renames keep the JSON column names (`MCQ`, `Correct`) identical to
/// the tabular display the tool has always produced. Options absent from the
/// reply come through as empty strings rather than failing the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRow {
    /// The question stem.
    #[serde(rename = "MCQ")]
    pub mcq: String,
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
    /// The designated correct option label.
    #[serde(rename = "Correct")]
    pub correct: String,
}

/// Full result of a generation run.
///
/// `rows` and `parse_error` are mutually exclusive: a parse failure leaves
/// `rows` empty and records why, so callers can show `raw_reply` as the
/// display fallback instead of crashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizOutput {
    /// The model's reply, verbatim.
    pub raw_reply: String,
    /// Parsed quiz rows, in the reply's own key order. Empty on parse failure.
    pub rows: Vec<QuizRow>,
    /// Why parsing failed, if it did.
    pub parse_error: Option<ParseError>,
    /// Token/cost accounting for the completion call.
    pub usage: UsageStats,
    /// Model identifier that served the request.
    pub model: String,
    /// Wall-clock duration of the whole run in milliseconds.
    pub duration_ms: u64,
}

impl QuizOutput {
    /// True when the reply was successfully shaped into rows.
    pub fn is_parsed(&self) -> bool {
        self.parse_error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_row_serialises_with_original_column_names() {
        let row = QuizRow {
            mcq: "Q?".into(),
            a: "A".into(),
            b: "B".into(),
            c: "C".into(),
            d: "D".into(),
            correct: "a".into(),
        };
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"MCQ\":\"Q?\""));
        assert!(json.contains("\"Correct\":\"a\""));
        assert!(!json.contains("\"mcq\""));
    }

    #[test]
    fn usage_defaults_are_zero() {
        let u = UsageStats::default();
        assert_eq!(u.total_tokens, 0);
        assert_eq!(u.total_cost, 0.0);
    }

    #[test]
    fn is_parsed_tracks_parse_error() {
        let out = QuizOutput {
            raw_reply: "{}".into(),
            rows: vec![],
            parse_error: None,
            usage: UsageStats::default(),
            model: "test".into(),
            duration_ms: 0,
        };
        assert!(out.is_parsed());

        let failed = QuizOutput {
            parse_error: Some(crate::error::ParseError::NotAnObject {
                found: "array".into(),
            }),
            ..out
        };
        assert!(!failed.is_parsed());
    }
}
