//! Reply shaping: strip an optional markdown fence and validate the model's
//! JSON into flat quiz rows.
//!
//! ## Why validate explicitly?
//!
//! The reply is untrusted structured input. Indexing into it optimistically
//! turns a malformed reply into a panic deep inside field access; validating
//! every field up front turns it into a typed [`ParseError`] the caller can
//! show next to the raw text. The parser fails closed: an unexpected shape
//! anywhere aborts the whole parse rather than emitting half a quiz.
//!
//! ## Fence heuristic
//!
//! Models sometimes wrap the JSON in a ```` ```json ```` block despite the
//! prompt showing bare JSON. The extraction takes the content between the
//! first pair of triple-backtick delimiters, dropping an optional `json`
//! language tag, and degrades safely: no fence means the whole reply is the
//! payload. It is a best-effort heuristic, not a markdown parser; it assumes
//! at most one fenced block.

use crate::error::ParseError;
use crate::output::QuizRow;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static RE_FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("valid fence regex"));

/// Extract the first fenced block's content, or the input unchanged.
///
/// Whitespace adjacent to the delimiters (the newline after ```` ```json ````,
/// the newline before the closing fence) is trimmed along with them, so the
/// result is the payload rather than the raw between-delimiter substring.
///
/// Idempotent on unfenced input: `strip_fence(strip_fence(s)) == strip_fence(s)`.
pub fn strip_fence(raw: &str) -> &str {
    match RE_FENCED_BLOCK.captures(raw) {
        Some(caps) => caps.get(1).map_or(raw, |m| m.as_str()),
        None => raw,
    }
}

/// Shape the raw reply into quiz rows.
///
/// Fence-strips, parses as JSON, requires a top-level object, then walks its
/// entries in insertion order validating each record's `mcq`, `options`, and
/// `correct` fields. Missing option keys become empty strings; a missing or
/// mistyped required field aborts the whole parse.
pub fn extract_rows(raw: &str) -> Result<Vec<QuizRow>, ParseError> {
    let payload = strip_fence(raw);

    let value: Value = serde_json::from_str(payload).map_err(|e| ParseError::InvalidJson {
        detail: e.to_string(),
    })?;

    let map = value.as_object().ok_or_else(|| ParseError::NotAnObject {
        found: json_type_name(&value).to_string(),
    })?;

    let mut rows = Vec::with_capacity(map.len());
    for (question, record) in map {
        rows.push(row_from_record(question, record)?);
    }
    Ok(rows)
}

/// Validate one `{mcq, options, correct}` record into a [`QuizRow`].
fn row_from_record(question: &str, record: &Value) -> Result<QuizRow, ParseError> {
    let record = record.as_object().ok_or_else(|| ParseError::WrongType {
        question: question.to_string(),
        field: "(record)".to_string(),
        expected: "an object".to_string(),
    })?;

    let mcq = required_str(question, record, "mcq")?;
    let correct = required_str(question, record, "correct")?;

    let options = record
        .get("options")
        .ok_or_else(|| ParseError::MissingField {
            question: question.to_string(),
            field: "options".to_string(),
        })?
        .as_object()
        .ok_or_else(|| ParseError::WrongType {
            question: question.to_string(),
            field: "options".to_string(),
            expected: "an object".to_string(),
        })?;

    let option = |key: &str| -> String {
        options
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    Ok(QuizRow {
        mcq,
        a: option("a"),
        b: option("b"),
        c: option("c"),
        d: option("d"),
        correct,
    })
}

fn required_str(
    question: &str,
    record: &serde_json::Map<String, Value>,
    field: &str,
) -> Result<String, ParseError> {
    let value = record.get(field).ok_or_else(|| ParseError::MissingField {
        question: question.to_string(),
        field: field.to_string(),
    })?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ParseError::WrongType {
            question: question.to_string(),
            field: field.to_string(),
            expected: "a string".to_string(),
        })
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_QUESTION: &str = r#"{"1":{"mcq":"Q?","options":{"a":"A","b":"B","c":"C","d":"D"},"correct":"a"}}"#;

    #[test]
    fn strips_json_fence() {
        let fenced = format!("```json\n{ONE_QUESTION}\n```");
        assert_eq!(strip_fence(&fenced), ONE_QUESTION);
    }

    #[test]
    fn strips_bare_fence() {
        let fenced = format!("```\n{ONE_QUESTION}\n```");
        assert_eq!(strip_fence(&fenced), ONE_QUESTION);
    }

    #[test]
    fn unfenced_input_passes_through() {
        assert_eq!(strip_fence(ONE_QUESTION), ONE_QUESTION);
    }

    #[test]
    fn strip_fence_is_idempotent_on_unfenced_input() {
        let once = strip_fence(ONE_QUESTION);
        assert_eq!(strip_fence(once), once);
        let fenced = format!("```json\n{ONE_QUESTION}\n```");
        let once = strip_fence(&fenced);
        assert_eq!(strip_fence(once), once);
    }

    #[test]
    fn fence_with_surrounding_prose_is_extracted() {
        let reply = format!("Here is your quiz:\n```json\n{ONE_QUESTION}\n```\nEnjoy!");
        assert_eq!(strip_fence(&reply), ONE_QUESTION);
    }

    #[test]
    fn unterminated_fence_degrades_to_whole_string() {
        let reply = "```json\n{\"1\": 2}";
        assert_eq!(strip_fence(reply), reply);
    }

    #[test]
    fn parses_fenced_single_question() {
        let fenced = format!("```json\n{ONE_QUESTION}\n```");
        let rows = extract_rows(&fenced).unwrap();
        assert_eq!(
            rows,
            vec![QuizRow {
                mcq: "Q?".into(),
                a: "A".into(),
                b: "B".into(),
                c: "C".into(),
                d: "D".into(),
                correct: "a".into(),
            }]
        );
    }

    #[test]
    fn invalid_json_yields_failure_and_no_rows() {
        let err = extract_rows("{not valid json").unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson { .. }), "got: {err}");
    }

    #[test]
    fn top_level_array_is_rejected() {
        let err = extract_rows(r#"[{"mcq":"Q?"}]"#).unwrap_err();
        match err {
            ParseError::NotAnObject { found } => assert_eq!(found, "array"),
            other => panic!("expected NotAnObject, got: {other}"),
        }
    }

    #[test]
    fn missing_mcq_aborts_whole_parse() {
        let reply = r#"{
            "1":{"mcq":"Q1","options":{"a":"A","b":"B","c":"C","d":"D"},"correct":"a"},
            "2":{"options":{"a":"A","b":"B","c":"C","d":"D"},"correct":"b"}
        }"#;
        let err = extract_rows(reply).unwrap_err();
        match err {
            ParseError::MissingField { question, field } => {
                assert_eq!(question, "2");
                assert_eq!(field, "mcq");
            }
            other => panic!("expected MissingField, got: {other}"),
        }
    }

    #[test]
    fn non_string_correct_is_wrong_type() {
        let reply = r#"{"1":{"mcq":"Q?","options":{"a":"A","b":"B","c":"C","d":"D"},"correct":3}}"#;
        let err = extract_rows(reply).unwrap_err();
        assert!(matches!(err, ParseError::WrongType { .. }), "got: {err}");
    }

    #[test]
    fn missing_option_keys_become_empty_strings() {
        let reply = r#"{"1":{"mcq":"Q?","options":{"a":"A","c":"C"},"correct":"a"}}"#;
        let rows = extract_rows(reply).unwrap();
        assert_eq!(rows[0].a, "A");
        assert_eq!(rows[0].b, "");
        assert_eq!(rows[0].c, "C");
        assert_eq!(rows[0].d, "");
    }

    #[test]
    fn rows_follow_reply_insertion_order() {
        // Keys deliberately out of numeric order; the reply's own order wins.
        let reply = r#"{
            "2":{"mcq":"Second","options":{"a":"A","b":"B","c":"C","d":"D"},"correct":"a"},
            "1":{"mcq":"First","options":{"a":"A","b":"B","c":"C","d":"D"},"correct":"b"}
        }"#;
        let rows = extract_rows(reply).unwrap();
        assert_eq!(rows[0].mcq, "Second");
        assert_eq!(rows[1].mcq, "First");
    }

    #[test]
    fn empty_object_yields_empty_rows() {
        assert!(extract_rows("{}").unwrap().is_empty());
    }
}
