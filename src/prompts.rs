//! Prompt template for quiz generation.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — the template's wording is a
//!    reproducibility contract; changing it means quizzes generated before
//!    and after are not comparable. One constant, one place to diff.
//!
//! 2. **Testability** — unit tests can assemble and inspect the prompt
//!    without a live model, so slot regressions are caught immediately.
//!
//! Callers can override the default via
//! [`crate::config::QuizConfig::prompt_template`]; the constant here is used
//! only when no override is provided.

/// Default quiz-generation prompt.
///
/// Contains exactly one occurrence of each named slot: `{text}`, `{number}`,
/// `{tone}`, `{response_json}`. The no-repeated-questions instruction and
/// the conform-to-RESPONSE_JSON instruction are part of the contract.
pub const DEFAULT_QUIZ_TEMPLATE: &str = r#"
Text: {text}
You are an expert MCQ maker. Given the above text, it is your job to create a quiz of {number} multiple choice questions for students in {tone} tone.
Make sure the questions are not repeated and check all the questions to be conforming the text as well.
Make sure to format your response like RESPONSE_JSON below and use it as a guide.
### RESPONSE_JSON
{response_json}
"#;

/// Substitute the four named slots into `template`.
///
/// Each slot is replaced wherever it appears in the template; the default
/// template carries each exactly once. Substitution is a single pass over
/// the template, so slot-shaped substrings inside the inserted values (a
/// document that literally contains `{tone}`, say) are never rewritten.
/// `response_json` must already be serialised JSON text (see
/// [`crate::template::ResponseTemplate::to_prompt_json`]).
pub fn build_prompt(
    template: &str,
    text: &str,
    number: usize,
    tone: &str,
    response_json: &str,
) -> String {
    let number = number.to_string();
    let slots: [(&str, &str); 4] = [
        ("{text}", text),
        ("{number}", &number),
        ("{tone}", tone),
        ("{response_json}", response_json),
    ];

    let mut out = String::with_capacity(template.len() + text.len() + response_json.len());
    let mut rest = template;
    'scan: while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        for (slot, value) in slots {
            if tail.starts_with(slot) {
                out.push_str(value);
                rest = &tail[slot.len()..];
                continue 'scan;
            }
        }
        // A brace that opens no known slot is ordinary template text.
        out.push('{');
        rest = &tail[1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::ResponseTemplate;

    #[test]
    fn default_template_has_each_slot_exactly_once() {
        for slot in ["{text}", "{number}", "{tone}", "{response_json}"] {
            assert_eq!(
                DEFAULT_QUIZ_TEMPLATE.matches(slot).count(),
                1,
                "slot {slot} must appear exactly once"
            );
        }
    }

    #[test]
    fn default_template_keeps_contract_instructions() {
        assert!(DEFAULT_QUIZ_TEMPLATE.contains("not repeated"));
        assert!(DEFAULT_QUIZ_TEMPLATE.contains("RESPONSE_JSON"));
    }

    #[test]
    fn build_prompt_substitutes_all_slots() {
        let template_json = ResponseTemplate::example(3).to_prompt_json();
        let prompt = build_prompt(
            DEFAULT_QUIZ_TEMPLATE,
            "The mitochondria is the powerhouse of the cell.",
            3,
            "simple",
            &template_json,
        );

        assert!(prompt.contains("The mitochondria is the powerhouse of the cell."));
        assert!(prompt.contains("a quiz of 3 multiple choice questions"));
        assert!(prompt.contains("in simple tone"));
        for key in ["\"1\"", "\"2\"", "\"3\""] {
            assert!(prompt.contains(key), "template key {key} missing");
        }
        assert!(!prompt.contains("{text}"));
        assert!(!prompt.contains("{response_json}"));
    }

    #[test]
    fn document_text_with_slot_shaped_braces_survives_unchanged() {
        let doc = "The template uses a {tone} placeholder and a {number} slot.";
        let prompt = build_prompt(DEFAULT_QUIZ_TEMPLATE, doc, 3, "simple", "{}");

        assert!(
            prompt.contains(doc),
            "document text must pass through verbatim, got: {prompt}"
        );
        // The template's own slots are still substituted.
        assert!(prompt.contains("a quiz of 3 multiple choice questions"));
        assert!(prompt.contains("in simple tone"));
    }

    #[test]
    fn unknown_braces_in_template_are_left_alone() {
        let prompt = build_prompt("{text} and {other} stay", "doc", 1, "hard", "{}");
        assert_eq!(prompt, "doc and {other} stay");
    }
}
