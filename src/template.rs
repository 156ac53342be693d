//! The response-shape template embedded in the outbound prompt.
//!
//! The template plays a double role: it is serialised into the prompt as a
//! formatting example for the model, and it documents the shape the parser
//! expects back. Keys are the 1-based question indices as strings ("1",
//! "2", ...) in ascending order; every entry carries exactly four option
//! keys `a`..`d` by construction.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Placeholder option text used by [`ResponseTemplate::example`].
const PLACEHOLDER_CHOICE: &str = "choice here";

/// One example question entry inside a [`ResponseTemplate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateQuestion {
    /// Example question stem.
    pub mcq: String,
    /// Example option texts for keys a..d.
    pub options: TemplateOptions,
    /// Example correct-answer marker.
    pub correct: String,
}

/// The four labelled options of a template entry.
///
/// Field order is serialisation order, so the prompt always shows
/// `a, b, c, d`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateOptions {
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
}

/// Ordered question-index -> entry mapping serialised into the prompt.
///
/// Serialises as a JSON object keyed `"1"`, `"2"`, ... in order:
///
/// ```json
/// {"1": {"mcq": "...", "options": {"a": "...", ...}, "correct": "..."}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseTemplate {
    questions: Vec<TemplateQuestion>,
}

impl ResponseTemplate {
    /// Build a template of `count` identical placeholder entries, matching
    /// the wording models have been steered with historically.
    pub fn example(count: usize) -> Self {
        let entry = TemplateQuestion {
            mcq: "multiple choice question".to_string(),
            options: TemplateOptions {
                a: PLACEHOLDER_CHOICE.to_string(),
                b: PLACEHOLDER_CHOICE.to_string(),
                c: PLACEHOLDER_CHOICE.to_string(),
                d: PLACEHOLDER_CHOICE.to_string(),
            },
            correct: "correct answer".to_string(),
        };
        Self {
            questions: vec![entry; count],
        }
    }

    /// Build a template from explicit entries; keys become "1".."n".
    pub fn from_questions(questions: Vec<TemplateQuestion>) -> Self {
        Self { questions }
    }

    /// Number of example entries.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// True when the template holds no entries.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Serialise to the compact JSON text embedded in the prompt.
    ///
    /// Default escaping, no pretty-printing; must always be valid JSON.
    pub fn to_prompt_json(&self) -> String {
        // Serialisation of string-keyed maps cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for ResponseTemplate {
    /// Three placeholder entries, the shape the original prompt shipped with.
    fn default() -> Self {
        Self::example(3)
    }
}

impl Serialize for ResponseTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.questions.len()))?;
        for (i, q) in self.questions.iter().enumerate() {
            map.serialize_entry(&(i + 1).to_string(), q)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_has_requested_length() {
        assert_eq!(ResponseTemplate::example(5).len(), 5);
        assert!(ResponseTemplate::example(0).is_empty());
    }

    #[test]
    fn serialises_with_ordered_numeric_keys() {
        let json = ResponseTemplate::example(3).to_prompt_json();
        let one = json.find("\"1\"").expect("key 1");
        let two = json.find("\"2\"").expect("key 2");
        let three = json.find("\"3\"").expect("key 3");
        assert!(one < two && two < three, "keys out of order: {json}");
    }

    #[test]
    fn serialised_entry_shape_matches_contract() {
        let json = ResponseTemplate::example(1).to_prompt_json();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entry = &v["1"];
        assert_eq!(entry["mcq"], "multiple choice question");
        assert_eq!(entry["correct"], "correct answer");
        for key in ["a", "b", "c", "d"] {
            assert_eq!(entry["options"][key], PLACEHOLDER_CHOICE);
        }
    }

    #[test]
    fn options_serialise_in_a_to_d_order() {
        let json = ResponseTemplate::example(1).to_prompt_json();
        let a = json.find("\"a\"").unwrap();
        let d = json.find("\"d\"").unwrap();
        assert!(a < d);
    }

    #[test]
    fn default_is_three_entries() {
        assert_eq!(ResponseTemplate::default().len(), 3);
    }
}
