//! Configuration types for quiz generation.
//!
//! All generation behaviour is controlled through [`QuizConfig`], built via
//! its [`QuizConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across requests, log them, and diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! The builder lets callers set only what they care about and rely on
//! well-documented defaults for the rest; `build()` validates the result.

use crate::error::McqGenError;
use crate::pipeline::llm::ChatProvider;
use crate::template::ResponseTemplate;
use std::fmt;
use std::sync::Arc;

/// Configuration for a quiz-generation request.
///
/// Built via [`QuizConfig::builder()`] or using [`QuizConfig::default()`].
///
/// # Example
/// ```rust
/// use mcqgen::QuizConfig;
///
/// let config = QuizConfig::builder()
///     .questions(10)
///     .tone("hard")
///     .model("openai/gpt-oss-120b")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct QuizConfig {
    /// How many questions to ask for. Minimum 1. Default: 5.
    pub questions: usize,

    /// Difficulty/style label passed through to the model as a soft
    /// instruction, e.g. "simple", "medium", "hard". Not validated.
    /// Default: "medium".
    pub tone: String,

    /// Model identifier, e.g. "openai/gpt-oss-120b".
    /// If None, uses the provider default.
    pub model: Option<String>,

    /// Chat-completion endpoint base URL (OpenAI-compatible).
    /// If None, uses the built-in OpenRouter default.
    pub api_base: Option<String>,

    /// Pre-constructed provider. Takes precedence over `api_base`/env vars.
    /// Used by tests to inject a mock without any network access.
    pub provider: Option<Arc<dyn ChatProvider>>,

    /// Sampling temperature. Default: 0.3.
    ///
    /// Question generation wants some variety but must stay faithful to the
    /// source text; values near 0.3 keep stems grounded without producing
    /// four near-identical options.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 2048.
    ///
    /// A ten-question quiz in the expected JSON shape runs 800-1500
    /// completion tokens. Setting this too low truncates the JSON mid-object
    /// and the whole reply becomes unparsable.
    pub max_tokens: usize,

    /// Per-call timeout in seconds. Default: 120.
    pub api_timeout_secs: u64,

    /// Custom prompt template. If None, uses
    /// [`crate::prompts::DEFAULT_QUIZ_TEMPLATE`]. Must carry the four slots
    /// `{text}`, `{number}`, `{tone}`, `{response_json}`.
    pub prompt_template: Option<String>,

    /// Custom response-shape template. If None, a placeholder template with
    /// `questions` entries is generated per call.
    pub response_template: Option<ResponseTemplate>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            questions: 5,
            tone: "medium".to_string(),
            model: None,
            api_base: None,
            provider: None,
            temperature: 0.3,
            max_tokens: 2048,
            api_timeout_secs: 120,
            prompt_template: None,
            response_template: None,
        }
    }
}

impl fmt::Debug for QuizConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizConfig")
            .field("questions", &self.questions)
            .field("tone", &self.tone)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("provider", &self.provider.as_ref().map(|p| p.name()))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("prompt_template", &self.prompt_template.as_ref().map(|_| "<custom>"))
            .field(
                "response_template",
                &self.response_template.as_ref().map(ResponseTemplate::len),
            )
            .finish()
    }
}

impl QuizConfig {
    /// Create a new builder for `QuizConfig`.
    pub fn builder() -> QuizConfigBuilder {
        QuizConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`QuizConfig`].
pub struct QuizConfigBuilder {
    config: QuizConfig,
}

impl QuizConfigBuilder {
    pub fn questions(mut self, n: usize) -> Self {
        self.config.questions = n.max(1);
        self
    }

    pub fn tone(mut self, tone: impl Into<String>) -> Self {
        self.config.tone = tone.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.config.api_base = Some(url.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn ChatProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn prompt_template(mut self, template: impl Into<String>) -> Self {
        self.config.prompt_template = Some(template.into());
        self
    }

    pub fn response_template(mut self, template: ResponseTemplate) -> Self {
        self.config.response_template = Some(template);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<QuizConfig, McqGenError> {
        let c = &self.config;
        if c.questions == 0 {
            return Err(McqGenError::InvalidConfig(
                "Question count must be >= 1".into(),
            ));
        }
        if c.tone.trim().is_empty() {
            return Err(McqGenError::InvalidConfig("Tone must not be empty".into()));
        }
        if let Some(ref t) = c.prompt_template {
            for slot in ["{text}", "{number}", "{tone}", "{response_json}"] {
                if !t.contains(slot) {
                    return Err(McqGenError::InvalidConfig(format!(
                        "Custom prompt template is missing the {slot} slot"
                    )));
                }
            }
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let c = QuizConfig::default();
        assert_eq!(c.questions, 5);
        assert_eq!(c.tone, "medium");
        assert!(c.model.is_none());
        assert!(c.provider.is_none());
    }

    #[test]
    fn questions_setter_clamps_to_one() {
        let c = QuizConfig::builder().questions(0).build().unwrap();
        assert_eq!(c.questions, 1);
    }

    #[test]
    fn temperature_is_clamped() {
        let c = QuizConfig::builder().temperature(9.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
        let c = QuizConfig::builder().temperature(-1.0).build().unwrap();
        assert_eq!(c.temperature, 0.0);
    }

    #[test]
    fn empty_tone_is_rejected() {
        let err = QuizConfig::builder().tone("  ").build().unwrap_err();
        assert!(matches!(err, McqGenError::InvalidConfig(_)));
    }

    #[test]
    fn custom_template_must_carry_all_slots() {
        let err = QuizConfig::builder()
            .prompt_template("make {number} questions about {text}")
            .build()
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("{tone}") || msg.contains("{response_json}"), "got: {msg}");
    }

    #[test]
    fn debug_does_not_dump_the_provider() {
        let c = QuizConfig::default();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("questions: 5"), "got: {dbg}");
    }
}
