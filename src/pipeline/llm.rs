//! Chat-completion interaction: assemble the prompt, make the single call,
//! account tokens and cost.
//!
//! The module is intentionally thin; all prompt wording lives in
//! [`crate::prompts`] and all reply shaping in [`crate::pipeline::parse`],
//! so transport concerns stay isolated here.
//!
//! ## Call policy
//!
//! Exactly one completion call per request. No retry, no streaming, no
//! batching. Any failure is logged with full context and propagated; the
//! caller never receives a partial result.

use crate::config::QuizConfig;
use crate::error::McqGenError;
use crate::output::{QuizResult, UsageStats};
use crate::pipeline::pricing;
use crate::prompts::{build_prompt, DEFAULT_QUIZ_TEMPLATE};
use crate::template::ResponseTemplate;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Default OpenAI-compatible endpoint (OpenRouter routes many models).
pub const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";

/// Default model when neither the config nor the environment names one.
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";

/// Environment variable consulted for the API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Secondary key variable, honoured when the primary is unset.
pub const FALLBACK_KEY_VAR: &str = "OPENROUTER_API_KEY";

/// A single chat-completion request: one user message, no history.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: usize,
}

/// A completed chat call: the reply text plus usage accounting.
///
/// `cost` is the provider-reported USD cost when available; providers that
/// do not report one leave it `None` and the caller falls back to the
/// pricing table.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
    pub model: String,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: Option<u64>,
    pub cost: Option<f64>,
}

/// The transport seam: anything that can answer a single-prompt chat call.
///
/// The library ships [`OpenAiCompatProvider`]; tests inject mocks through
/// [`crate::config::QuizConfig::provider`].
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Perform exactly one completion call for `req`.
    async fn complete(&self, req: &ChatRequest) -> Result<ChatResponse, McqGenError>;

    /// Short provider name for logs and diagnostics.
    fn name(&self) -> &str;
}

/// Build the prompt, invoke the provider once, and account usage.
///
/// The reply's textual content is returned verbatim; fence stripping and
/// JSON validation are the parser's job. Errors are logged with their full
/// detail here before propagating so the diagnostic context survives even
/// when the caller only surfaces a short message.
pub async fn request_quiz(
    provider: &Arc<dyn ChatProvider>,
    text: &str,
    config: &QuizConfig,
) -> Result<QuizResult, McqGenError> {
    let template = config
        .response_template
        .clone()
        .unwrap_or_else(|| ResponseTemplate::example(config.questions));
    let response_json = template.to_prompt_json();

    let prompt_template = config
        .prompt_template
        .as_deref()
        .unwrap_or(DEFAULT_QUIZ_TEMPLATE);
    let prompt = build_prompt(
        prompt_template,
        text,
        config.questions,
        &config.tone,
        &response_json,
    );

    let request = ChatRequest {
        model: config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        prompt,
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    };

    debug!(
        provider = provider.name(),
        model = %request.model,
        questions = config.questions,
        tone = %config.tone,
        prompt_chars = request.prompt.len(),
        "Requesting quiz completion"
    );

    let response = provider.complete(&request).await.map_err(|e| {
        error!(provider = provider.name(), model = %request.model, error = %e,
               "Quiz completion call failed");
        e
    })?;

    let total_tokens = response
        .total_tokens
        .unwrap_or(response.prompt_tokens + response.completion_tokens);
    let total_cost = response.cost.unwrap_or_else(|| {
        pricing::estimate_cost(
            &response.model,
            response.prompt_tokens,
            response.completion_tokens,
        )
    });

    debug!(
        prompt_tokens = response.prompt_tokens,
        completion_tokens = response.completion_tokens,
        total_cost, "Completion finished"
    );

    Ok(QuizResult {
        quiz: response.content,
        usage: UsageStats {
            prompt_tokens: response.prompt_tokens,
            completion_tokens: response.completion_tokens,
            total_tokens,
            total_cost: total_cost.max(0.0),
        },
        model: response.model,
    })
}

/// Resolve the provider: an injected one wins, otherwise build an
/// [`OpenAiCompatProvider`] from config and environment.
///
/// A missing API key surfaces as [`McqGenError::MissingApiKey`] here, not
/// as a silent no-op or a cryptic HTTP 401 later.
pub fn resolve_provider(config: &QuizConfig) -> Result<Arc<dyn ChatProvider>, McqGenError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    let api_key = std::env::var(API_KEY_VAR)
        .ok()
        .filter(|k| !k.is_empty())
        .or_else(|| std::env::var(FALLBACK_KEY_VAR).ok().filter(|k| !k.is_empty()))
        .ok_or(McqGenError::MissingApiKey { var: API_KEY_VAR })?;

    let base_url = config
        .api_base
        .clone()
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    let provider = OpenAiCompatProvider::new(base_url, api_key, config.api_timeout_secs)?;
    Ok(Arc::new(provider))
}

// ── OpenAI-compatible HTTP provider ──────────────────────────────────────

/// Provider for any OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiCompatProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout_secs: u64,
}

impl OpenAiCompatProvider {
    /// Build a provider with a per-call timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, McqGenError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| McqGenError::Transport {
                detail: format!("failed to build HTTP client: {e}"),
            })?;

        let base_url = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout_secs,
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatProvider {
    async fn complete(&self, req: &ChatRequest) -> Result<ChatResponse, McqGenError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = WireRequest {
            model: &req.model,
            messages: vec![WireMessage {
                role: "user",
                content: &req.prompt,
            }],
            temperature: req.temperature,
            max_tokens: req.max_tokens,
            // OpenRouter returns per-call USD cost when asked; other
            // OpenAI-compatible servers ignore the field.
            usage: WireUsageOptions { include: true },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    McqGenError::ApiTimeout {
                        secs: self.timeout_secs,
                    }
                } else {
                    McqGenError::Transport {
                        detail: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            let detail = response.text().await.unwrap_or_default();
            return Err(McqGenError::AuthFailed {
                endpoint: self.base_url.clone(),
                detail: snippet(&detail),
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(McqGenError::Api {
                status: status.as_u16(),
                message: snippet(&message),
            });
        }

        let wire: WireResponse = response.json().await.map_err(|e| McqGenError::Transport {
            detail: format!("failed to decode completion response: {e}"),
        })?;

        let content = wire
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| McqGenError::Api {
                status: status.as_u16(),
                message: "completion response contained no choices".to_string(),
            })?;

        let usage = wire.usage.unwrap_or_default();

        Ok(ChatResponse {
            content,
            model: wire.model.unwrap_or_else(|| req.model.clone()),
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
            cost: usage.cost,
        })
    }

    fn name(&self) -> &str {
        "openai-compat"
    }
}

/// Keep error bodies readable in logs and messages.
fn snippet(s: &str) -> String {
    const MAX: usize = 300;
    let s = s.trim();
    if s.len() <= MAX {
        s.to_string()
    } else {
        let cut = s
            .char_indices()
            .take_while(|(i, _)| *i < MAX)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}…", &s[..cut])
    }
}

// ── Wire format ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: usize,
    usage: WireUsageOptions,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct WireUsageOptions {
    include: bool,
}

#[derive(Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
    usage: Option<WireUsage>,
    model: Option<String>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireChoiceMessage,
}

#[derive(Deserialize)]
struct WireChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct WireUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
    total_tokens: Option<u64>,
    cost: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_request_serialises_single_user_message() {
        let req = WireRequest {
            model: "openai/gpt-oss-120b",
            messages: vec![WireMessage {
                role: "user",
                content: "hello",
            }],
            temperature: 0.3,
            max_tokens: 2048,
            usage: WireUsageOptions { include: true },
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"include\":true"));
        assert_eq!(json.matches("\"role\"").count(), 1);
    }

    #[test]
    fn wire_response_decodes_openrouter_shape() {
        let body = r#"{
            "model": "openai/gpt-oss-120b",
            "choices": [{"message": {"role": "assistant", "content": "{}"}}],
            "usage": {"prompt_tokens": 812, "completion_tokens": 401,
                      "total_tokens": 1213, "cost": 0.00031}
        }"#;
        let wire: WireResponse = serde_json::from_str(body).unwrap();
        let usage = wire.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 812);
        assert_eq!(usage.total_tokens, Some(1213));
        assert_eq!(usage.cost, Some(0.00031));
    }

    #[test]
    fn wire_response_tolerates_missing_usage() {
        let body = r#"{"choices": [{"message": {"content": "ok"}}]}"#;
        let wire: WireResponse = serde_json::from_str(body).unwrap();
        assert!(wire.usage.is_none());
        assert!(wire.model.is_none());
    }

    #[test]
    fn snippet_truncates_long_bodies() {
        let long = "x".repeat(1000);
        let s = snippet(&long);
        assert!(s.len() < 320);
        assert!(s.ends_with('…'));
        assert_eq!(snippet("short"), "short");
    }

    #[test]
    fn provider_base_url_is_normalised() {
        let p = OpenAiCompatProvider::new("https://api.example.com/v1/", "sk-test", 30).unwrap();
        assert_eq!(p.base_url, "https://api.example.com/v1");
    }
}
