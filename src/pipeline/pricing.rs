//! USD cost estimation for providers that report tokens but not cost.
//!
//! OpenRouter returns a per-call `cost` field and this table is never
//! consulted; plain OpenAI-compatible servers report tokens only, so the
//! estimate keeps the usage summary meaningful. Prices are per one million
//! tokens (input, output) and drift over time; they are an estimate, not a
//! billing source.

use tracing::debug;

/// (model-id prefix, input $/1M tokens, output $/1M tokens)
///
/// Matched by prefix after stripping an optional `vendor/` namespace, so
/// both `gpt-4.1-mini` and `openai/gpt-4.1-mini-2025-04-14` resolve.
const PRICES_PER_MILLION: &[(&str, f64, f64)] = &[
    ("gpt-oss-120b", 0.09, 0.45),
    ("gpt-oss-20b", 0.04, 0.16),
    ("gpt-4.1-nano", 0.10, 0.40),
    ("gpt-4.1-mini", 0.40, 1.60),
    ("gpt-4.1", 2.00, 8.00),
    ("gpt-4o-mini", 0.15, 0.60),
    ("gpt-4o", 2.50, 10.00),
    ("claude-sonnet-4", 3.00, 15.00),
    ("claude-haiku-4", 0.80, 4.00),
    ("gemini-2.0-flash", 0.10, 0.40),
    ("gemini-2.5-pro", 1.25, 10.00),
];

/// Estimate the USD cost of a call from its token counts.
///
/// Unknown models cost 0.0; the caller still gets token counts, just no
/// dollar figure.
pub fn estimate_cost(model: &str, prompt_tokens: u64, completion_tokens: u64) -> f64 {
    let bare = model.rsplit('/').next().unwrap_or(model);

    for (prefix, input_price, output_price) in PRICES_PER_MILLION {
        if bare.starts_with(prefix) {
            return (prompt_tokens as f64 * input_price
                + completion_tokens as f64 * output_price)
                / 1_000_000.0;
        }
    }

    debug!(model, "No pricing entry; reporting cost as 0.0");
    0.0
}
