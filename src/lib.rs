//! # mcqgen
//!
//! Generate multiple-choice quizzes from PDF and text documents using LLMs.
//!
//! ## What this crate does
//!
//! Feed it a document; it asks a chat-completion model for a quiz about the
//! content, validates the model's JSON-shaped reply, and hands back flat
//! question rows together with token and cost accounting. The hard part is
//! not the API call but the shaping around it: a fixed four-slot prompt on
//! the way out, and defensive fence-stripping plus schema validation on the
//! way back, because model output is untrusted text that only usually looks
//! like JSON.
//!
//! ## Pipeline Overview
//!
//! ```text
//! document (.pdf / .txt)
//!  │
//!  ├─ 1. Read    extract plain text (lopdf for PDFs, UTF-8 for .txt)
//!  ├─ 2. Invoke  one chat-completion call with the templated prompt
//!  ├─ 3. Parse   strip markdown fence, validate the JSON quiz shape
//!  └─ 4. Output  QuizRow records + usage stats (tokens, USD cost)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mcqgen::{generate_quiz, QuizConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credentials from OPENAI_API_KEY (or OPENROUTER_API_KEY)
//!     let config = QuizConfig::builder().questions(5).tone("medium").build()?;
//!     let output = generate_quiz("chapter3.pdf", &config).await?;
//!     for row in &output.rows {
//!         println!("{}  [{}]", row.mcq, row.correct);
//!     }
//!     eprintln!(
//!         "tokens: {} in / {} out, ${:.5}",
//!         output.usage.prompt_tokens,
//!         output.usage.completion_tokens,
//!         output.usage.total_cost
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mcqgen` binary (clap + anyhow + tracing-subscriber + indicatif + dotenv) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! mcqgen = { version = "0.3", default-features = false }
//! ```
//!
//! ## Failure model
//!
//! Reader and invoker failures return [`McqGenError`]. An unparsable reply
//! does not: the call already happened and cost tokens, so the raw text is
//! preserved in [`QuizOutput`] with a [`ParseError`] describing why the
//! table could not be built.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod template;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{QuizConfig, QuizConfigBuilder};
pub use error::{McqGenError, ParseError};
pub use generate::{generate_from_bytes, generate_from_text, generate_quiz, generate_sync};
pub use output::{QuizOutput, QuizResult, QuizRow, UsageStats};
pub use pipeline::llm::{
    ChatProvider, ChatRequest, ChatResponse, OpenAiCompatProvider, DEFAULT_API_BASE, DEFAULT_MODEL,
};
pub use pipeline::parse::{extract_rows, strip_fence};
pub use pipeline::reader::{read_file, read_named_bytes};
pub use template::{ResponseTemplate, TemplateOptions, TemplateQuestion};
