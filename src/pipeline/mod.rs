//! Pipeline stages for document-to-quiz generation.
//!
//! Each submodule implements exactly one transformation step. Keeping
//! stages separate makes each independently testable and lets us swap
//! implementations (e.g. a different transport) without touching the rest.
//!
//! ## Data Flow
//!
//! ```text
//! reader ──▶ llm ──▶ parse
//! (pdf/txt)  (chat)  (fence strip + JSON shape)
//! ```
//!
//! 1. [`reader`]  — extract plain text from a `.pdf` or `.txt` input
//! 2. [`llm`]     — assemble the prompt, make the single completion call,
//!    account tokens and cost; the only stage with network I/O
//! 3. [`parse`]   — strip an optional markdown fence and validate the
//!    reply's JSON shape into flat quiz rows
//! 4. [`pricing`] — USD cost estimation when the provider reports none

pub mod llm;
pub mod parse;
pub mod pricing;
pub mod reader;
