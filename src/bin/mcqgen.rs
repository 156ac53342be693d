//! CLI binary for mcqgen.
//!
//! A thin shim over the library crate that maps CLI flags to `QuizConfig`,
//! renders the generated quiz, and prints the usage summary.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mcqgen::{generate_quiz, QuizConfig, QuizOutput};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Five medium questions from a PDF chapter
  mcqgen chapter3.pdf

  # Ten hard questions from lecture notes
  mcqgen --questions 10 --tone hard notes.txt

  # Use a specific model through OpenRouter
  mcqgen --model openai/gpt-4.1-mini document.pdf

  # Point at a self-hosted OpenAI-compatible server
  mcqgen --api-base http://localhost:8000/v1 --model my-model notes.txt

  # Structured JSON output (rows + usage) for scripting
  mcqgen --json document.pdf > quiz.json

  # Keep a diagnostic log of the run
  mcqgen --log-file run.log --verbose document.pdf

MODELS & PRICING (per 1M tokens, estimates):
  Model                  Input    Output
  ─────────────────────  ───────  ───────
  openai/gpt-oss-120b    $0.09    $0.45   (default)
  gpt-4.1-nano           $0.10    $0.40
  gpt-4.1-mini           $0.40    $1.60
  gpt-4o                 $2.50    $10.00
  claude-sonnet-4-*      $3.00    $15.00

  A five-question quiz from a ten-page chapter typically costs well under
  one cent with the default model.

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY        API key for the completion endpoint
  OPENROUTER_API_KEY    Fallback key variable
  MCQGEN_MODEL          Override the model ID
  MCQGEN_API_BASE       Override the endpoint base URL

  A .env file in the working directory is loaded automatically.

SETUP:
  1. Set API key:   export OPENAI_API_KEY=sk-...
  2. Generate:      mcqgen document.pdf
"#;

/// Generate multiple-choice quizzes from PDF and text documents using LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "mcqgen",
    version,
    about = "Generate multiple-choice quizzes from PDF and TXT documents using LLMs",
    long_about = "Generate multiple-choice quizzes from documents. Reads a .pdf or .txt file, \
asks a chat-completion model for a quiz in a fixed JSON shape, validates the reply, and prints \
the questions with token/cost accounting. Works with OpenRouter, OpenAI, and any \
OpenAI-compatible endpoint.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the source document (.pdf or .txt).
    input: PathBuf,

    /// Number of questions to generate.
    #[arg(short = 'n', long, env = "MCQGEN_QUESTIONS", default_value_t = 5)]
    questions: usize,

    /// Difficulty/tone label passed to the model (e.g. simple, medium, hard).
    #[arg(short, long, env = "MCQGEN_TONE", default_value = "medium")]
    tone: String,

    /// Model ID (e.g. openai/gpt-oss-120b, gpt-4.1-mini).
    #[arg(long, env = "MCQGEN_MODEL")]
    model: Option<String>,

    /// Chat-completion endpoint base URL (OpenAI-compatible).
    #[arg(long, env = "MCQGEN_API_BASE")]
    api_base: Option<String>,

    /// Sampling temperature (0.0-2.0).
    #[arg(long, env = "MCQGEN_TEMPERATURE", default_value_t = 0.3)]
    temperature: f32,

    /// Max completion tokens.
    #[arg(long, env = "MCQGEN_MAX_TOKENS", default_value_t = 2048)]
    max_tokens: usize,

    /// Per-call timeout in seconds.
    #[arg(long, env = "MCQGEN_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// Path to a text file containing a custom prompt template
    /// (must carry the {text}, {number}, {tone}, {response_json} slots).
    #[arg(long, env = "MCQGEN_PROMPT_TEMPLATE")]
    prompt_template: Option<PathBuf>,

    /// Output the full result (rows, raw reply, usage) as JSON.
    #[arg(long, env = "MCQGEN_JSON")]
    json: bool,

    /// Print the raw model reply instead of the rendered quiz.
    #[arg(long)]
    raw: bool,

    /// Write diagnostic logs to this file instead of stderr.
    #[arg(long, env = "MCQGEN_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MCQGEN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the quiz itself.
    #[arg(short, long, env = "MCQGEN_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_logging(&cli)?;

    // ── Build config ─────────────────────────────────────────────────────
    let prompt_template = match cli.prompt_template {
        Some(ref path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read prompt template from {path:?}"))?,
        ),
        None => None,
    };

    let mut builder = QuizConfig::builder()
        .questions(cli.questions)
        .tone(cli.tone.as_str())
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .api_timeout_secs(cli.api_timeout);
    if let Some(model) = cli.model.clone() {
        builder = builder.model(model);
    }
    if let Some(base) = cli.api_base.clone() {
        builder = builder.api_base(base);
    }
    if let Some(template) = prompt_template {
        builder = builder.prompt_template(template);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run generation ───────────────────────────────────────────────────
    let spinner = if !cli.quiet && !cli.json {
        Some(make_spinner(cli.questions, &cli.tone))
    } else {
        None
    };

    let result = generate_quiz(&cli.input, &config).await;

    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    let output = result.context("Quiz generation failed")?;

    // ── Render ───────────────────────────────────────────────────────────
    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }

    if cli.raw || !output.is_parsed() {
        if let Some(ref e) = output.parse_error {
            eprintln!(
                "{} Could not parse the quiz ({e}). Raw model output shown below.",
                yellow("⚠")
            );
        }
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(output.raw_reply.as_bytes())?;
        if !output.raw_reply.ends_with('\n') {
            handle.write_all(b"\n")?;
        }
    } else {
        render_quiz(&output);
    }

    if !cli.quiet {
        print_usage_summary(&output);
    }

    Ok(())
}

/// Route logs to stderr, or to `--log-file` when given.
///
/// Initialised once at startup; the file handle flushes line-by-line and
/// closes when the process exits.
fn init_logging(cli: &Cli) -> Result<()> {
    let default_filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    match cli.log_file {
        Some(ref path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file {path:?}"))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

fn make_spinner(questions: usize, tone: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_prefix("Generating");
    bar.set_message(format!("{questions} {tone} questions…"));
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Print the parsed quiz as readable question blocks.
fn render_quiz(output: &QuizOutput) {
    for (i, row) in output.rows.iter().enumerate() {
        println!("{} {}", bold(&format!("{}.", i + 1)), row.mcq);
        for (label, text) in [("a", &row.a), ("b", &row.b), ("c", &row.c), ("d", &row.d)] {
            let line = format!("   {label}) {text}");
            if label == row.correct {
                println!("{}", green(&line));
            } else {
                println!("{line}");
            }
        }
        println!("   {}", dim(&format!("correct: {}", row.correct)));
        println!();
    }
}

fn print_usage_summary(output: &QuizOutput) {
    eprintln!(
        "{} {} questions  {}  {}ms",
        cyan("◆"),
        bold(&output.rows.len().to_string()),
        dim(&output.model),
        output.duration_ms,
    );
    eprintln!(
        "   {} total tokens  ({} prompt / {} completion)  est. cost {}",
        dim(&output.usage.total_tokens.to_string()),
        dim(&output.usage.prompt_tokens.to_string()),
        dim(&output.usage.completion_tokens.to_string()),
        bold(&format!("${:.5}", output.usage.total_cost)),
    );
}
