use crate::engine::HttpAnalyzer;
use crate::input::InputController;
use crate::model::ClientConfig;
use crate::session::{AnalysisSession, SessionState};
use crate::storage::{self, ExportRecord};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, EnvFilter};

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "profile-analyzer",
    version,
    about = "Professional profile analysis client with optional TUI"
)]
pub struct Cli {
    /// Base URL of the analysis service
    #[arg(long, env = "PROFILE_ANALYZER_URL", default_value = "http://localhost:8000")]
    pub base_url: String,

    /// Who to analyze: name, company, position...
    #[arg(long, short)]
    pub query: Option<String>,

    /// Something about yourself, used to find common ground
    #[arg(long, short)]
    pub context: Option<String>,

    /// Print JSON result and exit (no TUI)
    #[arg(long, conflicts_with = "text")]
    pub json: bool,

    /// Print text report and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// HTTP timeout for the analysis request
    #[arg(long, default_value = "60s")]
    pub timeout: humantime::Duration,

    /// Export a successful result as JSON
    #[arg(long)]
    pub export_json: Option<std::path::PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "PROFILE_ANALYZER_LOG", default_value = "info")]
    pub log_level: String,

    /// Write logs to this file (the TUI only logs when this is set)
    #[arg(long)]
    pub log_file: Option<std::path::PathBuf>,

    /// Submit the pre-filled form as soon as the TUI starts
    #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
    pub submit_on_launch: bool,
}

impl Cli {
    /// True when running a single submission without the TUI.
    pub fn is_one_shot(&self) -> bool {
        self.json || self.text || !cfg!(feature = "tui")
    }
}

/// Install the tracing subscriber for this run.
pub fn init_tracing(args: &Cli) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    if let Some(path) = args.log_file.as_deref() {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open log file {}", path.display()))?;
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if args.is_one_shot() {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
    // TUI without a log file: stay silent so the alternate screen is not corrupted.
    Ok(())
}

pub async fn run(args: Cli) -> Result<()> {
    if !args.is_one_shot() {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args).await;
        }
    }

    run_one_shot(args).await
}

/// Build a `ClientConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> ClientConfig {
    ClientConfig {
        base_url: args.base_url.clone(),
        timeout: Duration::from(args.timeout),
        user_agent: format!("profile-analyzer-cli/{}", env!("CARGO_PKG_VERSION")),
    }
}

/// Form state pre-filled from `--query` / `--context`.
pub fn build_input(args: &Cli) -> InputController {
    let mut input = InputController::new();
    if let Some(q) = args.query.as_deref() {
        input.set_query(q);
    }
    if let Some(c) = args.context.as_deref() {
        input.set_user_context(c);
    }
    input
}

/// Run exactly one submission and print the outcome.
async fn run_one_shot(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let transport = HttpAnalyzer::new(&cfg)?;
    let input = build_input(&args);
    let mut session = AnalysisSession::new();

    if !input.can_submit(session.state()) {
        anyhow::bail!("a non-empty --query is required");
    }

    let (out_tx, out_handle) = spawn_output_writer();
    if args.text {
        let _ = out_tx.send(OutputLine::Stderr(format!(
            "Analyzing \"{}\" via {}…",
            input.query().trim(),
            transport.endpoint()
        )));
    }

    session.submit(&transport, &input).await;
    let outcome = finish_one_shot(&args, &session, &out_tx);

    drop(out_tx);
    let _ = out_handle.await;
    outcome
}

fn finish_one_shot(
    args: &Cli,
    session: &AnalysisSession,
    out_tx: &mpsc::UnboundedSender<OutputLine>,
) -> Result<()> {
    let (request, result) = match (session.last_request(), session.state()) {
        (Some(request), SessionState::Succeeded(result)) => (request, result),
        (_, SessionState::Failed(message)) => return Err(anyhow::anyhow!(message.clone())),
        (_, state) => anyhow::bail!("analysis did not resolve (state: {state:?})"),
    };

    let record = ExportRecord::new(&args.base_url, request, result);
    handle_exports(args, &record)?;
    if let Some(p) = args.export_json.as_deref() {
        let _ = out_tx.send(OutputLine::Stderr(format!("Exported JSON: {}", p.display())));
    }

    if args.json {
        let out = serde_json::to_string_pretty(result)?;
        let _ = out_tx.send(OutputLine::Stdout(out));
    } else {
        let summary = crate::text_summary::build_text_summary(result);
        for line in summary.lines {
            let _ = out_tx.send(OutputLine::Stdout(line));
        }
    }
    Ok(())
}

/// Handle export operations for one-shot modes; errors propagate.
fn handle_exports(args: &Cli, record: &ExportRecord) -> Result<()> {
    if let Some(p) = args.export_json.as_deref() {
        storage::export_json(p, record)?;
    }
    Ok(())
}
