//! CLI binary for docglean.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `AnalysisConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use docglean::{analyze, AnalysisConfig, Provider};
use docglean::pipeline::transform::display_value;
use docglean::report::build_report;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
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

// ── CLI definition ───────────────────────────────────────────────────────────

/// Extract structured data from scanned and digital documents.
#[derive(Parser, Debug)]
#[command(name = "docglean", version, about)]
struct Cli {
    /// Input document: a PNG, JPEG, or PDF file.
    input: PathBuf,

    /// LLM provider: 'openai' or 'gemini'.
    #[arg(long, default_value = "gemini")]
    provider: String,

    /// Model identifier; each provider has its own default.
    #[arg(long)]
    model: Option<String>,

    /// Provider API key. Falls back to OPENAI_API_KEY / GOOGLE_API_KEY
    /// depending on the provider.
    #[arg(long, env = "DOCGLEAN_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Per-call provider timeout in seconds.
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Print the raw extracted record as pretty JSON instead of tables.
    #[arg(long)]
    json: bool,

    /// Also print the raw extracted text.
    #[arg(long)]
    show_text: bool,

    /// Write an HTML summary report to this path.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Verbose logging (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "docglean=warn",
        1 => "docglean=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve the API key: explicit flag first, then the provider's
/// conventional environment variable.
fn resolve_api_key(cli: &Cli, provider: Provider) -> String {
    if let Some(ref key) = cli.api_key {
        return key.clone();
    }
    let var = match provider {
        Provider::OpenAi => "OPENAI_API_KEY",
        Provider::Gemini => "GOOGLE_API_KEY",
    };
    std::env::var(var).unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let provider: Provider = cli
        .provider
        .parse()
        .with_context(|| format!("invalid --provider '{}'", cli.provider))?;
    let api_key = resolve_api_key(&cli, provider);

    let mut builder = AnalysisConfig::builder()
        .provider(provider)
        .api_key(api_key)
        .api_timeout_secs(cli.timeout);
    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    let config = builder.build()?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Analysing {}…", cli.input.display()));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let output = analyze(&cli.input, &config).await;
    spinner.finish_and_clear();
    let output = output.with_context(|| format!("analysis of '{}' failed", cli.input.display()))?;

    if cli.show_text {
        println!("{}", bold("── Extracted text ──"));
        println!("{}", output.extraction.text());
        println!();
    }

    let analysis = match output.analysis {
        Some(analysis) => analysis,
        None => {
            println!(
                "{} No text could be extracted from '{}' — nothing to analyse.",
                cyan("◆"),
                cli.input.display()
            );
            return Ok(());
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&analysis.record)?);
    } else {
        println!(
            "{} {}  {}",
            cyan("◆"),
            bold(&format!("Category: {}", analysis.category)),
            dim(&format!(
                "({} pages, {} via OCR, {:.1}s)",
                output.stats.total_pages,
                output.stats.ocr_pages,
                output.stats.total_duration_ms as f64 / 1000.0
            ))
        );

        if !analysis.bundle.main_fields.is_empty() {
            println!("\n{}", bold("Key fields"));
            let width = analysis
                .bundle
                .main_fields
                .keys()
                .map(String::len)
                .max()
                .unwrap_or(0);
            for (key, value) in &analysis.bundle.main_fields {
                println!("  {key:<width$}  {}", display_value(value));
            }
        }

        if !analysis.bundle.item_rows.is_empty() {
            println!("\n{}", bold("Items"));
            for (i, row) in analysis.bundle.item_rows.iter().enumerate() {
                let cells: Vec<String> = row
                    .iter()
                    .map(|(k, v)| format!("{k}: {}", display_value(v)))
                    .collect();
                println!("  {} {}", dim(&format!("{:>2}.", i + 1)), cells.join("  "));
            }
        }

        if !analysis.bundle.summary_text.is_empty() {
            println!("\n{}", bold("Summary"));
            println!("  {}", analysis.bundle.summary_text);
        }
    }

    if let Some(ref report_path) = cli.report {
        let html = build_report(&analysis.bundle, analysis.category.as_str());
        std::fs::write(report_path, html)
            .with_context(|| format!("failed to write report to '{}'", report_path.display()))?;
        println!(
            "\n{} Report written to {}",
            green("✓"),
            report_path.display()
        );
    }

    Ok(())
}
