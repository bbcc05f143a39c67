//! MathQuery CLI
//!
//! Usage:
//!   mathquery "x² - 5x + 6 = 0 denkleminin köklerini bul"
//!   echo "5! hesapla" | mathquery
//!   mathquery --json-logs --threshold 0.5 "sin(30) hesapla"

use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;
use std::io::{self, BufRead};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mathquery_core::{
    AppError, BrainAnalyzer, Clarification, Dispatcher, DispatcherConfig, QueryAnalysis,
    ResolvedRequest,
};

#[derive(Parser)]
#[command(name = "mathquery")]
#[command(about = "Classify a Turkish math question and print the dispatch proposal")]
struct Args {
    /// The question; read from one line of stdin when omitted
    question: Vec<String>,

    /// Minimum confidence (0.0-1.0), overrides MATHQUERY_CONFIDENCE_THRESHOLD
    #[arg(short = 't', long)]
    threshold: Option<f32>,

    /// Emit logs as JSON on stderr
    #[arg(long)]
    json_logs: bool,
}

/// Outcome of screening, as printed.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Screening {
    Ready { request: ResolvedRequest },
    Clarification { clarification: Clarification },
}

#[derive(Debug, Serialize)]
struct Report {
    analysis: QueryAnalysis,
    screening: Screening,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_question(words: Vec<String>) -> Result<String, AppError> {
    if !words.is_empty() {
        return Ok(words.join(" "));
    }

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.json_logs);

    let config = match args.threshold {
        Some(threshold) => DispatcherConfig::with_threshold(threshold),
        None => DispatcherConfig::from_env(),
    }
    .context("Failed to load dispatcher config")?;

    let question = read_question(args.question).context("Failed to read question")?;
    if question.is_empty() {
        bail!("No question given");
    }

    let brain = BrainAnalyzer::new();
    let dispatcher = Dispatcher::new(config);

    let analysis = brain.analyze(&question);
    info!("{}", analysis.summary());

    let screening = match dispatcher.screen(&analysis) {
        Ok(request) => Screening::Ready { request },
        Err(clarification) => Screening::Clarification { clarification },
    };

    let report = Report {
        analysis,
        screening,
    };
    let rendered = serde_json::to_string_pretty(&report).map_err(AppError::from)?;
    println!("{}", rendered);

    Ok(())
}
