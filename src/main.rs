//! datalake-ingest — binary entrypoint.
//! Sweeps the configured sources into the raw data lake and/or processes what is
//! stored there, printing the results as pretty JSON.
//!
//! Usage: `datalake-ingest [collect | process <source> | process-all | run]`

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use datalake_ingest::{
    build_pipeline, ingest::load_sources_default, PipelineSettings, TracingReporter,
};

const ENV_LOG_FILTER: &str = "DATALAKE_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(ENV_LOG_FILTER)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

enum Command {
    Collect,
    Process(String),
    ProcessAll,
    Run,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command> {
    let cmd = match args.next().as_deref() {
        None | Some("collect") => Command::Collect,
        Some("process") => {
            let source = args.next().context("`process` needs a source name")?;
            Command::Process(source)
        }
        Some("process-all") => Command::ProcessAll,
        Some("run") => Command::Run,
        Some(other) => bail!("unknown command {other:?} (expected collect, process, process-all or run)"),
    };
    if let Some(extra) = args.next() {
        bail!("unexpected argument {extra:?}");
    }
    Ok(cmd)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run() -> Result<()> {
    let cmd = parse_args(std::env::args().skip(1))?;
    let settings = PipelineSettings::from_env();
    let sources = load_sources_default()?;
    tracing::debug!(?settings, sources = ?sources.names(), "pipeline configured");

    let (collector, processor) = build_pipeline(&settings, sources, Arc::new(TracingReporter));

    match cmd {
        Command::Collect => {
            let summary = collector.fetch_all().await;
            tracing::info!(outcome = ?summary.outcome, "Data collection completed.");
            print_json(&summary)?;
        }
        Command::Process(source) => {
            let report = processor.process_source(&source)?;
            print_json(&report)?;
        }
        Command::ProcessAll => {
            print_json(&processor.process_all(collector.sources()))?;
        }
        Command::Run => {
            let summary = collector.fetch_all().await;
            let reports = processor.process_all(collector.sources());
            print_json(&serde_json::json!({
                "collection": summary,
                "processing": reports,
            }))?;
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    if let Err(e) = run().await {
        tracing::error!("Critical error in data pipeline: {e:#}");
        std::process::exit(1);
    }
}
