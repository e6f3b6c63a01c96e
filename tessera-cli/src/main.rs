//! Command-line importer over the tessera facade.
//!
//! Commands:
//! - `add`: import metadata, daily bars, and option contracts for tickers
//! - `import-all`: import metadata for every active ticker
//! - `remove`: delete previously written data files for tickers
//!
//! Records are appended as JSON lines, one file per ticker and dataset,
//! under the output directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use tessera::{BatchSink, ImportReport, IngestConfig, Tessera, TesseraError, month_anchors};

#[derive(Parser)]
#[command(name = "tessera-cli", version, about = "Historical market-reference importer")]
struct Cli {
    /// API credential; read from the environment when not passed.
    #[arg(long, env = "POLYGON_API_KEY", hide_env_values = true)]
    api_key: String,

    /// API base URL override.
    #[arg(long, default_value = tessera::DEFAULT_BASE_URL)]
    base_url: String,

    /// Directory where JSON-lines data files are written.
    #[arg(long, default_value = "tessera-data")]
    out_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import metadata, daily bars, and option contracts for the given tickers.
    Add {
        /// Ticker symbols to import.
        #[arg(required = true)]
        tickers: Vec<String>,

        /// Start month for price history (YYYY-MM). Defaults to the oldest
        /// month of the contract window.
        #[arg(short, long, value_parser = parse_year_month)]
        start: Option<NaiveDate>,

        /// End month for price history (YYYY-MM). Defaults to today.
        #[arg(short, long, value_parser = parse_year_month)]
        end: Option<NaiveDate>,

        /// Months of option-contract history to walk back.
        #[arg(short = 'm', long, default_value_t = 24)]
        months_hist: u32,
    },
    /// Import metadata for every active ticker.
    ImportAll,
    /// Delete the data files previously written for the given tickers.
    Remove {
        /// Ticker symbols to remove.
        #[arg(required = true)]
        tickers: Vec<String>,
    },
}

fn parse_year_month(s: &str) -> Result<NaiveDate, String> {
    let (year, month) = s
        .split_once('-')
        .ok_or_else(|| format!("expected YYYY-MM, got {s}"))?;
    let year: i32 = year.parse().map_err(|_| format!("bad year in {s}"))?;
    let month: u32 = month.parse().map_err(|_| format!("bad month in {s}"))?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| format!("invalid month {s}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    run(cli).await
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tessera=info,tessera_polygon=info,tessera_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    tracing::info!(out_dir = %cli.out_dir.display(), "tessera importer starting");
    match cli.command {
        Command::Add {
            tickers,
            start,
            end,
            months_hist,
        } => {
            let tessera = build_facade(cli.api_key, cli.base_url)?;
            tokio::fs::create_dir_all(&cli.out_dir)
                .await
                .with_context(|| format!("creating {}", cli.out_dir.display()))?;
            add_tickers(&tessera, &cli.out_dir, &tickers, start, end, months_hist).await
        }
        Command::ImportAll => {
            let tessera = build_facade(cli.api_key, cli.base_url)?;
            tokio::fs::create_dir_all(&cli.out_dir)
                .await
                .with_context(|| format!("creating {}", cli.out_dir.display()))?;
            import_universe(&tessera, &cli.out_dir).await
        }
        Command::Remove { tickers } => remove_tickers(&cli.out_dir, &tickers).await,
    }
}

fn build_facade(api_key: String, base_url: String) -> Result<Tessera> {
    let config = IngestConfig::new(api_key).with_base_url(base_url);
    Ok(Tessera::new(config)?)
}

async fn add_tickers(
    tessera: &Tessera,
    out_dir: &Path,
    tickers: &[String],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    months_hist: u32,
) -> Result<()> {
    let today = Utc::now().date_naive();
    let window = month_anchors(today, months_hist)?;
    let end = end.unwrap_or(today);
    let start = match start {
        Some(start) => start,
        // The walk always yields at least the current month.
        None => *window.last().unwrap_or(&today),
    };

    // Identifiers are positional within this run; a deployment with a ticker
    // store would resolve real ones here.
    for (index, ticker) in tickers.iter().enumerate() {
        let ticker_id = index as i64 + 1;

        let sink = JsonlSink::new(data_file(out_dir, ticker, "metadata"));
        let report = tessera.import_ticker_metadata(ticker, &sink).await?;
        announce(ticker, "metadata", &report);

        let sink = JsonlSink::new(data_file(out_dir, ticker, "bars"));
        let report = tessera
            .import_daily_bars(ticker, ticker_id, start, end, &sink)
            .await?;
        announce(ticker, "bars", &report);

        let sink = JsonlSink::new(data_file(out_dir, ticker, "contracts"));
        let report = tessera
            .import_option_contracts(ticker, ticker_id, months_hist, today, &sink)
            .await?;
        announce(ticker, "contracts", &report);
    }
    Ok(())
}

async fn import_universe(tessera: &Tessera, out_dir: &Path) -> Result<()> {
    let sink = JsonlSink::new(out_dir.join("universe_metadata.jsonl"));
    let report = tessera.import_all_ticker_metadata(&sink).await?;
    announce("universe", "metadata", &report);
    Ok(())
}

async fn remove_tickers(out_dir: &Path, tickers: &[String]) -> Result<()> {
    for ticker in tickers {
        for dataset in ["metadata", "bars", "contracts"] {
            let path = data_file(out_dir, ticker, dataset);
            match tokio::fs::remove_file(&path).await {
                Ok(()) => println!("removed {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| format!("removing {}", path.display()));
                }
            }
        }
    }
    Ok(())
}

fn data_file(out_dir: &Path, ticker: &str, dataset: &str) -> PathBuf {
    let symbol = ticker.to_lowercase().replace('/', "-");
    out_dir.join(format!("{symbol}_{dataset}.jsonl"))
}

fn announce(ticker: &str, dataset: &str, report: &ImportReport) {
    println!(
        "{ticker}: {} {dataset} records in {} batches ({} requests)",
        report.records, report.batches, report.requests
    );
}

// Appends each batch as JSON lines. Append-only keeps partial imports
// inspectable; re-running a ticker extends its files.
struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl<R: Serialize + Send + Sync> BatchSink<R> for JsonlSink {
    async fn store_batch(&self, batch: &[R]) -> Result<(), TesseraError> {
        let mut lines = String::new();
        for record in batch {
            let line = serde_json::to_string(record)
                .map_err(|e| TesseraError::sink(format!("serializing record: {e}")))?;
            lines.push_str(&line);
            lines.push('\n');
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| TesseraError::sink(format!("opening {}: {e}", self.path.display())))?;
        file.write_all(lines.as_bytes())
            .await
            .map_err(|e| TesseraError::sink(format!("writing {}: {e}", self.path.display())))?;
        Ok(())
    }
}
