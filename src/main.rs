use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use liqx_rs::config::Settings;
use liqx_rs::liquidity::{self, explain, guide, load_table_path, table_metrics};
use liqx_rs::market_data::adapters::binance::MarketApi;
use liqx_rs::market_data::{build_source, BatchFetcher, InstrumentSnapshot, Market};
use liqx_rs::report::{write_report, write_snapshots_csv, DEFAULT_REPORT_PATH};
use liqx_rs::telemetry;

#[derive(Debug, Parser)]
#[command(name = "liqx", version, about = "Market liquidity snapshots and metrics")]
struct Cli {
    /// Settings file (defaults to ./liqx.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the built-in instruments of a market
    Universe {
        #[arg(long)]
        market: Market,
    },
    /// Fetch one instrument
    Snapshot {
        #[arg(long)]
        market: Market,
        #[arg(long, conflicts_with = "name", required_unless_present = "name")]
        symbol: Option<String>,
        /// Display name from the market universe
        #[arg(long)]
        name: Option<String>,
    },
    /// Fetch the whole universe (or a subset) with one retry pass
    Batch {
        #[arg(long)]
        market: Market,
        /// Restrict to these display names
        #[arg(long)]
        only: Vec<String>,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Fetch an orderbook and print imbalance and top-of-book spread
    Orderbook {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_REPORT_PATH)]
        report: Option<PathBuf>,
    },
    /// Compute liquidity metrics from a CSV table
    Metrics {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_REPORT_PATH)]
        report: Option<PathBuf>,
    },
    /// Explain a metric
    Explain { metric: String },
}

fn format_snapshot(s: &InstrumentSnapshot) -> String {
    let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
    let mut out = format!(
        "{} [{}] quality={}\n  bid={} ask={} spread={} close={} volume={}\n  \
         depth1={} depth2={} depth3={} expected={} execution={} latency={}ms at {}",
        s.company(),
        s.symbol(),
        s.quality(),
        fmt(s.bid()),
        fmt(s.ask()),
        fmt(s.spread()),
        fmt(s.close()),
        fmt(s.volume()),
        s.depth1(),
        s.depth2(),
        s.depth3(),
        fmt(s.expected_price()),
        fmt(s.execution_price()),
        s.execution_time_ms(),
        s.timestamp()
    );
    if let Some(status) = s.status() {
        out.push_str(&format!("\n  status: {status}"));
    }
    out
}

fn print_metrics(metrics: &[(String, f64)]) {
    for (name, value) in metrics {
        println!("{name}: {value:.6}");
        println!("  {}", explain(name));
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // load .env

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    telemetry::init_tracing(&settings.log.filter);
    telemetry::init_metrics(settings.telemetry.metrics_port)?;

    match cli.command {
        Command::Universe { market } => {
            println!("{market}");
            for (name, symbol) in market.instruments() {
                println!("  {symbol:<12} {name}");
            }
        }
        Command::Snapshot { market, symbol, name } => {
            let (name, symbol) = match (name, symbol) {
                (Some(name), _) => {
                    let Some(symbol) = market.symbol_for(&name) else {
                        bail!("`{name}` is not in the {market} universe");
                    };
                    (name, symbol.to_string())
                }
                (None, Some(symbol)) => (symbol.clone(), symbol),
                (None, None) => bail!("either --symbol or --name is required"),
            };
            let source = build_source(market, &settings)?;
            match source.fetch_snapshot(&symbol).await {
                Some(snap) => println!("{}", format_snapshot(&snap.identify(name, symbol))),
                None => bail!("no data for {symbol} from {}", source.venue()),
            }
        }
        Command::Batch { market, only, csv } => {
            let instruments = if only.is_empty() {
                market.instruments().to_vec()
            } else {
                let (picked, unknown) = market.select(&only);
                if !unknown.is_empty() {
                    bail!("not in the {market} universe: {}", unknown.join(", "));
                }
                picked
            };

            let source = build_source(market, &settings)?;
            let fetcher = BatchFetcher::new(settings.batch.retry_delay());
            let result = fetcher.fetch_multiple(source.as_ref(), &instruments).await;

            println!("{} fetched, {} failed", result.success.len(), result.failed.len());
            for snap in &result.success {
                println!("{}", format_snapshot(snap));
            }
            for (name, symbol) in &result.failed {
                println!("FAILED {name} [{symbol}]");
            }
            if let Some(path) = csv {
                let path = write_snapshots_csv(&path, &result.success)?;
                println!("Snapshots written to {}", path.display());
            }
        }
        Command::Orderbook { symbol, limit, report } => {
            let api = MarketApi::new(
                &settings.binance.base_url,
                Duration::from_secs(settings.binance.timeout_secs),
            )?;
            let book = match api
                .get_orderbook(&symbol, limit.unwrap_or(settings.binance.depth_limit))
                .await
            {
                Ok(book) => book,
                Err(e) if e.is_region_restricted() => {
                    bail!("{e}\nthe venue refuses this region; point binance.base_url at a reachable mirror")
                }
                Err(e) => return Err(e.into()),
            };

            println!("{symbol}: {} bid levels, {} ask levels", book.bids.len(), book.asks.len());
            let metrics = liquidity::book_metrics(&book);
            for (name, value) in &metrics {
                println!("{name}: {value:.4}");
            }
            println!("  {}", explain(liquidity::metrics::ORDER_BOOK_IMBALANCE));
            if let Some(path) = report {
                let path = write_report(&path, &metrics)?;
                println!("Report written to {}", path.display());
            }
        }
        Command::Metrics { csv, report } => {
            let table = load_table_path(&csv).with_context(|| format!("reading {}", csv.display()))?;
            let metrics = table_metrics(&table)?;
            print_metrics(&metrics);
            if let Some(path) = report {
                let path = write_report(&path, &metrics)?;
                println!("Report written to {}", path.display());
            }
        }
        Command::Explain { metric } => {
            let text = explain(&metric);
            println!("{text}");
            if text == guide::FALLBACK {
                println!("Known topics: {}", guide::topics().collect::<Vec<_>>().join(", "));
            }
        }
    }

    Ok(())
}
