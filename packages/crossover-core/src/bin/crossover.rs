//! Crossover CLI - Command line front-end for the crossover dashboard.
//!
//! Every command maps to one core operation and prints a JSON envelope on
//! stdout. Logs go to stderr.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossover_core::{
    ApiResponse, BuyOutcome, Config, JsonPriceSource, Ledger, PriceSource, SignalEngine,
    SqliteLedgerStore, StaticPriceSource, SymbolUniverse,
};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "crossover")]
#[command(about = "Moving-average crossover signals and paper portfolio")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.crossover/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Ledger database, overrides the config file
    #[arg(long, global = true)]
    database: Option<PathBuf>,
    /// JSON price snapshot, overrides the config file
    #[arg(long, global = true)]
    prices: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute Buy/Sell/Hold signals
    Signals {
        /// Symbols to analyze (comma-separated), defaults to the configured universe
        #[arg(short = 'y', long)]
        symbols: Option<String>,
    },
    /// Buy a position
    Buy {
        /// Stock symbol
        #[arg(short, long)]
        symbol: String,
        /// Number of shares
        #[arg(short = 'n', long, default_value = "1")]
        quantity: u32,
        /// Price per share, defaults to the latest close
        #[arg(short, long)]
        price: Option<f64>,
    },
    /// Sell all holdings of a symbol
    Sell {
        /// Stock symbol
        #[arg(short, long)]
        symbol: String,
    },
    /// Remove every position
    Reset,
    /// Refresh and show the portfolio
    Portfolio {
        /// Price override as SYMBOL=PRICE (repeatable)
        #[arg(long = "price", value_parser = parse_override)]
        overrides: Vec<(String, f64)>,
    },
}

fn parse_override(raw: &str) -> std::result::Result<(String, f64), String> {
    let (symbol, price) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected SYMBOL=PRICE, got '{raw}'"))?;
    let price: f64 = price
        .trim()
        .parse()
        .map_err(|e| format!("invalid price '{price}': {e}"))?;
    Ok((symbol.trim().to_string(), price))
}

fn respond<T: Serialize>(result: crossover_core::Result<T>) -> String {
    let rendered = match result {
        Ok(data) => serde_json::to_string_pretty(&ApiResponse::ok(data)),
        Err(e) => serde_json::to_string_pretty(&ApiResponse::<()>::err(e.to_string())),
    };
    rendered.unwrap_or_else(|e| format!(r#"{{"ok":false,"error":"{e}"}}"#))
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load_from_path(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    if let Some(database) = cli.database {
        config.database_path = database;
    }
    if let Some(prices) = cli.prices {
        config.prices_path = Some(prices);
    }

    let source: Box<dyn PriceSource> = match &config.prices_path {
        Some(path) => Box::new(
            JsonPriceSource::load(path)
                .with_context(|| format!("loading prices from {}", path.display()))?,
        ),
        None => {
            tracing::warn!("No price snapshot configured, market prices unavailable");
            Box::new(StaticPriceSource::new())
        }
    };

    let store = SqliteLedgerStore::open(&config.database_path)
        .with_context(|| format!("opening ledger at {}", config.database_path.display()))?;
    let mut ledger = Ledger::open(store).context("initializing ledger schema")?;

    let output = match cli.command {
        Commands::Signals { symbols } => {
            let universe = match symbols {
                Some(list) => SymbolUniverse::from_symbols(list.split(',')),
                None => config.symbol_universe()?,
            };
            let engine = SignalEngine::new(&*source).with_lookback(config.lookback_days);
            respond(Ok(engine.analyze_stocks_report(universe.as_slice())))
        }
        Commands::Buy {
            symbol,
            quantity,
            price,
        } => {
            let price = match price {
                Some(price) => Ok(price),
                None => source.latest_close(&symbol).and_then(|price| {
                    price.ok_or_else(|| crossover_core::Error::DataUnavailable(symbol.clone()))
                }),
            };
            respond(
                price
                    .and_then(|price| ledger.buy(&symbol, price, quantity))
                    .map(|outcome| {
                        let message = match &outcome {
                            BuyOutcome::Opened(p) => format!(
                                "Bought {} shares of {} at {:.2}",
                                p.quantity, p.symbol, p.buy_price
                            ),
                            BuyOutcome::AlreadyHeld(p) => {
                                format!("{} is already held, buy ignored", p.symbol)
                            }
                        };
                        json!({ "message": message, "result": outcome })
                    }),
            )
        }
        Commands::Sell { symbol } => respond(ledger.sell(&symbol).map(|sold| match sold {
            Some(position) => json!({
                "message": format!("Sold all holdings of {}", position.symbol),
                "position": position,
            }),
            None => json!({ "message": format!("No holding for {symbol}") }),
        })),
        Commands::Reset => respond(ledger.reset().map(|removed| {
            json!({ "message": "Portfolio has been reset.", "removed": removed })
        })),
        Commands::Portfolio { overrides } => {
            let overrides: HashMap<String, f64> = overrides.into_iter().collect();
            respond(ledger.refresh(Some(&overrides), &*source).and_then(|report| {
                let summary = ledger.summary()?;
                Ok(json!({
                    "positions": report.positions,
                    "outcomes": report.outcomes,
                    "summary": summary,
                }))
            }))
        }
    };

    println!("{}", output);

    ledger
        .close()
        .close()
        .context("closing ledger database")?;
    Ok(())
}
