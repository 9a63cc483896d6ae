use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use bo_payout::config::Config;
use bo_payout::{logging, PayoutModel, StakeRequest, SymbolRef};

#[derive(Parser)]
#[command(name = "bo-payout", about = "Binary-options broker payout and stake quoting")]
struct Cli {
    /// Path to config file
    #[arg(long, default_value = "config.toml")]
    config: String,

    /// Emit quotes as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// List the broker's symbol catalog
    Symbols,
    /// Quote the payout fraction for a prospective trade
    Payout {
        #[arg(long)]
        symbol: String,
        /// RFC 3339 instant or Unix seconds, UTC
        #[arg(long)]
        time: String,
        /// Expiry duration in seconds
        #[arg(long)]
        duration: u32,
        #[arg(long)]
        stake: f64,
    },
    /// Recommend a stake from a target win-rate (fractional Kelly)
    Stake {
        #[arg(long)]
        symbol: String,
        /// RFC 3339 instant or Unix seconds, UTC
        #[arg(long)]
        time: String,
        /// Expiry duration in seconds
        #[arg(long)]
        duration: u32,
        #[arg(long)]
        bankroll: f64,
        #[arg(long)]
        winrate: f64,
        /// Kelly de-rating factor, e.g. 0.5 for half-Kelly
        #[arg(long, default_value_t = 0.5)]
        attenuator: f64,
        #[arg(long)]
        payout_cap: Option<f64>,
        #[arg(long)]
        winrate_cap: Option<f64>,
    },
}

fn parse_time(s: &str) -> Result<i64> {
    if let Ok(secs) = s.parse::<i64>() {
        return Ok(secs);
    }
    let dt = chrono::DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("parsing timestamp {s:?}"))?;
    Ok(dt.timestamp())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    let cfg = Config::load(&cli.config)?;
    let engine = cfg.engine.build();

    match cli.cmd {
        Cmd::Symbols => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(engine.symbols())?);
            } else {
                for (index, sym) in engine.symbols().iter().enumerate() {
                    let state = if sym.tradable { "tradable" } else { "suspended" };
                    println!("{index:2}  {}  {state}", sym.name);
                }
            }
        }
        Cmd::Payout {
            symbol,
            time,
            duration,
            stake,
        } => {
            let timestamp = parse_time(&time)?;
            let quote = engine.quote_payout(SymbolRef::Name(&symbol), timestamp, duration, stake);
            info!(
                symbol = %symbol,
                payout = quote.payout,
                status = %quote.status,
                "payout quote"
            );
            if cli.json {
                println!("{}", serde_json::to_string(&quote)?);
            } else {
                println!("payout {:.2}  status {}", quote.payout, quote.status);
            }
        }
        Cmd::Stake {
            symbol,
            time,
            duration,
            bankroll,
            winrate,
            attenuator,
            payout_cap,
            winrate_cap,
        } => {
            let timestamp = parse_time(&time)?;
            let mut request = StakeRequest::new(bankroll, winrate, attenuator);
            if let Some(cap) = payout_cap {
                request = request.with_payout_cap(cap);
            }
            if let Some(cap) = winrate_cap {
                request = request.with_winrate_cap(cap);
            }
            let quote = engine.quote_stake(SymbolRef::Name(&symbol), timestamp, duration, &request);
            info!(
                symbol = %symbol,
                stake = quote.stake,
                payout = quote.payout,
                status = %quote.status,
                "stake quote"
            );
            if cli.json {
                println!("{}", serde_json::to_string(&quote)?);
            } else {
                println!(
                    "stake {:.2}  payout {:.2}  status {}",
                    quote.stake, quote.payout, quote.status
                );
            }
        }
    }
    Ok(())
}
