use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, warn};

use sharpline::arbitrage::{calculate_max_stake_with_ceiling, OddsBoard};
use sharpline::config::AppConfig;
use sharpline::detector::OpportunityDetector;
use sharpline::odds;
use sharpline::persistence::AlertLog;
use sharpline::value;

/// Odds, EV and arbitrage calculator for sportsbook prices
#[derive(Parser, Debug)]
#[command(name = "sharpline")]
#[command(version)]
struct Cli {
    /// Config file (defaults to config/default + config/local)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a price between American, decimal and probability
    Convert(ConvertArgs),
    /// Strip the vig from a two- or three-way market
    Devig {
        #[arg(allow_hyphen_values = true, num_args = 2..=3, required = true)]
        odds: Vec<i32>,
    },
    /// Expected value, edge and Kelly sizing for one bet
    Ev(EvArgs),
    /// Closing line value of a bet
    Clv {
        #[arg(long, allow_hyphen_values = true)]
        odds: i32,
        #[arg(long, allow_hyphen_values = true)]
        closing: i32,
    },
    /// Best cross-book arbitrage on an odds board CSV
    Arb(ArbArgs),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct ConvertArgs {
    #[arg(long, allow_hyphen_values = true)]
    american: Option<i32>,
    #[arg(long)]
    decimal: Option<f64>,
    #[arg(long)]
    probability: Option<f64>,
}

#[derive(Args, Debug)]
struct EvArgs {
    #[arg(long)]
    probability: f64,
    #[arg(long, allow_hyphen_values = true)]
    odds: i32,
    #[arg(long)]
    stake: f64,
    #[arg(long)]
    bankroll: Option<f64>,
    #[arg(long)]
    kelly_fraction: Option<f64>,
}

#[derive(Args, Debug)]
struct ArbArgs {
    /// CSV with header `outcome,<book>,...`
    #[arg(long)]
    board: PathBuf,
    #[arg(long)]
    stake: Option<f64>,
    /// Sportsbook limit as BOOK=AMOUNT, repeatable
    #[arg(long = "limit", value_parser = parse_limit)]
    limits: Vec<(String, f64)>,
    /// Append emitted alerts to this CSV
    #[arg(long)]
    record: Option<PathBuf>,
}

fn parse_limit(raw: &str) -> Result<(String, f64)> {
    let (book, amount) = raw
        .split_once('=')
        .with_context(|| format!("expected BOOK=AMOUNT, got {raw:?}"))?;
    let amount: f64 = amount
        .trim()
        .parse()
        .with_context(|| format!("invalid limit amount {amount:?}"))?;
    Ok((book.trim().to_string(), amount))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    config.logging.init();
    info!("sharpline starting ({})", config);

    match cli.command {
        Commands::Convert(args) => convert(args),
        Commands::Devig { odds: prices } => {
            let quote = odds::remove_vig(&prices)?;
            print_json(&quote)
        }
        Commands::Ev(args) => {
            let fraction = args.kelly_fraction.or(Some(config.kelly.default_fraction));
            let analysis = value::analyze_ev(
                args.probability,
                args.odds,
                args.stake,
                args.bankroll,
                fraction,
            )?;
            print_json(&analysis)
        }
        Commands::Clv {
            odds: taken,
            closing,
        } => print_json(&value::calculate_clv(taken, closing)?),
        Commands::Arb(args) => arb(args, &config),
    }
}

fn convert(args: ConvertArgs) -> Result<()> {
    let american = match (args.american, args.decimal, args.probability) {
        (Some(a), _, _) => a,
        (_, Some(d), _) => odds::decimal_to_american(d)?,
        (_, _, Some(p)) => odds::probability_to_american(p)?,
        _ => bail!("one of --american, --decimal or --probability is required"),
    };
    print_json(&json!({
        "american": american,
        "decimal": odds::american_to_decimal(american)?,
        "implied_probability": odds::implied_probability(american)?,
    }))
}

fn arb(args: ArbArgs, config: &AppConfig) -> Result<()> {
    let board = OddsBoard::from_path(&args.board)?;
    let stake = args.stake.unwrap_or(config.arbitrage.default_stake);

    let Some(analysis) = board.best_arbitrage(stake)? else {
        info!(
            outcomes = board.outcomes.len(),
            sportsbooks = board.sportsbooks.len(),
            "no arbitrage in best lines"
        );
        return print_json(&json!({ "arbitrage": null }));
    };

    let limits: HashMap<String, f64> = args.limits.into_iter().collect();
    let max_stake = if limits.is_empty() {
        None
    } else {
        Some(calculate_max_stake_with_ceiling(
            &analysis,
            &limits,
            config.arbitrage.default_max_stake,
        )?)
    };

    let detector = OpportunityDetector::new(config.detector.clone());
    if let Some(path) = &args.record {
        let log = AlertLog::open(path)?;
        detector.subscribe(move |alert| {
            if let Err(e) = log.append(alert) {
                warn!("Failed to record alert: {:#}", e);
            }
        });
    }
    let event = args
        .board
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "board".to_string());
    let lines = board.best_lines()?;
    let alert = detector.scan_arbitrage(&event, &lines, stake, Utc::now())?;

    print_json(&json!({
        "arbitrage": analysis,
        "max_stake": max_stake,
        "alert": alert,
    }))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{out}");
    Ok(())
}
