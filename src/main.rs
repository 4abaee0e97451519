//! Command line entry point for puzzle-leaderboard
//!
//! Reads day-grouped puzzle results from a JSON file, ranks them with the
//! configured method, and prints the leaderboard.

use anyhow::{Context, Result};
use clap::Parser;
use puzzle_leaderboard::config::{AppConfig, OutputFormat};
use puzzle_leaderboard::{DayGroup, EloMethod, Leaderboard, RankOrder, StatsMethod};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Puzzle Leaderboard - Elo and adjusted-average rankings for daily puzzles
#[derive(Parser)]
#[command(
    name = "puzzle-leaderboard",
    version,
    about = "Rank players from daily guessing-puzzle scores",
    long_about = "Reads a JSON array of day groups ({\"day\": ..., \"results\": [{\"player\": ..., \
                 \"score\": ...}]}) in chronological order and prints a leaderboard ranked by \
                 iterated Elo, MAP Elo, or day-adjusted empirical-Bayes average score."
)]
struct Args {
    /// Input file with day-grouped results
    #[arg(short, long, value_name = "FILE", help = "Path to JSON results file")]
    input: PathBuf,

    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Stats method override
    #[arg(short, long, value_name = "METHOD", help = "Ranking method (elo, average)")]
    method: Option<StatsMethod>,

    /// Elo method override
    #[arg(long, value_name = "METHOD", help = "Elo estimation (iterated, map)")]
    elo_method: Option<EloMethod>,

    /// Game cutoff override
    #[arg(long, value_name = "N", help = "Minimum games needed to be ranked")]
    cutoff: Option<u32>,

    /// K-factor override
    #[arg(short, long, value_name = "K", help = "K-factor for iterated Elo")]
    k: Option<f64>,

    #[arg(long, help = "Count failed attempts as a score of 7")]
    x_is_seven: bool,

    #[arg(long, help = "Disable per-day difficulty adjustment")]
    no_day_adjustment: bool,

    #[arg(long, help = "Disable empirical-Bayes shrinkage")]
    no_bayes_adjustment: bool,

    #[arg(long, help = "Print the leaderboard as JSON")]
    json: bool,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Dry run mode (validate config and input, then exit)
    #[arg(long, help = "Validate configuration and input and exit without ranking")]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file, environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::from_env()?,
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }
    if args.json {
        config.service.output = OutputFormat::Json;
    }

    let ranking = &mut config.ranking;
    if let Some(method) = args.method {
        ranking.stats_method = method;
    }
    if let Some(elo_method) = args.elo_method {
        ranking.elo_method = elo_method;
    }
    if let Some(cutoff) = args.cutoff {
        ranking.game_cutoff = cutoff;
    }
    if let Some(k) = args.k {
        ranking.elo_k = k;
    }
    if args.x_is_seven {
        ranking.x_is_seven = true;
    }
    if args.no_day_adjustment {
        ranking.day_adjustment = false;
    }
    if args.no_bayes_adjustment {
        ranking.bayes_adjustment = false;
    }

    puzzle_leaderboard::config::validate_config(&config)?;
    Ok(config)
}

fn read_days(path: &Path) -> Result<Vec<DayGroup>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse input file {}", path.display()))
}

fn print_table(board: &Leaderboard) {
    let heading = match board.rank_order {
        RankOrder::HigherIsBetter => "Elo",
        RankOrder::LowerIsBetter => "Avg",
    };
    println!("{:>4}  {:<24} {:>6} {:>10}", "#", "Player", "Games", heading);
    for (position, entry) in board.entries.iter().enumerate() {
        println!(
            "{:>4}  {:<24} {:>6} {:>10.3}",
            position + 1,
            entry.player_id,
            entry.games_played,
            entry.rating
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let days = read_days(&args.input)?;
    info!(
        "Loaded {} day groups from {}",
        days.len(),
        args.input.display()
    );

    if args.dry_run {
        puzzle_leaderboard::rating::GameSet::new(&days, config.ranking.max_score())?;
        info!("Configuration and input validation successful");
        return Ok(());
    }

    let board = match Leaderboard::build(&config.ranking, &days) {
        Ok(board) => board,
        Err(e) => {
            error!("Failed to build leaderboard: {}", e);
            return Err(e.into());
        }
    };

    match config.service.output {
        OutputFormat::Table => print_table(&board),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&board.entries)?),
    }

    Ok(())
}
