//! Command-line entry point for the CFB ratings engine
//!
//! Loads a season's teams and games from local JSON, rates every team with
//! the selected model and prints a ranked table with records, strength of
//! schedule, momentum and power points.

use anyhow::Result;
use cfb_ratings::analytics::{momentum, ppoints, records, strength_of_schedule};
use cfb_ratings::config::AppConfig;
use cfb_ratings::data::{load_games, load_teams, season_games};
use cfb_ratings::rating::build_model;
use cfb_ratings::snapshot::JsonSnapshotStore;
use cfb_ratings::types::{conference_map, team_list, RatingMethod};
use cfb_ratings::utils::rank_order;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

/// CFB Ratings - College football rating and analytics engine
#[derive(Parser)]
#[command(
    name = "cfb-ratings",
    version,
    about = "Rate college football teams with Colley, Massey, Elo or a hybrid blend",
    long_about = "CFB Ratings reads a season of teams and games from local JSON files, rates \
                 every team with the selected model, and reports records, strength of schedule, \
                 momentum and power points weighted by weekly rating snapshots."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Team listing
    #[arg(
        long,
        value_name = "FILE",
        help = "Team listing JSON (default: <cache_dir>/teams_<year>.json)"
    )]
    teams: Option<PathBuf>,

    /// Game list
    #[arg(
        long,
        value_name = "FILE",
        help = "Games JSON (default: <cache_dir>/games_<year>_<season_type>.json)"
    )]
    games: Option<PathBuf>,

    /// Rating model
    #[arg(
        short,
        long,
        value_name = "METHOD",
        default_value = "hybrid",
        help = "Rating model (colley, massey, elo, hybrid)"
    )]
    method: RatingMethod,

    /// Rows to print
    #[arg(
        short,
        long,
        value_name = "N",
        default_value_t = 25,
        help = "Number of teams to print"
    )]
    top: usize,

    /// Season override
    #[arg(short, long, value_name = "YEAR", help = "Override season year")]
    year: Option<i32>,

    /// Snapshot directory override
    #[arg(
        long,
        value_name = "DIR",
        help = "Directory of weekly rating snapshots (default: <cache_dir>/snapshots)"
    )]
    snapshot_dir: Option<PathBuf>,

    /// Write missing weekly snapshots before scoring
    #[arg(long, help = "Compute and save any missing weekly snapshots for the season")]
    write_snapshots: bool,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without rating")]
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
        .with_thread_ids(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load configuration from file or environment, then apply CLI overrides
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if let Some(year) = args.year {
        config.data.year = year;
    }

    cfb_ratings::config::validate_config(&config)?;
    Ok(config)
}

fn display_startup_banner(config: &AppConfig, method: RatingMethod) {
    info!("CFB Ratings {}", cfb_ratings::VERSION);
    info!("   Season: {} ({})", config.data.year, config.data.season_type);
    info!("   Method: {}", method);
    info!("   Cache dir: {}", config.data.cache_dir.display());
    info!("   Log level: {}", config.service.log_level);
}

fn run(args: &Args, config: &AppConfig) -> Result<()> {
    let year = config.data.year;
    let teams_path = args
        .teams
        .clone()
        .unwrap_or_else(|| config.data.cache_dir.join(format!("teams_{}.json", year)));
    let games_path = args.games.clone().unwrap_or_else(|| {
        config.data.cache_dir.join(format!(
            "games_{}_{}.json",
            year, config.data.season_type
        ))
    });

    let team_info = load_teams(&teams_path)?;
    let teams = team_list(&team_info);
    let conferences = conference_map(&team_info);
    let games = season_games(&load_games(&games_path)?.into_games(), year);
    info!(
        "Rating {} teams over {} games of {}",
        teams.len(),
        games.len(),
        year
    );

    let model = build_model(args.method, &config.ratings)?;
    debug!("Model config: {}", model.config());
    let ratings = model.rate(&teams, &games);

    let store = JsonSnapshotStore::new(
        args.snapshot_dir
            .clone()
            .unwrap_or_else(|| config.data.snapshot_dir()),
    );
    if args.write_snapshots {
        store.ensure_season(year, args.method, &config.ratings, &teams, &games)?;
    }

    let recs = records(&teams, &games);
    let sos = strength_of_schedule(&teams, &games, &ratings);
    let mom = momentum(&teams, &games, &ratings);
    let points = ppoints(
        &teams,
        &games,
        &ratings,
        &conferences,
        &store,
        args.method,
        &config.ratings.ppoints,
    );

    println!(
        "{:>4}  {:<28} {:<18} {:>10} {:>7} {:>9} {:>8} {:>8}",
        "Rank", "Team", "Conference", "Rating", "Record", "SOS", "Mom", "PPts"
    );
    for (i, (team, rating)) in rank_order(&ratings).into_iter().take(args.top).enumerate() {
        let conference = conferences.get(&team).map(String::as_str).unwrap_or("-");
        let record = recs.get(&team).copied().unwrap_or_default();
        println!(
            "{:>4}  {:<28} {:<18} {:>10.4} {:>7} {:>9.4} {:>8.2} {:>8.2}",
            i + 1,
            team,
            conference,
            rating,
            record.to_string(),
            sos.get(&team).copied().unwrap_or(0.0),
            mom.get(&team).copied().unwrap_or(0.0),
            points.get(&team).copied().unwrap_or(0.0),
        );
    }

    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    display_startup_banner(&config, args.method);

    if args.dry_run {
        info!("Configuration validation successful");
        info!("Dry run completed - exiting without rating");
        return Ok(());
    }

    run(&args, &config)
}
