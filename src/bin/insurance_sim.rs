//! insurance-sim - play headless insurance-defense sessions with a simple policy.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use insurance_defense::{
    play_game, Catalog, GameConfig, GameReport, GreedyPolicy, PassivePolicy, Policy,
    WaveOrchestrator,
};

/// Autoplay insurance-defense games and report the results
#[derive(Parser, Debug)]
#[command(name = "insurance-sim")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Game configuration (TOML). Defaults are used for missing fields.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Card catalog (TOML). Defaults to the built-in catalog.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// RNG seed, overriding the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of games to play in one session
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Which policy plays
    #[arg(short, long, default_value = "greedy")]
    policy: PolicyKind,

    /// Print final reports as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyKind {
    /// Buy the cheapest affordable card each preparation phase.
    Greedy,
    /// Never buy anything.
    Passive,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact();
    let _ = subscriber.try_init();
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn load_catalog(args: &Args) -> Result<Catalog> {
    match &args.catalog {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("reading catalog {}", path.display()))?;
            Catalog::from_toml_str(&source)
                .with_context(|| format!("parsing catalog {}", path.display()))
        }
        None => Ok(Catalog::standard()),
    }
}

fn print_report(index: u32, report: &GameReport) {
    println!("game {index}: {:?}", report.outcome);
    for entry in &report.final_state.wave_history {
        println!(
            "  wave {:>2}  damage {:>4}  total {:>5}  earned {:>6}  defeated {:>2}  {}",
            entry.wave,
            entry.damage_taken,
            entry.cumulative_damage,
            entry.money_earned,
            entry.risks_defeated,
            entry.rating()
        );
    }
    println!(
        "  totals: {} waves, {} damage, {} earned, {} risks defeated, {} money left",
        report.totals.waves,
        report.totals.damage_taken,
        report.totals.money_earned,
        report.totals.risks_defeated,
        report.final_state.money()
    );
}

fn run_session(game: &mut WaveOrchestrator, policy: &mut impl Policy, args: &Args) -> Result<()> {
    let mut reports = Vec::new();
    for index in 1..=args.games {
        let report = play_game(game, policy)?;
        if !args.json {
            print_report(index, &report);
        }
        reports.push(report);
        if index < args.games {
            game.advance()?;
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    if args.games == 0 {
        bail!("--games must be at least 1");
    }

    let config = load_config(&args)?;
    let catalog = load_catalog(&args)?;
    let mut game = WaveOrchestrator::new(config, catalog).context("invalid game setup")?;

    match args.policy {
        PolicyKind::Greedy => run_session(&mut game, &mut GreedyPolicy::new(), &args),
        PolicyKind::Passive => run_session(&mut game, &mut PassivePolicy, &args),
    }
}
