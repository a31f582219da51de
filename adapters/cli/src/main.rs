#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Lane Siege match headlessly.

mod autopilot;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lane_siege_core::{Command, Difficulty, Event, Hud, Intent, MatchConfig};
use lane_siege_world::{self as world, query, World};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::autopilot::Autopilot;

/// Runs a Lane Siege match driven by a scripted operator.
#[derive(Debug, Parser)]
#[command(name = "lane-siege", version, about)]
struct Args {
    /// TOML match configuration; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the configured difficulty.
    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,

    /// Overrides the configured villain seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Ticks to simulate before giving up on an unfinished match.
    #[arg(long, default_value_t = 200_000)]
    max_ticks: u64,

    /// Simulated milliseconds attributed to every tick.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Log filter directive, such as `debug` or `lane_siege_world=trace`.
    #[arg(long)]
    log: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

/// Entry point for the Lane Siege command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log.as_deref())?;

    let config = load_config(&args)?;
    let mut world = World::new(&config).context("failed to create the match")?;
    println!("{}", query::welcome_banner(&world));

    let dt = Duration::from_millis(args.frame_ms);
    let mut autopilot = Autopilot::new();
    let mut intents = Vec::new();
    let mut events = Vec::new();

    while query::tick(&world) < args.max_ticks && !query::phase(&world).is_terminal() {
        autopilot.decide(&world, &mut intents);
        for intent in intents.drain(..) {
            world::apply(&mut world, Command::from(intent), &mut events);
        }
        world::apply(&mut world, Command::Tick { dt }, &mut events);
        report(&world, &mut events);
    }

    println!("{}", hud_line(&query::hud(&world)));
    let ticks = query::tick(&world);
    match world::leave_match(world) {
        Some(summary) => {
            let rendered =
                toml::to_string(&summary).context("failed to render the match summary")?;
            print!("{rendered}");
        }
        None => println!("match unfinished after {ticks} ticks"),
    }
    Ok(())
}

fn init_tracing(directive: Option<&str>) -> Result<()> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter `{directive}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
    Ok(())
}

fn load_config(args: &Args) -> Result<MatchConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read match configuration {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("failed to parse match configuration {}", path.display()))?
        }
        None => MatchConfig::default(),
    };

    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty.into();
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    info!(difficulty = ?config.difficulty, seed = config.seed, "configuration loaded");
    Ok(config)
}

fn report(world: &World, events: &mut Vec<Event>) {
    for event in events.drain(..) {
        match event {
            Event::WaveCompleted { wave } => {
                println!("wave {wave} cleared | {}", hud_line(&query::hud(world)));
            }
            Event::IntentRejected {
                intent: Intent::SpawnHero { hero },
                reason,
            } => debug!(%hero, %reason, "autopilot purchase declined"),
            _ => {}
        }
    }
}

fn hud_line(hud: &Hud) -> String {
    format!(
        "wave {}/{} | currency {} | score {} | base {} | {}",
        hud.wave, hud.max_waves, hud.currency, hud.score, hud.base_health, hud.phase
    )
}
