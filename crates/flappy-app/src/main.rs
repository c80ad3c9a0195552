use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use flappy_app::game_loop::spawn_game_loop;
use flappy_app::state::{GenerationSummary, Pace};
use flappy_core::config::SimConfig;
use flappy_core::constants::INPUT_COUNT;
use flappy_pilot::network::{Activation, FeedForwardPilot};
use flappy_pilot::roster::WeightRoster;
use flappy_sim::engine::EpisodeReport;
use flappy_sim::generation::{run_generation, PopulationProvider};
use flappy_sim::replay::run_replay;
use flappy_sim::{Episode, EpisodeSetup};

#[derive(Parser, Debug)]
#[command(name = "flappy")]
#[command(version)]
#[command(about = "Headless flappy population simulation")]
struct Cli {
    /// JSON config file. Missing fields take their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of generations to evaluate
    #[arg(short, long, default_value_t = 1)]
    generations: u32,

    /// Agents per generation
    #[arg(short, long, default_value_t = 50)]
    population: usize,

    /// Seed for network weights and obstacle placement
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Hidden layer widths, comma separated
    #[arg(long, value_delimiter = ',', default_value = "4")]
    hidden: Vec<usize>,

    /// Stop each episode after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Pace episodes at the configured tick rate on the frame-pump thread
    #[arg(long)]
    realtime: bool,

    /// Replay the best network after the last generation, up to this many ticks
    #[arg(long)]
    replay_ticks: Option<u64>,

    /// Print one JSON summary per generation on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SimConfig::default(),
    };

    let mut shape = vec![INPUT_COUNT];
    shape.extend(cli.hidden.iter().copied().filter(|w| *w > 0));
    shape.push(1);
    let mut roster = WeightRoster::random(cli.population, &shape, Activation::Tanh, cli.seed)
        .context("building networks")?;
    info!(
        population = roster.len(),
        ?shape,
        generations = cli.generations,
        "starting"
    );

    for generation in 0..cli.generations {
        let seed = cli.seed.wrapping_add(u64::from(generation));
        let report = if cli.realtime {
            run_paced(&mut roster, &config, generation, seed, cli.max_ticks)?
        } else {
            run_generation(&mut roster, &config, generation, seed, cli.max_ticks)
                .with_context(|| format!("generation {generation}"))?
        };
        log_summary(&report, cli.json)?;
    }

    if let Some(limit) = cli.replay_ticks {
        replay_best(&roster, &config, cli.seed, limit)?;
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// One generation on the frame-pump thread at the configured tick rate.
fn run_paced(
    roster: &mut WeightRoster,
    config: &SimConfig,
    generation: u32,
    seed: u64,
    max_ticks: Option<u64>,
) -> Result<EpisodeReport> {
    let setup = EpisodeSetup {
        seed,
        generation,
        ..Default::default()
    };
    let episode = Episode::new(config, setup, roster.decision_functions(generation))
        .with_context(|| format!("generation {generation}"))?;
    let game_loop =
        spawn_game_loop(episode, Pace::Realtime, max_ticks).context("spawning game loop")?;

    for snapshot in game_loop.snapshots.iter() {
        if snapshot.time.tick % u64::from(config.tick_rate) == 0 {
            debug!(
                tick = snapshot.time.tick,
                alive = snapshot.alive,
                score = snapshot.score,
                "frame"
            );
        }
    }

    let report = game_loop
        .join()
        .with_context(|| format!("generation {generation}"))?;
    roster.record(&report);
    Ok(report)
}

fn log_summary(report: &EpisodeReport, json: bool) -> Result<()> {
    let summary = GenerationSummary::from(report);
    info!(
        generation = summary.generation,
        ticks = summary.ticks,
        score = summary.score,
        reason = ?summary.reason,
        best_fitness = summary.best_fitness.unwrap_or_default(),
        mean_fitness = summary.mean_fitness,
        collisions = summary.collisions,
        floor = summary.floor,
        ceiling = summary.ceiling,
        "generation finished"
    );
    if json {
        println!("{}", serde_json::to_string(&summary)?);
    }
    Ok(())
}

fn replay_best(roster: &WeightRoster, config: &SimConfig, seed: u64, limit: u64) -> Result<()> {
    let Some(best) = roster.best() else {
        warn!("no recorded genome to replay");
        return Ok(());
    };
    let pilot = Box::new(FeedForwardPilot::new(best.clone()));
    let result = run_replay(config, pilot, seed, Some(limit)).context("replaying best network")?;
    info!(
        score = result.score,
        ticks = result.ticks,
        cause = ?result.cause,
        fitness = result.fitness_delta,
        "replay finished"
    );
    Ok(())
}
