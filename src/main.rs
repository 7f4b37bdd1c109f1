use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use self_driving_sim::simulation::{
    SimConfig, SimStore, SimWorld, BEST_BRAIN_KEY, TRAFFIC_KEY,
};

#[derive(Parser)]
#[command(name = "self_driving_sim")]
#[command(about = "Self-driving car simulation with mutation-trained threshold networks")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "1000")]
    ticks: u64,

    /// Number of network-driven agents in the generation
    #[arg(long, default_value = "100")]
    agents: usize,

    /// Number of scripted traffic cars
    #[arg(long, default_value = "7")]
    traffic: usize,

    /// Number of lanes on the road
    #[arg(long, default_value = "3")]
    lanes: usize,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// How far mutated copies of the saved brain drift, between 0 and 1
    #[arg(long, default_value = "0.1")]
    mutation: f64,

    /// JSON file holding the best brain and traffic layout between runs
    #[arg(long)]
    store: Option<PathBuf>,

    /// Save the best brain and traffic layout to the store at the end of the run
    #[arg(long)]
    save_best: bool,

    /// Forget the saved brain and traffic layout before starting
    #[arg(long)]
    discard: bool,

    /// Print the summary and road map every N ticks (0 disables)
    #[arg(long, default_value = "0")]
    map_every: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = SimConfig {
        agent_count: cli.agents,
        traffic_count: cli.traffic,
        lane_count: cli.lanes,
        mutation_amount: cli.mutation,
        seed: cli.seed,
        ..SimConfig::default()
    };

    let store = cli.store.as_ref().map(SimStore::new);
    if let Some(store) = &store {
        if cli.discard {
            info!("Discarding saved state in {}", store.path().display());
            store.remove(BEST_BRAIN_KEY)?;
            store.remove(TRAFFIC_KEY)?;
        }
    }

    let mut world = build_world(config, store.as_ref())?;
    run_headless(&mut world, cli.ticks, cli.map_every)?;

    if cli.save_best {
        match &store {
            Some(store) => save_best(&world, store)?,
            None => warn!("--save-best given without --store; nothing saved"),
        }
    }

    Ok(())
}

/// Build the generation, seeded from the store when it holds usable data
fn build_world(config: SimConfig, store: Option<&SimStore>) -> Result<SimWorld> {
    let (best_brain, traffic) = match store {
        Some(store) => (store.load_best_brain()?, store.load_traffic()?),
        None => (None, None),
    };

    if best_brain.is_none() {
        return SimWorld::generation(config, None, traffic);
    }

    match SimWorld::generation(config.clone(), best_brain, traffic.clone()) {
        Ok(world) => Ok(world),
        Err(e) => {
            warn!("{:#}; starting from random brains", e);
            SimWorld::generation(config, None, traffic)
        }
    }
}

/// Run the simulation without graphics until the tick budget is spent or
/// every agent is damaged
fn run_headless(world: &mut SimWorld, ticks: u64, map_every: u64) -> Result<()> {
    info!("Running self-driving simulation in headless mode...");
    info!("Ticks: {}, seed: {}", ticks, world.seed());

    while world.stats.ticks < ticks {
        let report = world.tick()?;

        if !report.crashed_agents.is_empty() {
            info!(
                "Tick {}: {} agents damaged",
                report.tick,
                report.crashed_agents.len()
            );
        }

        if map_every > 0 && report.tick % map_every == 0 {
            world.print_summary();
            world.draw_map();
        }

        if world.all_agents_damaged() {
            info!("All agents damaged at tick {}", report.tick);
            break;
        }
    }

    let stats = &world.stats;
    info!("=== SIMULATION COMPLETE ===");
    info!("Ticks run: {}", stats.ticks);
    info!("Agents: {}", world.agents.len());
    info!("Agents damaged: {}", stats.damaged_agents);
    info!("Traffic damaged: {}", stats.damaged_traffic);
    info!("Best distance: {:.1}", stats.best_distance);

    Ok(())
}

fn save_best(world: &SimWorld, store: &SimStore) -> Result<()> {
    let levels = world
        .export_best_brain()
        .context("No network-driven agent to save")?;
    store.save_best_brain(&levels)?;
    store.save_traffic(world.traffic_layout())?;
    info!("Saved best brain to {}", store.path().display());
    Ok(())
}
