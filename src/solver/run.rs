use std::env;
use std::error::Error;
use std::fs;

use colored::*;
use csv::Writer;
use dotenv::dotenv;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, span, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::constant::{CHECKPOINT_CSV, GRID_SIZE};
use crate::config::PlannerConfig;
use crate::domain::bundle::Bundle;
use crate::domain::world::World;
use crate::fixtures::{GridWorld, SimulatedVehicle};
use crate::solver::local_search::Checkpoint;
use crate::solver::plan::{plan_bundle, plan_straight};

/// Initialize tracing and environment
fn init_tracing_and_env() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_span_events(fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE))
        .try_init()?;

    dotenv().ok();
    Ok(())
}

fn load_config() -> Result<PlannerConfig, Box<dyn Error>> {
    let mut config = match env::var("PLANNER_CONFIG") {
        Ok(path) => {
            info!("Loading planner config from {}", path);
            serde_json::from_str(&fs::read_to_string(path)?)?
        }
        Err(_) => PlannerConfig::default(),
    };
    if let Ok(seed) = env::var("GRID_SEED") {
        config.seed = seed.parse()?;
    }
    config.optimiser.validate()?;
    Ok(config)
}

fn load_world(seed: u64) -> Result<GridWorld, Box<dyn Error>> {
    if let Ok(path) = env::var("WORLD_FILE") {
        info!("Loading world from {}", path);
        return Ok(GridWorld::from_json(&fs::read_to_string(path)?)?);
    }
    let size = match env::var("GRID_SIZE") {
        Ok(size) => size.parse()?,
        Err(_) => GRID_SIZE,
    };
    Ok(GridWorld::random(size, seed))
}

pub fn run() -> Result<(), Box<dyn Error>> {
    init_tracing_and_env()?;

    let config = load_config()?;
    let world = load_world(config.seed)?;
    info!(
        "Starting planner on a {}x{} grid, depot {}, {} units, seed {}",
        world.size(),
        world.size(),
        world.depot(),
        world.total_material(),
        config.seed
    );

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let report = plan_bundle(&world, &config, &mut rng)?;

    let straight = plan_straight(&world, &config)?;

    print_bundle("Straight", &straight);
    print_bundle("Initial", &report.initial);
    print_bundle("Optimised", &report.optimised);
    if straight.time() > 0 {
        let saved = straight.time() as i64 - report.optimised.time() as i64;
        let line = format!(
            "Optimised vs straight: {:+} ({:.1}%)",
            -saved,
            -100.0 * saved as f64 / straight.time() as f64
        );
        if saved >= 0 {
            println!("{}", line.green());
        } else {
            println!("{}", line.yellow());
        }
    }

    let filename = env::var("CHECKPOINT_CSV").unwrap_or_else(|_| CHECKPOINT_CSV.to_string());
    save_to_csv(&report.checkpoints, &filename)?;

    let span = span!(Level::INFO, "execution");
    let _guard = span.enter();
    let mut vehicle = SimulatedVehicle::new(world.clone());
    report.optimised.drive(&mut vehicle, &world)?;
    if vehicle.delivered() == world.total_material() {
        info!(
            "Delivered all {} units in {} moves, elapsed {}",
            vehicle.delivered(),
            vehicle.moves(),
            vehicle.elapsed()
        );
    } else {
        warn!(
            "Delivered {} of {} units, {} left on the grid",
            vehicle.delivered(),
            world.total_material(),
            vehicle.remaining()
        );
    }

    Ok(())
}

fn print_bundle(label: &str, bundle: &Bundle) {
    let summary = format!(
        "{} bundle: {} tours, time {}",
        label,
        bundle.clusters().len(),
        bundle.time()
    );
    if bundle.penalty() > 0 {
        println!(
            "{} , {}",
            summary.green(),
            format!("idle penalty {}", bundle.penalty()).red()
        );
    } else {
        println!("{}", summary.green());
    }
}

fn save_to_csv(checkpoints: &[Checkpoint], filename: &str) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path(filename)?;
    for c in checkpoints {
        wtr.serialize(c)?;
    }
    wtr.flush()?;
    info!("Saved {} checkpoints to {}", checkpoints.len(), filename);
    Ok(())
}
