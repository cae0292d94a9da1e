//! Command-line runner for the lanternfly spread simulation.
//!
//! Environment:
//! - `LANTERNFLY_SCENARIO`: JSON scenario file (config plus inputs)
//! - `LANTERNFLY_CONFIG`: JSON config file, run against the built-in demo inputs
//! - `LANTERNFLY_OUTPUT`: write the yearly summaries here as JSON
//! - `LANTERNFLY_SNAPSHOT`: write the last snapshot here in its binary encoding

mod demo;
mod telemetry;

use anyhow::{Context, Result};
use lanternfly_core::SimulationConfig;
use lanternfly_world::Scenario;
use std::fs;
use tracing::{info, warn};

fn main() -> Result<()> {
    telemetry::init_telemetry()?;

    let scenario = load_scenario()?;
    info!(
        seed = scenario.config.seed,
        years = scenario.config.num_years,
        workers = scenario.config.workers,
        occurrences = scenario.occurrences.len(),
        "Starting lanternfly simulation"
    );

    let result = scenario.execute()?;

    for year in &result.years {
        info!(
            year = year.year,
            peak_adults = year.peak_adults,
            eggs_laid = year.eggs_laid,
            final_population = year.final_population,
            "Year {} finished with {} agents",
            year.year,
            year.final_population
        );
    }
    if result.extinct() {
        warn!("Population went extinct");
    }

    if let Ok(path) = std::env::var("LANTERNFLY_OUTPUT") {
        let json = serde_json::to_string_pretty(&result.years)?;
        fs::write(&path, json).with_context(|| format!("writing summaries to {}", path))?;
        info!("Wrote yearly summaries to {}", path);
    }

    if let Ok(path) = std::env::var("LANTERNFLY_SNAPSHOT") {
        match result.snapshots.last() {
            Some(snapshot) => {
                fs::write(&path, snapshot.to_bytes()?)
                    .with_context(|| format!("writing snapshot to {}", path))?;
                info!(year = snapshot.year, day = snapshot.day, "Wrote snapshot to {}", path);
            }
            None => warn!("No snapshot to write"),
        }
    }

    info!(
        snapshots = result.snapshots.len(),
        final_population = result.final_population.len(),
        "Simulation complete"
    );
    Ok(())
}

fn load_scenario() -> Result<Scenario> {
    if let Ok(path) = std::env::var("LANTERNFLY_SCENARIO") {
        let json = fs::read_to_string(&path).with_context(|| format!("reading scenario {}", path))?;
        info!("Loaded scenario from {}", path);
        return Ok(Scenario::from_json(&json)?);
    }

    let config = match std::env::var("LANTERNFLY_CONFIG") {
        Ok(path) => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            info!("Loaded configuration from {}", path);
            SimulationConfig::from_json(&json)?
        }
        Err(_) => SimulationConfig::default(),
    };

    Ok(demo::scenario(config))
}
