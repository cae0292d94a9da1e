//! A self-contained run description: configuration plus every external input.

use crate::grid::TemperatureGrid;
use crate::population::Population;
use crate::simulation::{simulate, SimulationResult};
use lanternfly_core::{HostPlant, Position, Result, SimulationConfig, TemperatureRange};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// Everything needed to reproduce a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub config: SimulationConfig,
    /// (max, min) temperature per region label, in `config.grid.source_unit`
    pub temperatures: HashMap<String, TemperatureRange>,
    pub hosts: Vec<HostPlant>,
    /// Observed insect locations used to seed the initial population
    pub occurrences: Vec<Position>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.config.validate()?;
        Ok(scenario)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the grid, seed the population and run every configured year
    pub fn execute(self) -> Result<SimulationResult> {
        self.config.validate()?;
        let grid = TemperatureGrid::new(&self.config.grid, &self.temperatures)?;

        // Daily streams are derived per partition; this one is only for seeding
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let population = Population::seed(
            &self.occurrences,
            self.hosts,
            &grid,
            &self.config.seeding,
            &mut rng,
        );

        info!(
            event = "scenario_start",
            occurrences = self.occurrences.len(),
            agents = population.len(),
            hosts = population.hosts().len(),
            years = self.config.num_years,
            "Executing scenario"
        );

        simulate(self.config, grid, population)
    }
}
