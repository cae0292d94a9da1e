//! The live agent set and the host plants it feeds on.

use crate::agent::Agent;
use crate::grid::TemperatureGrid;
use crate::projection::project;
use lanternfly_core::{Bounds, HostPlant, Position, SeedingConfig, StageCensus};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Agents plus the immutable host list. Agents are stored contiguously so a
/// day's work can be split into disjoint slices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Population {
    agents: Vec<Agent>,
    hosts: Vec<HostPlant>,
    bounds: Bounds,
}

impl Population {
    /// Hosts outside `bounds` are dropped
    pub fn new(agents: Vec<Agent>, hosts: Vec<HostPlant>, bounds: Bounds) -> Self {
        let total = hosts.len();
        let hosts: Vec<HostPlant> = hosts
            .into_iter()
            .filter(|host| bounds.contains(&host.position))
            .collect();

        if hosts.len() < total {
            debug!(
                event = "hosts_discarded",
                kept = hosts.len(),
                discarded = total - hosts.len(),
                "Dropped host plants outside the bounding box"
            );
        }

        Self {
            agents,
            hosts,
            bounds,
        }
    }

    /// Seed eggs from occurrence records. Records and hosts are first mapped
    /// through `config.projection`. Each record is kept with
    /// `keep_probability`; with `warm_start` a kept egg starts with an energy
    /// drawn uniformly from its cell's Celsius range (zero outside the grid).
    pub fn seed<R: Rng + ?Sized>(
        records: &[Position],
        hosts: Vec<HostPlant>,
        grid: &TemperatureGrid,
        config: &SeedingConfig,
        rng: &mut R,
    ) -> Self {
        let mut agents = Vec::new();
        for &position in records {
            if !(rng.gen::<f64>() < config.keep_probability) {
                continue;
            }

            let position = project(config.projection, position);
            let mut agent = Agent::egg(position);
            agent.cell = grid.cell_of(position);
            if config.warm_start {
                if let Some(cell) = agent.cell.and_then(|id| grid.cell(id)) {
                    let low = cell.range.min.min(cell.range.max);
                    let high = cell.range.max.max(cell.range.min);
                    let draw = low + rng.gen::<f64>() * (high - low);
                    agent.energy = draw.max(0.0);
                }
            }
            agents.push(agent);
        }

        let hosts = hosts
            .into_iter()
            .map(|host| HostPlant {
                position: project(config.projection, host.position),
            })
            .collect();

        debug!(
            event = "population_seeded",
            records = records.len(),
            agents = agents.len(),
            projection = ?config.projection,
            "Seeded initial population"
        );

        Self::new(agents, hosts, grid.bounds())
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn hosts(&self) -> &[HostPlant] {
        &self.hosts
    }

    /// Mutable agents alongside the shared host list
    pub fn split_mut(&mut self) -> (&mut [Agent], &[HostPlant]) {
        (&mut self.agents, &self.hosts)
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn width(&self) -> f64 {
        self.bounds.width()
    }

    pub fn height(&self) -> f64 {
        self.bounds.height()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn census(&self) -> StageCensus {
        self.agents.iter().map(|agent| agent.stage).collect()
    }

    /// True when no agent is alive (including when there are none)
    pub fn all_dead(&self) -> bool {
        self.agents.iter().all(|agent| !agent.is_alive())
    }

    /// Drop dead agents, keeping the order of the survivors. Returns how many
    /// were removed.
    pub fn compact(&mut self) -> usize {
        let before = self.agents.len();
        self.agents.retain(Agent::is_alive);
        before - self.agents.len()
    }

    /// Fold a year's offspring into the population: they replace an entirely
    /// dead set and are appended otherwise
    pub fn absorb_offspring(&mut self, offspring: Vec<Agent>) {
        if self.all_dead() {
            self.agents = offspring;
        } else {
            self.agents.extend(offspring);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::equirectangular;
    use lanternfly_core::{CoordinateProjection, LifeStage};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn bounds() -> Bounds {
        Bounds::new(0.0, 0.0, 10.0, 10.0)
    }

    #[test]
    fn test_hosts_outside_bounds_dropped() {
        let hosts = vec![
            HostPlant::new(1.0, 1.0),
            HostPlant::new(11.0, 1.0),
            HostPlant::new(10.0, 10.0),
        ];
        let population = Population::new(Vec::new(), hosts, bounds());
        assert_eq!(population.hosts().len(), 2);
        assert!(population.is_empty());
        assert!(population.all_dead());
    }

    #[test]
    fn test_seed_keeps_everything_at_probability_one() {
        let grid = TemperatureGrid::uniform(bounds(), 2, 20.0).unwrap();
        let config = SeedingConfig {
            keep_probability: 1.0,
            warm_start: true,
            projection: CoordinateProjection::Identity,
        };
        let records = vec![Position::new(1.0, 1.0), Position::new(50.0, 50.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        let population = Population::seed(&records, Vec::new(), &grid, &config, &mut rng);
        assert_eq!(population.len(), 2);

        let agents = population.agents();
        assert!(agents.iter().all(|a| a.stage == LifeStage::Egg && a.is_alive()));
        // uniform grid range is [20, 20]
        assert_eq!(agents[0].energy, 20.0);
        assert_eq!(agents[1].energy, 0.0);
        assert_eq!(agents[1].cell, None);
    }

    #[test]
    fn test_seed_far_record_lands_outside_grid() {
        let grid = TemperatureGrid::uniform(bounds(), 2, 20.0).unwrap();
        let config = SeedingConfig {
            keep_probability: 1.0,
            ..Default::default()
        };
        let records = vec![Position::new(1e300, 5.0), Position::new(-1e300, -1e300)];
        let mut rng = ChaCha8Rng::seed_from_u64(23);

        let population = Population::seed(&records, Vec::new(), &grid, &config, &mut rng);
        assert_eq!(population.len(), 2);
        assert!(population.agents().iter().all(|a| a.cell.is_none() && a.energy == 0.0));
    }

    #[test]
    fn test_seed_projects_records_and_hosts() {
        // A box around 40.5 N, 75.5 W in projected km
        let km = Bounds::new(-6400.0, 4440.0, -6280.0, 4560.0);
        let grid = TemperatureGrid::uniform(km, 1, 20.0).unwrap();
        let config = SeedingConfig {
            keep_probability: 1.0,
            warm_start: false,
            projection: CoordinateProjection::Equirectangular,
        };
        let records = vec![Position::new(-75.5, 40.5)];
        let hosts = vec![HostPlant::new(-75.4, 40.6), HostPlant::new(-75.4, 60.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(24);

        let population = Population::seed(&records, hosts, &grid, &config, &mut rng);
        let agent = &population.agents()[0];
        assert_eq!(agent.position, equirectangular(-75.5, 40.5));
        assert!(agent.cell.is_some());
        // the far-north host projects outside the box and is dropped
        assert_eq!(population.hosts().len(), 1);
        assert_eq!(population.hosts()[0].position, equirectangular(-75.4, 40.6));
    }

    #[test]
    fn test_seed_keep_probability() {
        let grid = TemperatureGrid::uniform(bounds(), 2, 20.0).unwrap();
        let config = SeedingConfig::default();
        let records = vec![Position::new(5.0, 5.0); 10_000];
        let mut rng = ChaCha8Rng::seed_from_u64(22);

        let population = Population::seed(&records, Vec::new(), &grid, &config, &mut rng);
        let rate = population.len() as f64 / records.len() as f64;
        assert!((rate - 0.1).abs() < 0.02);
    }

    #[test]
    fn test_compact_and_census() {
        let mut agents = vec![
            Agent::egg(Position::new(1.0, 1.0)),
            Agent::new(Position::new(2.0, 2.0), LifeStage::Adult, 700.0),
            Agent::new(Position::new(3.0, 3.0), LifeStage::Instar2, 200.0),
        ];
        agents[1].kill();
        let mut population = Population::new(agents, Vec::new(), bounds());

        let census = population.census();
        assert_eq!(census.count(LifeStage::Dead), 1);
        assert_eq!(census.living(), 2);

        assert_eq!(population.compact(), 1);
        assert_eq!(population.len(), 2);
        assert_eq!(population.agents()[1].stage, LifeStage::Instar2);
    }

    #[test]
    fn test_absorb_offspring() {
        let eggs = vec![Agent::egg(Position::new(4.0, 4.0)); 3];

        let mut dead = Agent::new(Position::default(), LifeStage::Adult, 750.0);
        dead.kill();
        let mut extinct = Population::new(vec![dead], Vec::new(), bounds());
        extinct.absorb_offspring(eggs.clone());
        assert_eq!(extinct.len(), 3);

        let survivor = Agent::egg(Position::new(1.0, 1.0));
        let mut living = Population::new(vec![survivor], Vec::new(), bounds());
        living.absorb_offspring(eggs);
        assert_eq!(living.len(), 4);
    }
}
