//! Day-stepped population driver.
//!
//! Each simulated day the agent array is cut into one contiguous slice per
//! worker. Workers run the full per-agent pipeline on their slice with their
//! own random source and return the eggs laid on that slice; the driver joins
//! all workers before touching the population again. Offspring are held back
//! until the end of the year.

use crate::agent::Agent;
use crate::fecundity;
use crate::grid::TemperatureGrid;
use crate::lifecycle::{advance_stage, degree_day};
use crate::mortality;
use crate::movement::{self, MovementKind};
use crate::population::Population;
use crate::snapshot::PopulationSnapshot;
use lanternfly_core::{
    Error, HostPlant, LifeStage, MortalitySchedule, Result, SimulationConfig, StageCensus,
    YearSummary,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};
use tracing::{debug, event, info, instrument, trace, Level};

/// Outcome of one simulated day
#[derive(Debug, Clone)]
pub struct DayReport {
    pub year: u32,
    pub day: u32,
    /// Agents alive at the start of the day
    pub processed: usize,
    /// Deaths from old age or failed survival checks
    pub deaths: usize,
    pub winter_kills: usize,
    pub eggs_laid: usize,
    pub directed_moves: usize,
    /// Directed moves that found no host and stepped randomly instead
    pub fallback_moves: usize,
    /// Census after the day, dead included
    pub census: StageCensus,
    pub snapshot: Option<PopulationSnapshot>,
}

#[derive(Debug, Clone)]
pub struct YearReport {
    pub summary: YearSummary,
    pub snapshots: Vec<PopulationSnapshot>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SimulationResult {
    /// The initial state (day 0) followed by every sampled day
    pub snapshots: Vec<PopulationSnapshot>,
    pub years: Vec<YearSummary>,
    pub final_population: Population,
}

impl SimulationResult {
    pub fn extinct(&self) -> bool {
        self.final_population.is_empty()
    }
}

/// Per-worker tallies for one day
#[derive(Debug, Default)]
struct PartitionOutcome {
    offspring: Vec<Agent>,
    processed: usize,
    deaths: usize,
    winter_kills: usize,
    directed_moves: usize,
    fallback_moves: usize,
    /// Stages on the slice once the day is done
    census: StageCensus,
}

pub struct Simulation {
    config: SimulationConfig,
    grid: TemperatureGrid,
    population: Population,
    pool: ThreadPool,
    year: u32,
    /// Eggs laid this year, in partition order
    offspring: Vec<Agent>,
}

impl Simulation {
    pub fn new(
        config: SimulationConfig,
        grid: TemperatureGrid,
        population: Population,
    ) -> Result<Self> {
        config.validate()?;
        if grid.bounds() != config.grid.bounds || grid.divisions() != config.grid.divisions {
            return Err(Error::Validation(format!(
                "grid of {} divisions over {:?} does not match configured {} over {:?}",
                grid.divisions(),
                grid.bounds(),
                config.grid.divisions,
                config.grid.bounds
            )));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|index| format!("lanternfly-worker-{}", index))
            .build()
            .map_err(|e| Error::ThreadPool(e.to_string()))?;

        info!(
            event = "simulation_created",
            agents = population.len(),
            hosts = population.hosts().len(),
            cells = grid.len(),
            workers = pool.current_num_threads(),
            seed = config.seed,
            lifespan = config.development.lifespan_threshold(),
            "Simulation ready"
        );

        Ok(Self {
            config,
            grid,
            population,
            pool,
            year: 0,
            offspring: Vec::new(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn grid(&self) -> &TemperatureGrid {
        &self.grid
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Eggs laid this year that have not yet joined the population
    pub fn pending_offspring(&self) -> &[Agent] {
        &self.offspring
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run every year requested, stopping early on extinction
    #[instrument(skip(self), fields(seed = self.config.seed, agents = self.population.len()))]
    pub fn simulate(&mut self, num_years: u32) -> SimulationResult {
        info!("Starting simulation for {} years", num_years);

        let mut snapshots = vec![PopulationSnapshot::capture(&self.population, self.year, 0)];
        let mut years = Vec::with_capacity(num_years as usize);

        for _ in 0..num_years {
            let report = self.step_year();
            let extinct = report.summary.extinct;
            snapshots.extend(report.snapshots);
            years.push(report.summary);

            if extinct {
                info!(
                    event = "extinction",
                    year = self.year,
                    "Population extinct, stopping early"
                );
                break;
            }
        }

        event!(
            Level::INFO,
            gauge_name = "final_population",
            gauge_value = self.population.len(),
            "Final population gauge"
        );

        SimulationResult {
            snapshots,
            years,
            final_population: self.population.clone(),
        }
    }

    /// Run one year of days, then fold the year's offspring into the
    /// population and reset every carried agent's energy
    pub fn step_year(&mut self) -> YearReport {
        let year = self.year;
        let mut summary = YearSummary::new(year, self.population.len());
        let mut snapshots = Vec::new();

        for day in 1..=self.config.season.days_per_year {
            if self.population.is_empty() && self.offspring.is_empty() {
                break;
            }

            let report = self.step_day(day);
            summary.days_simulated = day;
            summary.deaths += report.deaths;
            summary.winter_kills += report.winter_kills;
            summary.eggs_laid += report.eggs_laid;
            summary.observe(&report.census);
            snapshots.extend(report.snapshot);
        }

        self.fold_year();
        summary.final_population = self.population.len();
        summary.extinct = self.population.is_empty();

        info!(
            event = "year_summary",
            year = summary.year,
            days = summary.days_simulated,
            starting_population = summary.starting_population,
            peak_population = summary.peak_population,
            peak_adults = summary.peak_adults,
            deaths = summary.deaths,
            winter_kills = summary.winter_kills,
            eggs_laid = summary.eggs_laid,
            final_population = summary.final_population,
            "Year complete"
        );
        event!(
            Level::INFO,
            gauge_name = "population_total",
            gauge_value = summary.final_population,
            year = summary.year,
            "Population gauge"
        );
        event!(
            Level::INFO,
            gauge_name = "eggs_laid",
            gauge_value = summary.eggs_laid,
            year = summary.year,
            "Eggs laid this year"
        );

        self.year += 1;
        YearReport { summary, snapshots }
    }

    fn fold_year(&mut self) {
        let offspring = std::mem::take(&mut self.offspring);
        self.population.absorb_offspring(offspring);
        for agent in self.population.agents_mut() {
            agent.begin_year();
        }
    }

    /// Advance every live agent by one day. `day` counts from 1.
    pub fn step_day(&mut self, day: u32) -> DayReport {
        let year = self.year;
        let winter = day > self.config.season.winter_onset_day;
        let partitions = self.pool.current_num_threads().max(1);

        let config = &self.config;
        let grid = &self.grid;
        let (agents, hosts) = self.population.split_mut();
        let chunk_size = ((agents.len() + partitions - 1) / partitions).max(1);

        let outcomes: Vec<PartitionOutcome> = self.pool.install(|| {
            agents
                .par_chunks_mut(chunk_size)
                .enumerate()
                .map(|(index, slice)| {
                    let seed = partition_seed(config.seed, year, day, index);
                    let mut rng = ChaCha8Rng::seed_from_u64(seed);
                    process_partition(slice, hosts, grid, config, winter, &mut rng)
                })
                .collect()
        });

        let mut processed = 0;
        let mut deaths = 0;
        let mut winter_kills = 0;
        let mut eggs_laid = 0;
        let mut directed_moves = 0;
        let mut fallback_moves = 0;
        let mut census = StageCensus::new();
        for outcome in outcomes {
            processed += outcome.processed;
            deaths += outcome.deaths;
            winter_kills += outcome.winter_kills;
            directed_moves += outcome.directed_moves;
            fallback_moves += outcome.fallback_moves;
            eggs_laid += outcome.offspring.len();
            census.merge(&outcome.census);
            self.offspring.extend(outcome.offspring);
        }

        let snapshot = self
            .snapshot_due(day)
            .then(|| PopulationSnapshot::capture(&self.population, year, day));
        self.population.compact();

        trace!(
            event = "day_complete",
            year,
            day,
            processed,
            deaths,
            winter_kills,
            eggs_laid,
            directed_moves,
            fallback_moves,
            "Day complete"
        );

        if day % self.config.metrics_interval_days == 0 {
            self.emit_population_metrics(day, &census);
        }

        DayReport {
            year,
            day,
            processed,
            deaths,
            winter_kills,
            eggs_laid,
            directed_moves,
            fallback_moves,
            census,
            snapshot,
        }
    }

    fn snapshot_due(&self, day: u32) -> bool {
        let elapsed = self.year as u64 * self.config.season.days_per_year as u64 + day as u64;
        elapsed % self.config.snapshot_stride as u64 == 0
    }

    fn emit_population_metrics(&self, day: u32, census: &StageCensus) {
        let living = census.living();
        let avg_energy = if self.population.is_empty() {
            0.0
        } else {
            let total: f64 = self.population.agents().iter().map(|a| a.energy).sum();
            total / self.population.len() as f64
        };

        info!(
            event = "population_metrics",
            year = self.year,
            day,
            living,
            eggs = census.count(LifeStage::Egg),
            nymphs = census.nymphs(),
            adults = census.count(LifeStage::Adult),
            pending_eggs = self.offspring.len(),
            avg_energy = format!("{:.1}", avg_energy),
            "Population metrics snapshot"
        );

        event!(
            Level::INFO,
            gauge_name = "population_living",
            gauge_value = living,
            year = self.year,
            day,
            "Living agents"
        );
    }
}

/// Run the day's pipeline over one worker's slice
fn process_partition(
    agents: &mut [Agent],
    hosts: &[HostPlant],
    grid: &TemperatureGrid,
    config: &SimulationConfig,
    winter: bool,
    rng: &mut ChaCha8Rng,
) -> PartitionOutcome {
    let mut outcome = PartitionOutcome::default();

    for agent in agents.iter_mut().filter(|agent| agent.is_alive()) {
        outcome.processed += 1;

        agent.cell = grid.cell_of(agent.position);
        let temperature = grid.temperature_of(agent.cell);
        agent.accumulate(degree_day(agent.stage, temperature, &config.development));

        let next = advance_stage(agent.stage, agent.energy, &config.development);
        let changed = agent.advance_to(next);
        if !agent.is_alive() {
            outcome.deaths += 1;
            continue;
        }

        let check = match config.mortality.schedule {
            MortalitySchedule::Daily => true,
            MortalitySchedule::OnStageEntry => changed,
        };
        if check && !mortality::survives(agent.stage, &config.mortality, rng) {
            agent.kill();
            outcome.deaths += 1;
            continue;
        }

        let step = movement::disperse(agent.position, hosts, &config.movement, rng);
        agent.position = step.position;
        match step.kind {
            MovementKind::Random => {}
            MovementKind::Directed => outcome.directed_moves += 1,
            MovementKind::Fallback => outcome.fallback_moves += 1,
        }

        if agent.stage == LifeStage::Adult {
            outcome
                .offspring
                .extend(fecundity::reproduce(agent, &config.fecundity, rng));
        }

        if winter && agent.stage != LifeStage::Egg {
            agent.kill();
            outcome.winter_kills += 1;
        }
    }

    outcome.census = agents.iter().map(|agent| agent.stage).collect();
    outcome
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed for one worker's random source on one day
fn partition_seed(seed: u64, year: u32, day: u32, index: usize) -> u64 {
    [year as u64, day as u64, index as u64]
        .into_iter()
        .fold(splitmix64(seed), |state, value| splitmix64(state ^ value))
}

/// Build a driver for `config.num_years` years and run it
pub fn simulate(
    config: SimulationConfig,
    grid: TemperatureGrid,
    population: Population,
) -> Result<SimulationResult> {
    let num_years = config.num_years;
    let mut simulation = Simulation::new(config, grid, population)?;
    debug!(workers = simulation.workers(), "Thread pool sized");
    Ok(simulation.simulate(num_years))
}
