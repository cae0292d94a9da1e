//! Configuration types for the simulation.
//!
//! Every biological constant lives here as a plain value with a `Default`
//! carrying the reference parameters. A [`SimulationConfig`] is validated once
//! before any simulated day runs and is never mutated afterwards.

use crate::error::{Error, Result};
use crate::types::{Bounds, LifeStage, TemperatureUnit};
use serde::{Deserialize, Serialize};

/// Reference bounding box of the contiguous United States (longitude, latitude)
pub const REFERENCE_MIN_LON: f64 = -123.27;
pub const REFERENCE_MAX_LON: f64 = -68.93;
pub const REFERENCE_MIN_LAT: f64 = 31.33;
pub const REFERENCE_MAX_LAT: f64 = 45.71;

/// Region labels of the reference 5x5 grid, north-west to south-east
pub const REFERENCE_REGION_TABLE: [&str; 25] = [
    "OR", "CT", "VT", "MA", "ME", //
    "NJ", "NY", "PA", "MD", "DE", //
    "WV", "VA", "NC", "DC", "SC", //
    "NM", "MO", "IN", "OH", "MI", //
    "AZ", "UT", "KY", "RI", "KS",
];

fn check_probability(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::Config(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

/// Per-stage base temperatures (degrees Celsius)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseTemperatures {
    pub egg: f64,
    pub instar1: f64,
    pub instar2: f64,
    pub instar3: f64,
    pub instar4: f64,
    pub adult: f64,
}

impl Default for BaseTemperatures {
    fn default() -> Self {
        Self {
            egg: 0.0,
            instar1: 13.00,
            instar2: 12.43,
            instar3: 8.48,
            instar4: 6.29,
            adult: 5.0,
        }
    }
}

impl BaseTemperatures {
    pub fn for_stage(&self, stage: LifeStage) -> f64 {
        match stage {
            LifeStage::Egg => self.egg,
            LifeStage::Instar1 => self.instar1,
            LifeStage::Instar2 => self.instar2,
            LifeStage::Instar3 => self.instar3,
            LifeStage::Instar4 => self.instar4,
            LifeStage::Adult => self.adult,
            LifeStage::Dead => 0.0,
        }
    }
}

/// Degree-day development parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevelopmentConfig {
    pub base_temperatures: BaseTemperatures,
    /// Accumulated degree-days at which an egg hatches into Instar1
    pub egg_hatch_threshold: f64,
    /// Cumulative thresholds: Instar1->2, 2->3, 3->4, 4->Adult, Adult->Dead
    pub stage_thresholds: Vec<f64>,
}

impl Default for DevelopmentConfig {
    fn default() -> Self {
        Self {
            base_temperatures: BaseTemperatures::default(),
            egg_hatch_threshold: 50.0,
            stage_thresholds: vec![166.6, 208.7, 410.5, 620.0, 800.0],
        }
    }
}

impl DevelopmentConfig {
    pub const THRESHOLD_COUNT: usize = 5;

    /// Energy at which an adult dies of old age
    pub fn lifespan_threshold(&self) -> f64 {
        self.stage_thresholds
            .last()
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    pub fn validate(&self) -> Result<()> {
        if self.stage_thresholds.is_empty() {
            return Err(Error::Config("stage threshold table is empty".to_string()));
        }
        if self.stage_thresholds.len() != Self::THRESHOLD_COUNT {
            return Err(Error::Config(format!(
                "expected {} stage thresholds, got {}",
                Self::THRESHOLD_COUNT,
                self.stage_thresholds.len()
            )));
        }
        if self.stage_thresholds.iter().any(|t| !t.is_finite()) {
            return Err(Error::Config("stage thresholds must be finite".to_string()));
        }
        if self.stage_thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::Config(
                "stage thresholds must be strictly increasing".to_string(),
            ));
        }
        if !self.egg_hatch_threshold.is_finite() || self.egg_hatch_threshold < 0.0 {
            return Err(Error::Config(format!(
                "egg hatch threshold must be a non-negative number, got {}",
                self.egg_hatch_threshold
            )));
        }
        if self.egg_hatch_threshold >= self.stage_thresholds[0] {
            return Err(Error::Config(
                "egg hatch threshold must lie below the Instar1->Instar2 threshold".to_string(),
            ));
        }
        Ok(())
    }
}

/// When the stage survival probability is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MortalitySchedule {
    /// One survival roll per simulated day
    Daily,
    /// One survival roll on the day an agent enters a new stage
    OnStageEntry,
}

/// Per-stage survival probabilities. An agent survives a check when its
/// uniform sample is less than or equal to the stage probability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortalityConfig {
    pub instar1_survival: f64,
    pub instar2_survival: f64,
    pub instar3_survival: f64,
    pub instar4_survival: f64,
    pub adult_survival: f64,
    pub schedule: MortalitySchedule,
}

impl Default for MortalityConfig {
    fn default() -> Self {
        Self {
            instar1_survival: 0.6488,
            instar2_survival: 0.9087,
            instar3_survival: 0.8948,
            instar4_survival: 0.822,
            adult_survival: 0.5837,
            schedule: MortalitySchedule::Daily,
        }
    }
}

impl MortalityConfig {
    /// Survival probability for a stage; `None` for stages that are never checked
    pub fn survival_probability(&self, stage: LifeStage) -> Option<f64> {
        match stage {
            LifeStage::Instar1 => Some(self.instar1_survival),
            LifeStage::Instar2 => Some(self.instar2_survival),
            LifeStage::Instar3 => Some(self.instar3_survival),
            LifeStage::Instar4 => Some(self.instar4_survival),
            LifeStage::Adult => Some(self.adult_survival),
            LifeStage::Egg | LifeStage::Dead => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_probability("instar1_survival", self.instar1_survival)?;
        check_probability("instar2_survival", self.instar2_survival)?;
        check_probability("instar3_survival", self.instar3_survival)?;
        check_probability("instar4_survival", self.instar4_survival)?;
        check_probability("adult_survival", self.adult_survival)
    }
}

/// How distance to a host plant is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Straight-line distance in position units
    Euclidean,
    /// Haversine distance, treating positions as (longitude, latitude) degrees
    GreatCircle,
}

/// Closed range of movement magnitudes in position units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceRange {
    pub min: f64,
    pub max: f64,
}

impl DistanceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min < 0.0 || self.min > self.max
        {
            return Err(Error::Config(format!(
                "{} must satisfy 0 <= min <= max, got [{}, {}]",
                name, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Dispersal parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementConfig {
    /// Probability of a random walk step; the remainder is host-directed
    pub random_probability: f64,
    /// Probability that a random step is a long-distance (human-assisted) jump
    pub long_distance_probability: f64,
    pub short_hop: DistanceRange,
    pub long_distance: DistanceRange,
    pub distance_metric: DistanceMetric,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            random_probability: 0.7,
            long_distance_probability: 0.1,
            short_hop: DistanceRange::new(0.0, 0.05),
            long_distance: DistanceRange::new(0.5, 5.0),
            distance_metric: DistanceMetric::Euclidean,
        }
    }
}

impl MovementConfig {
    pub fn validate(&self) -> Result<()> {
        check_probability("random_probability", self.random_probability)?;
        check_probability("long_distance_probability", self.long_distance_probability)?;
        self.short_hop.validate("short_hop")?;
        self.long_distance.validate("long_distance")
    }
}

/// Egg-laying parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FecundityConfig {
    /// Energy at which the oviposition probability starts rising above zero
    pub oviposition_onset: f64,
    /// Energy at which the oviposition probability reaches one
    pub oviposition_full: f64,
    pub min_egg_masses: u32,
    pub max_egg_masses: u32,
    pub min_eggs_per_mass: u32,
    pub max_eggs_per_mass: u32,
    /// Maximum number of laying events per adult; `None` for unlimited
    pub max_clutches: Option<u32>,
}

impl Default for FecundityConfig {
    fn default() -> Self {
        Self {
            oviposition_onset: 620.0,
            oviposition_full: 700.0,
            min_egg_masses: 1,
            max_egg_masses: 2,
            min_eggs_per_mass: 30,
            max_eggs_per_mass: 59,
            max_clutches: Some(1),
        }
    }
}

impl FecundityConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.oviposition_onset.is_finite()
            || !self.oviposition_full.is_finite()
            || self.oviposition_onset >= self.oviposition_full
        {
            return Err(Error::Config(format!(
                "oviposition ramp must satisfy onset < full, got [{}, {}]",
                self.oviposition_onset, self.oviposition_full
            )));
        }
        if self.min_egg_masses == 0 || self.min_egg_masses > self.max_egg_masses {
            return Err(Error::Config(format!(
                "egg masses must satisfy 1 <= min <= max, got [{}, {}]",
                self.min_egg_masses, self.max_egg_masses
            )));
        }
        if self.min_eggs_per_mass == 0 || self.min_eggs_per_mass > self.max_eggs_per_mass {
            return Err(Error::Config(format!(
                "eggs per mass must satisfy 1 <= min <= max, got [{}, {}]",
                self.min_eggs_per_mass, self.max_eggs_per_mass
            )));
        }
        Ok(())
    }
}

/// Calendar parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonConfig {
    pub days_per_year: u32,
    /// Days strictly after this one kill every non-egg agent
    pub winter_onset_day: u32,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self {
            days_per_year: 365,
            winter_onset_day: 214,
        }
    }
}

impl SeasonConfig {
    pub fn validate(&self) -> Result<()> {
        if self.days_per_year == 0 {
            return Err(Error::Config("days_per_year must be positive".to_string()));
        }
        Ok(())
    }
}

/// Which reading of a (max, min) pair becomes the cell temperature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureReading {
    Max,
    Min,
    Mean,
}

/// Temperature grid layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub bounds: Bounds,
    /// Cells per side; the grid holds `divisions * divisions` cells
    pub divisions: u32,
    /// Region label of each cell in row-major order, starting at the
    /// north-western cell
    pub region_table: Vec<String>,
    pub source_unit: TemperatureUnit,
    pub reading: TemperatureReading,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::new(
                REFERENCE_MIN_LON,
                REFERENCE_MIN_LAT,
                REFERENCE_MAX_LON,
                REFERENCE_MAX_LAT,
            ),
            divisions: 5,
            region_table: REFERENCE_REGION_TABLE
                .iter()
                .map(|label| label.to_string())
                .collect(),
            source_unit: TemperatureUnit::Fahrenheit,
            reading: TemperatureReading::Max,
        }
    }
}

impl GridConfig {
    pub fn cell_count(&self) -> usize {
        (self.divisions as usize) * (self.divisions as usize)
    }

    pub fn validate(&self) -> Result<()> {
        let width = self.bounds.width();
        let height = self.bounds.height();
        if !(width.is_finite() && width > 0.0) || !(height.is_finite() && height > 0.0) {
            return Err(Error::Config(format!(
                "grid bounds must have positive width and height, got {} x {}",
                width, height
            )));
        }
        if self.divisions == 0 {
            return Err(Error::Config("grid divisions must be positive".to_string()));
        }
        if self.region_table.len() != self.cell_count() {
            return Err(Error::Config(format!(
                "region table has {} labels for {} cells",
                self.region_table.len(),
                self.cell_count()
            )));
        }
        Ok(())
    }
}

/// Coordinate transform applied to occurrence records and host plants
/// before they are placed on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoordinateProjection {
    /// Inputs are already in grid units
    #[default]
    Identity,
    /// Inputs are (longitude, latitude) degrees, projected to km. The grid
    /// bounds must then be given in projected km as well.
    Equirectangular,
}

/// Initial population seeding from occurrence records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedingConfig {
    /// Probability that an occurrence record becomes a live agent
    pub keep_probability: f64,
    /// Draw starting energy from the temperature range of the agent's cell
    pub warm_start: bool,
    #[serde(default)]
    pub projection: CoordinateProjection,
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            keep_probability: 0.1,
            warm_start: true,
            projection: CoordinateProjection::Identity,
        }
    }
}

impl SeedingConfig {
    pub fn validate(&self) -> Result<()> {
        check_probability("keep_probability", self.keep_probability)
    }
}

/// Top-level simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Number of simulated years
    pub num_years: u32,
    /// Worker threads for the per-day fan-out; 0 uses the available parallelism
    pub workers: usize,
    /// Emit a snapshot every `snapshot_stride` days
    pub snapshot_stride: u32,
    /// Emit population metrics every `metrics_interval_days` days
    pub metrics_interval_days: u32,
    pub development: DevelopmentConfig,
    pub mortality: MortalityConfig,
    pub movement: MovementConfig,
    pub fecundity: FecundityConfig,
    pub season: SeasonConfig,
    pub grid: GridConfig,
    pub seeding: SeedingConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            num_years: 1,
            workers: 0,
            snapshot_stride: 1,
            metrics_interval_days: 30,
            development: DevelopmentConfig::default(),
            mortality: MortalityConfig::default(),
            movement: MovementConfig::default(),
            fecundity: FecundityConfig::default(),
            season: SeasonConfig::default(),
            grid: GridConfig::default(),
            seeding: SeedingConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every parameter. Run before the first simulated day.
    pub fn validate(&self) -> Result<()> {
        if self.snapshot_stride == 0 {
            return Err(Error::Config("snapshot_stride must be positive".to_string()));
        }
        if self.metrics_interval_days == 0 {
            return Err(Error::Config(
                "metrics_interval_days must be positive".to_string(),
            ));
        }
        self.development.validate()?;
        self.mortality.validate()?;
        self.movement.validate()?;
        self.fecundity.validate()?;
        self.season.validate()?;
        self.grid.validate()?;
        self.seeding.validate()
    }
}
