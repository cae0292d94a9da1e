//! Population census and yearly statistics.

use crate::types::LifeStage;
use serde::{Deserialize, Serialize};

/// Number of agents in each life stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCensus {
    counts: [usize; LifeStage::COUNT],
}

impl StageCensus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stage: LifeStage) {
        self.counts[stage.index()] += 1;
    }

    pub fn count(&self, stage: LifeStage) -> usize {
        self.counts[stage.index()]
    }

    /// Agents in any stage other than Dead
    pub fn living(&self) -> usize {
        self.counts.iter().sum::<usize>() - self.count(LifeStage::Dead)
    }

    pub fn nymphs(&self) -> usize {
        LifeStage::all()
            .iter()
            .filter(|stage| stage.is_nymph())
            .map(|stage| self.count(*stage))
            .sum()
    }

    pub fn merge(&mut self, other: &StageCensus) {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts.iter()) {
            *mine += theirs;
        }
    }
}

impl FromIterator<LifeStage> for StageCensus {
    fn from_iter<I: IntoIterator<Item = LifeStage>>(iter: I) -> Self {
        let mut census = StageCensus::new();
        for stage in iter {
            census.record(stage);
        }
        census
    }
}

/// Aggregate statistics for one simulated year
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: u32,
    pub days_simulated: u32,
    pub starting_population: usize,
    pub peak_population: usize,
    pub peak_adults: usize,
    pub deaths: usize,
    pub winter_kills: usize,
    pub eggs_laid: usize,
    pub final_population: usize,
    pub extinct: bool,
}

impl YearSummary {
    pub fn new(year: u32, starting_population: usize) -> Self {
        Self {
            year,
            starting_population,
            peak_population: starting_population,
            ..Default::default()
        }
    }

    /// Fold one day's census into the running peaks
    pub fn observe(&mut self, census: &StageCensus) {
        self.peak_population = self.peak_population.max(census.living());
        self.peak_adults = self.peak_adults.max(census.count(LifeStage::Adult));
    }
}
