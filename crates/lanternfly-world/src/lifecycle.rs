//! Degree-day development and the life-stage state machine.
//!
//! Development is driven only by accumulated degree-days. Stage thresholds are
//! cumulative, so energy is never reset on a stage change; an egg hatches once
//! it reaches the egg-hatch threshold, nymphs step through the instar
//! thresholds, and an adult dies of age at the last threshold.

use lanternfly_core::{DevelopmentConfig, LifeStage};

/// Stages reached by meeting 0, 1, .. 5 cumulative thresholds
const STAGE_LADDER: [LifeStage; 6] = [
    LifeStage::Instar1,
    LifeStage::Instar2,
    LifeStage::Instar3,
    LifeStage::Instar4,
    LifeStage::Adult,
    LifeStage::Dead,
];

/// Usable thermal energy for one day: `max(0, (T + base) / 2 - base)`
pub fn degree_day(stage: LifeStage, temperature: f64, config: &DevelopmentConfig) -> f64 {
    let base = config.base_temperatures.for_stage(stage);
    let dd = (temperature + base) / 2.0 - base;
    // NaN also ends up as zero here
    if dd > 0.0 {
        dd
    } else {
        0.0
    }
}

/// Stage implied by `energy`, never earlier than `stage`
pub fn advance_stage(stage: LifeStage, energy: f64, config: &DevelopmentConfig) -> LifeStage {
    if stage == LifeStage::Dead {
        return LifeStage::Dead;
    }
    if stage == LifeStage::Egg && !(energy >= config.egg_hatch_threshold) {
        return LifeStage::Egg;
    }

    let met = config
        .stage_thresholds
        .iter()
        .take_while(|threshold| energy >= **threshold)
        .count()
        .min(STAGE_LADDER.len() - 1);

    STAGE_LADDER[met].max(stage)
}
