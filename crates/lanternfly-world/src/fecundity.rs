//! Egg laying by adults.
//!
//! The chance that an adult lays on a given day follows a smoothstep ramp of
//! its accumulated energy: zero below `oviposition_onset`, one at or above
//! `oviposition_full`, and `t^2 (3 - 2t)` in between. A successful laying
//! event produces one or more egg masses, each holding a uniform number of
//! eggs, all placed at the parent's position.

use crate::agent::Agent;
use lanternfly_core::{FecundityConfig, LifeStage};
use rand::Rng;

/// Daily oviposition probability for an adult with `energy` degree-days
pub fn oviposition_probability(energy: f64, config: &FecundityConfig) -> f64 {
    let span = config.oviposition_full - config.oviposition_onset;
    let t = ((energy - config.oviposition_onset) / span).clamp(0.0, 1.0);
    if t.is_nan() {
        return 0.0;
    }
    t * t * (3.0 - 2.0 * t)
}

/// Eggs laid by `parent` today, if any. Only live adults below their clutch
/// limit lay; a laying event counts against the limit.
pub fn reproduce<R: Rng + ?Sized>(
    parent: &mut Agent,
    config: &FecundityConfig,
    rng: &mut R,
) -> Vec<Agent> {
    if !parent.is_alive() || parent.stage != LifeStage::Adult {
        return Vec::new();
    }
    if let Some(limit) = config.max_clutches {
        if parent.clutches >= limit {
            return Vec::new();
        }
    }

    let probability = oviposition_probability(parent.energy, config);
    if !(rng.gen::<f64>() < probability) {
        return Vec::new();
    }

    let masses = rng.gen_range(config.min_egg_masses..=config.max_egg_masses);
    let total: u32 = (0..masses)
        .map(|_| rng.gen_range(config.min_eggs_per_mass..=config.max_eggs_per_mass))
        .sum();

    parent.clutches += 1;
    (0..total).map(|_| Agent::egg(parent.position)).collect()
}
