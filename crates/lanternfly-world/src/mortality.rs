//! Stage-conditioned stochastic survival.

use lanternfly_core::{LifeStage, MortalityConfig};
use rand::Rng;

/// Draw one uniform sample and compare it against the stage survival
/// probability. Eggs are never checked; the dead never survive.
pub fn survives<R: Rng + ?Sized>(stage: LifeStage, config: &MortalityConfig, rng: &mut R) -> bool {
    if stage == LifeStage::Dead {
        return false;
    }
    match config.survival_probability(stage) {
        Some(probability) => rng.gen::<f64>() <= probability,
        None => true,
    }
}
