//! Dispersal: random walk with occasional long-distance jumps, or movement
//! toward the nearest host plant.

use crate::projection;
use lanternfly_core::{DistanceMetric, DistanceRange, HostPlant, MovementConfig, Position};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// How a step was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    Random,
    Directed,
    /// Directed movement was chosen but there was no host to move toward
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub position: Position,
    pub kind: MovementKind,
}

/// Move one agent. Random movement is chosen with `random_probability`,
/// otherwise the agent heads for the nearest host plant.
pub fn disperse<R: Rng + ?Sized>(
    position: Position,
    hosts: &[HostPlant],
    config: &MovementConfig,
    rng: &mut R,
) -> Step {
    if rng.gen::<f64>() < config.random_probability {
        return Step {
            position: random_step(position, config, rng),
            kind: MovementKind::Random,
        };
    }

    match directed_step(position, hosts, config.distance_metric, rng) {
        Some(position) => Step {
            position,
            kind: MovementKind::Directed,
        },
        None => Step {
            position: random_step(position, config, rng),
            kind: MovementKind::Fallback,
        },
    }
}

/// Uniform heading in [0, 2π) with a magnitude from the short-hop or the
/// long-distance range
pub fn random_step<R: Rng + ?Sized>(
    position: Position,
    config: &MovementConfig,
    rng: &mut R,
) -> Position {
    let range = if rng.gen::<f64>() < config.long_distance_probability {
        config.long_distance
    } else {
        config.short_hop
    };

    let angle = rng.gen::<f64>() * TAU;
    let magnitude = sample_magnitude(range, rng);
    position.add(magnitude * angle.cos(), magnitude * angle.sin())
}

fn sample_magnitude<R: Rng + ?Sized>(range: DistanceRange, rng: &mut R) -> f64 {
    if range.max > range.min {
        rng.gen_range(range.min..=range.max)
    } else {
        range.min
    }
}

/// Move a uniform fraction in [0, 1) of the way to the nearest host.
/// `None` when there are no hosts.
pub fn directed_step<R: Rng + ?Sized>(
    position: Position,
    hosts: &[HostPlant],
    metric: DistanceMetric,
    rng: &mut R,
) -> Option<Position> {
    let host = nearest_host(position, hosts, metric)?;
    let fraction = rng.gen::<f64>();
    let dx = host.position.x - position.x;
    let dy = host.position.y - position.y;
    Some(position.add(fraction * dx, fraction * dy))
}

/// Nearest host under `metric`; ties go to the earlier host
pub fn nearest_host(
    position: Position,
    hosts: &[HostPlant],
    metric: DistanceMetric,
) -> Option<&HostPlant> {
    let mut best: Option<(&HostPlant, f64)> = None;
    for host in hosts {
        let d = projection::distance(metric, &position, &host.position);
        match best {
            Some((_, best_d)) if !(d < best_d) => {}
            _ => best = Some((host, d)),
        }
    }
    best.map(|(host, _)| host)
}
