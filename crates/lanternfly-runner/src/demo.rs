//! Built-in demo scenario over the reference grid.

use lanternfly_core::{HostPlant, Position, SimulationConfig, TemperatureRange};
use lanternfly_world::Scenario;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

/// Typical midsummer daily (max, min) in Fahrenheit per reference region
const SUMMER_READINGS: [(&str, f64, f64); 25] = [
    ("OR", 82.0, 54.0),
    ("CT", 84.0, 63.0),
    ("VT", 80.0, 58.0),
    ("MA", 82.0, 63.0),
    ("ME", 78.0, 56.0),
    ("NJ", 86.0, 66.0),
    ("NY", 84.0, 64.0),
    ("PA", 85.0, 63.0),
    ("MD", 88.0, 67.0),
    ("DE", 87.0, 66.0),
    ("WV", 84.0, 61.0),
    ("VA", 88.0, 67.0),
    ("NC", 89.0, 69.0),
    ("DC", 89.0, 71.0),
    ("SC", 92.0, 71.0),
    ("NM", 91.0, 62.0),
    ("MO", 89.0, 68.0),
    ("IN", 85.0, 64.0),
    ("OH", 84.0, 63.0),
    ("MI", 82.0, 60.0),
    ("AZ", 104.0, 79.0),
    ("UT", 92.0, 63.0),
    ("KY", 87.0, 66.0),
    ("RI", 82.0, 64.0),
    ("KS", 92.0, 68.0),
];

/// First established population, south-eastern Pennsylvania (lon, lat)
const INTRODUCTION_SITE: (f64, f64) = (-75.6, 40.3);
const OCCURRENCE_RECORDS: usize = 2000;
const HOST_PLANTS: usize = 300;

/// Occurrence records clustered around the introduction site and host
/// plants scattered over the eastern states, drawn from `config.seed`
pub fn scenario(config: SimulationConfig) -> Scenario {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let temperatures: HashMap<String, TemperatureRange> = SUMMER_READINGS
        .iter()
        .map(|&(label, max, min)| (label.to_string(), TemperatureRange::new(max, min)))
        .collect();

    let (lon, lat) = INTRODUCTION_SITE;
    let occurrences = (0..OCCURRENCE_RECORDS)
        .map(|_| Position::new(lon + rng.gen_range(-1.5..1.5), lat + rng.gen_range(-1.0..1.0)))
        .collect();

    let hosts = (0..HOST_PLANTS)
        .map(|_| HostPlant::new(rng.gen_range(-90.0..-70.0), rng.gen_range(35.0..45.0)))
        .collect();

    Scenario {
        config,
        temperatures,
        hosts,
        occurrences,
    }
}
