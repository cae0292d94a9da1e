//! Property tests for the grid, the development model and the driver

use lanternfly_core::{
    Bounds, DevelopmentConfig, FecundityConfig, HostPlant, LifeStage, MovementConfig, Position,
    SimulationConfig,
};
use lanternfly_world::fecundity::oviposition_probability;
use lanternfly_world::movement::directed_step;
use lanternfly_world::{advance_stage, degree_day, Agent, Population, Simulation, TemperatureGrid};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn any_stage() -> impl Strategy<Value = LifeStage> {
    prop::sample::select(LifeStage::all().to_vec())
}

proptest! {
    #[test]
    fn degree_day_is_never_negative(stage in any_stage(), temperature in -60.0f64..60.0) {
        let config = DevelopmentConfig::default();
        prop_assert!(degree_day(stage, temperature, &config) >= 0.0);
    }

    #[test]
    fn stages_never_regress(
        stage in any_stage(),
        energy in 0.0f64..1200.0,
        extra in 0.0f64..400.0,
    ) {
        let config = DevelopmentConfig::default();
        let now = advance_stage(stage, energy, &config);
        prop_assert!(now >= stage);
        prop_assert!(advance_stage(now, energy + extra, &config) >= now);
        prop_assert!(advance_stage(stage, energy + extra, &config) >= now);
    }

    #[test]
    fn cell_lookup_matches_lowest_containing_cell(
        min_x in -200.0f64..200.0,
        min_y in -90.0f64..90.0,
        width in 0.5f64..100.0,
        height in 0.5f64..100.0,
        divisions in 1u32..8,
        fx in -0.2f64..1.2,
        fy in -0.2f64..1.2,
    ) {
        let bounds = Bounds::new(min_x, min_y, min_x + width, min_y + height);
        let grid = TemperatureGrid::uniform(bounds, divisions, 20.0).unwrap();
        let pos = Position::new(min_x + fx * width, min_y + fy * height);

        let expected = grid.cells().iter().find(|cell| cell.contains(pos)).map(|cell| cell.id);
        prop_assert_eq!(grid.cell_of(pos), expected);
    }

    #[test]
    fn square_grid_covers_its_interior(
        side in 1.0f64..50.0,
        divisions in 1u32..8,
        fx in 0.0f64..0.999,
        fy in 0.0f64..0.999,
    ) {
        let bounds = Bounds::new(0.0, 0.0, side, side);
        let grid = TemperatureGrid::uniform(bounds, divisions, 20.0).unwrap();
        let pos = Position::new(fx * side, fy * side);
        let id = grid.cell_of(pos);
        prop_assert!(id.is_some());
        prop_assert_eq!(grid.temperature_of(id), 20.0);
    }

    #[test]
    fn outside_the_box_has_no_cell(offset in 0.001f64..1000.0, divisions in 1u32..8) {
        let bounds = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let grid = TemperatureGrid::uniform(bounds, divisions, 20.0).unwrap();
        for pos in [
            Position::new(-offset, 5.0),
            Position::new(10.0 + offset, 5.0),
            Position::new(5.0, -offset),
            Position::new(5.0, 10.0 + offset),
        ] {
            prop_assert_eq!(grid.cell_of(pos), None);
            prop_assert_eq!(grid.temperature_of(grid.cell_of(pos)), 0.0);
        }
    }

    #[test]
    fn far_finite_positions_have_no_cell(
        magnitude in 1e15f64..1e300,
        negative in any::<bool>(),
        along_x in any::<bool>(),
        divisions in 1u32..8,
    ) {
        let bounds = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let grid = TemperatureGrid::uniform(bounds, divisions, 20.0).unwrap();
        let far = if negative { -magnitude } else { magnitude };
        let pos = if along_x { Position::new(far, 5.0) } else { Position::new(5.0, far) };
        prop_assert_eq!(grid.cell_of(pos), None);
    }

    #[test]
    fn oviposition_probability_is_bounded_and_monotone(a in 0.0f64..1500.0, b in 0.0f64..1500.0) {
        let config = FecundityConfig::default();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let p_low = oviposition_probability(low, &config);
        let p_high = oviposition_probability(high, &config);
        prop_assert!((0.0..=1.0).contains(&p_low));
        prop_assert!(p_low <= p_high);
    }

    #[test]
    fn directed_step_lands_between_start_and_host(
        x in -50.0f64..50.0,
        y in -50.0f64..50.0,
        hx in -50.0f64..50.0,
        hy in -50.0f64..50.0,
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let start = Position::new(x, y);
        let host = HostPlant::new(hx, hy);
        let metric = MovementConfig::default().distance_metric;

        let next = directed_step(start, &[host], metric, &mut rng).unwrap();
        let total = start.distance(&host.position);
        prop_assert!(start.distance(&next) <= total + 1e-9);
        prop_assert!(next.distance(&host.position) <= total + 1e-9);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn fixed_seed_and_workers_are_deterministic(seed in any::<u64>(), workers in 1usize..4) {
        let run = || {
            let bounds = Bounds::new(0.0, 0.0, 20.0, 20.0);
            let mut config = SimulationConfig {
                seed,
                workers,
                ..Default::default()
            };
            config.grid.bounds = bounds;
            config.grid.divisions = 1;
            config.grid.region_table = vec!["all".to_string()];
            config.season.days_per_year = 30;

            let grid = TemperatureGrid::uniform(bounds, 1, 28.0).unwrap();
            let agents = (0..40)
                .map(|i| Agent::new(Position::new(10.0, i as f64 / 2.0), LifeStage::Egg, 45.0))
                .collect();
            let population = Population::new(agents, vec![HostPlant::new(3.0, 3.0)], bounds);
            let mut sim = Simulation::new(config, grid, population).unwrap();
            sim.simulate(1).snapshots
        };

        prop_assert_eq!(run(), run());
    }
}
