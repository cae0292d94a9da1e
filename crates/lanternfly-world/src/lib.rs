//! Lanternfly spread simulation engine.
//!
//! A temperature grid drives degree-day development of individual insects
//! which die, disperse and lay eggs; a day-stepped driver advances the whole
//! population in parallel slices.

pub mod agent;
pub mod fecundity;
pub mod grid;
pub mod lifecycle;
pub mod mortality;
pub mod movement;
pub mod population;
pub mod projection;
pub mod scenario;
pub mod simulation;
pub mod snapshot;

pub use agent::Agent;
pub use grid::{Cell, TemperatureGrid, TemperatureSource};
pub use lifecycle::{advance_stage, degree_day};
pub use movement::{MovementKind, Step};
pub use population::Population;
pub use scenario::Scenario;
pub use simulation::{simulate, DayReport, Simulation, SimulationResult, YearReport};
pub use snapshot::{AgentView, PopulationSnapshot};
