//! Immutable per-day views of the population for visualization.

use crate::population::Population;
use lanternfly_core::{Color, LifeStage, Position, Result, StageCensus};
use serde::{Deserialize, Serialize};

/// What a renderer needs to draw one agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    pub position: Position,
    pub stage: LifeStage,
    pub alive: bool,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationSnapshot {
    pub year: u32,
    /// 0 for the initial state, then 1..=days_per_year
    pub day: u32,
    pub width: f64,
    pub height: f64,
    pub census: StageCensus,
    pub agents: Vec<AgentView>,
}

impl PopulationSnapshot {
    pub fn capture(population: &Population, year: u32, day: u32) -> Self {
        let agents = population
            .agents()
            .iter()
            .map(|agent| AgentView {
                position: agent.position,
                stage: agent.stage,
                alive: agent.alive,
                color: agent.color,
            })
            .collect();

        Self {
            year,
            day,
            width: population.width(),
            height: population.height(),
            census: population.census(),
            agents,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|agent| agent.alive).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use lanternfly_core::Bounds;

    fn population() -> Population {
        let mut agents = vec![
            Agent::egg(Position::new(1.0, 1.0)),
            Agent::new(Position::new(2.0, 5.0), LifeStage::Adult, 700.0),
        ];
        agents[1].kill();
        Population::new(agents, Vec::new(), Bounds::new(0.0, 0.0, 8.0, 6.0))
    }

    #[test]
    fn test_capture() {
        let snapshot = PopulationSnapshot::capture(&population(), 2, 17);
        assert_eq!((snapshot.year, snapshot.day), (2, 17));
        assert_eq!((snapshot.width, snapshot.height), (8.0, 6.0));
        assert_eq!(snapshot.agents.len(), 2);
        assert_eq!(snapshot.alive_count(), 1);
        assert_eq!(snapshot.agents[1].color, Color::for_stage(LifeStage::Dead));
        assert_eq!(snapshot.census.count(LifeStage::Egg), 1);
    }

    #[test]
    fn test_bincode_encoding() {
        let snapshot = PopulationSnapshot::capture(&population(), 0, 0);
        let bytes = snapshot.to_bytes().unwrap();
        let restored = PopulationSnapshot::from_bytes(&bytes).unwrap();
        assert_eq!(restored, snapshot);

        assert!(PopulationSnapshot::from_bytes(&bytes[..3]).is_err());
    }
}
