//! Individual insect state.

use lanternfly_core::{CellId, Color, LifeStage, Position};
use serde::{Deserialize, Serialize};

/// One insect in the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub position: Position,
    pub stage: LifeStage,
    /// Accumulated degree-days
    pub energy: f64,
    pub alive: bool,
    /// Cell found by the most recent grid lookup
    pub cell: Option<CellId>,
    pub color: Color,
    /// Laying events so far
    pub clutches: u32,
}

impl Agent {
    pub fn new(position: Position, stage: LifeStage, energy: f64) -> Self {
        let alive = stage != LifeStage::Dead;
        Self {
            position,
            stage,
            energy,
            alive,
            cell: None,
            color: Color::for_stage(stage),
            clutches: 0,
        }
    }

    /// A freshly laid egg
    pub fn egg(position: Position) -> Self {
        Self::new(position, LifeStage::Egg, 0.0)
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Move to `stage` if it is later in development. Returns true when the
    /// stage changed. Dead agents never change.
    pub fn advance_to(&mut self, stage: LifeStage) -> bool {
        if !self.alive || stage <= self.stage {
            return false;
        }
        if stage.is_terminal() {
            self.kill();
        } else {
            self.stage = stage;
            self.color = Color::for_stage(stage);
        }
        true
    }

    pub fn kill(&mut self) {
        self.alive = false;
        self.stage = LifeStage::Dead;
        self.color = Color::for_stage(LifeStage::Dead);
    }

    pub fn accumulate(&mut self, degree_days: f64) {
        if self.alive {
            self.energy += degree_days.max(0.0);
        }
    }

    /// Clear the thermal budget at a year boundary
    pub fn begin_year(&mut self) {
        self.energy = 0.0;
    }
}
