//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a temperature grid cell. Ids are assigned sequentially from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(pub u32);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell-{}", self.0)
    }
}

/// 2D position in the world (longitude/latitude or a projected equivalent)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Euclidean distance to another position
    pub fn distance(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Life stage of an individual. The ordering follows development.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LifeStage {
    Egg,
    Instar1,
    Instar2,
    Instar3,
    Instar4,
    Adult,
    Dead,
}

impl LifeStage {
    pub const COUNT: usize = 7;

    pub fn all() -> [LifeStage; Self::COUNT] {
        [
            LifeStage::Egg,
            LifeStage::Instar1,
            LifeStage::Instar2,
            LifeStage::Instar3,
            LifeStage::Instar4,
            LifeStage::Adult,
            LifeStage::Dead,
        ]
    }

    /// Position of the stage in development order (Egg = 0, Dead = 6)
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn is_nymph(&self) -> bool {
        matches!(
            self,
            LifeStage::Instar1 | LifeStage::Instar2 | LifeStage::Instar3 | LifeStage::Instar4
        )
    }

    pub fn is_terminal(&self) -> bool {
        *self == LifeStage::Dead
    }
}

impl fmt::Display for LifeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifeStage::Egg => "egg",
            LifeStage::Instar1 => "instar1",
            LifeStage::Instar2 => "instar2",
            LifeStage::Instar3 => "instar3",
            LifeStage::Instar4 => "instar4",
            LifeStage::Adult => "adult",
            LifeStage::Dead => "dead",
        };
        f.write_str(name)
    }
}

/// RGB display colour, consumed by the visualization layer only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub fn for_stage(stage: LifeStage) -> Self {
        match stage {
            LifeStage::Egg => Color::rgb(255, 0, 0),
            LifeStage::Instar1 => Color::rgb(255, 165, 0),
            LifeStage::Instar2 => Color::rgb(255, 255, 0),
            LifeStage::Instar3 => Color::rgb(255, 255, 255),
            LifeStage::Instar4 => Color::rgb(0, 0, 255),
            LifeStage::Adult => Color::rgb(128, 0, 128),
            LifeStage::Dead => Color::rgb(0, 0, 0),
        }
    }
}

/// Unit a temperature source reports in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

/// Daily (max, min) temperature pair for a region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub max: f64,
    pub min: f64,
}

impl TemperatureRange {
    pub fn new(max: f64, min: f64) -> Self {
        Self { max, min }
    }

    pub fn mean(&self) -> f64 {
        (self.max + self.min) / 2.0
    }

    /// Convert to Celsius from the given unit
    pub fn to_celsius(&self, unit: TemperatureUnit) -> Self {
        match unit {
            TemperatureUnit::Celsius => *self,
            TemperatureUnit::Fahrenheit => Self {
                max: fahrenheit_to_celsius(self.max),
                min: fahrenheit_to_celsius(self.min),
            },
        }
    }
}

/// A host-plant location. Immutable for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HostPlant {
    pub position: Position,
}

impl HostPlant {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: Position::new(x, y),
        }
    }
}

/// Axis-aligned bounding rectangle of the modelled region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Closed containment test
    pub fn contains(&self, pos: &Position) -> bool {
        pos.x >= self.min_x && pos.x <= self.max_x && pos.y >= self.min_y && pos.y <= self.max_y
    }
}
