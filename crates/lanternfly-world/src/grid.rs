//! Temperature grid over the modelled region.
//!
//! The bounding box is split into `divisions x divisions` square cells laid out
//! in row-major order. Row 0 is the northernmost row and ids start at 1 on its
//! western end, which is the order of the reference region table. Cell width is
//! derived from the box width; rows are stacked by the box height, so cells
//! only tile the box exactly when the box is square in its own units.

use lanternfly_core::{
    Bounds, CellId, Error, GridConfig, Position, Result, TemperatureRange, TemperatureReading,
    TemperatureUnit,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Supplies a (max, min) temperature pair per region label
pub trait TemperatureSource {
    fn reading(&self, region: &str) -> Option<TemperatureRange>;
}

impl<S: BuildHasher> TemperatureSource for HashMap<String, TemperatureRange, S> {
    fn reading(&self, region: &str) -> Option<TemperatureRange> {
        self.get(region).copied()
    }
}

/// One grid cell (quadrant)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub id: CellId,
    /// Bottom-left corner
    pub x: f64,
    pub y: f64,
    pub width: f64,
    /// Celsius temperature used for degree-day accumulation
    pub temperature: f64,
    /// Celsius daily range reported for the cell's region
    pub range: TemperatureRange,
    pub region: String,
}

impl Cell {
    /// Half-open containment: `[x, x + width) x [y, y + width)`
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x
            && pos.x < self.x + self.width
            && pos.y >= self.y
            && pos.y < self.y + self.width
    }
}

/// Immutable grid of temperature cells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureGrid {
    bounds: Bounds,
    divisions: u32,
    cell_width: f64,
    row_step: f64,
    cells: Vec<Cell>,
}

impl TemperatureGrid {
    /// Build the grid from configuration and a per-region temperature source
    pub fn new(config: &GridConfig, source: &impl TemperatureSource) -> Result<Self> {
        config.validate()?;

        let mut regions = Vec::with_capacity(config.cell_count());
        for label in &config.region_table {
            let raw = source
                .reading(label)
                .ok_or_else(|| Error::MissingRegion(label.clone()))?;
            let range = raw.to_celsius(config.source_unit);
            regions.push((label.clone(), range));
        }

        Ok(Self::build(config.bounds, config.divisions, regions, config.reading))
    }

    /// A grid where every cell has the same Celsius temperature
    pub fn uniform(bounds: Bounds, divisions: u32, temperature: f64) -> Result<Self> {
        let config = GridConfig {
            bounds,
            divisions,
            region_table: (1..=divisions * divisions)
                .map(|i| format!("region-{}", i))
                .collect(),
            source_unit: TemperatureUnit::Celsius,
            reading: TemperatureReading::Max,
        };
        let source: HashMap<String, TemperatureRange> = config
            .region_table
            .iter()
            .map(|label| (label.clone(), TemperatureRange::new(temperature, temperature)))
            .collect();
        Self::new(&config, &source)
    }

    fn build(
        bounds: Bounds,
        divisions: u32,
        regions: Vec<(String, TemperatureRange)>,
        reading: TemperatureReading,
    ) -> Self {
        let n = divisions as usize;
        let cell_width = bounds.width() / divisions as f64;
        let row_step = bounds.height() / divisions as f64;

        let cells = regions
            .into_iter()
            .enumerate()
            .map(|(index, (region, range))| {
                let row = index / n;
                let col = index % n;
                let temperature = match reading {
                    TemperatureReading::Max => range.max,
                    TemperatureReading::Min => range.min,
                    TemperatureReading::Mean => range.mean(),
                };
                Cell {
                    id: CellId(index as u32 + 1),
                    x: bounds.min_x + col as f64 * cell_width,
                    y: bounds.min_y + (n - 1 - row) as f64 * row_step,
                    width: cell_width,
                    temperature,
                    range,
                    region,
                }
            })
            .collect();

        Self {
            bounds,
            divisions,
            cell_width,
            row_step,
            cells,
        }
    }

    /// The cell containing `pos`, or `None` when the position lies outside
    /// every cell. Overlapping cells resolve to the lowest id.
    pub fn cell_of(&self, pos: Position) -> Option<CellId> {
        if !pos.is_finite() {
            return None;
        }

        let n = self.divisions as i64;
        let fx = (pos.x - self.bounds.min_x) / self.cell_width;
        // the casts below saturate, so far-off columns must be rejected first
        if !(fx > -1.0 && fx < n as f64 + 1.0) {
            return None;
        }
        let col = fx.floor() as i64;
        // neighbouring columns are checked too so rounding at an edge cannot
        // skip the cell that actually contains the point
        let first_col = (col - 1).max(0);
        let last_col = (col + 1).min(n - 1);
        if first_col > last_col {
            return None;
        }

        for row in 0..n {
            for c in first_col..=last_col {
                let cell = &self.cells[(row * n + c) as usize];
                if cell.contains(pos) {
                    return Some(cell.id);
                }
            }
        }
        None
    }

    /// Temperature of a cell. Positions outside the grid read as 0.0.
    pub fn temperature_of(&self, id: Option<CellId>) -> f64 {
        id.and_then(|id| self.cell(id))
            .map(|cell| cell.temperature)
            .unwrap_or(0.0)
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        (id.0 as usize)
            .checked_sub(1)
            .and_then(|index| self.cells.get(index))
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn divisions(&self) -> u32 {
        self.divisions
    }

    pub fn cell_width(&self) -> f64 {
        self.cell_width
    }

    pub fn row_step(&self) -> f64 {
        self.row_step
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanternfly_core::{REFERENCE_MAX_LAT, REFERENCE_MIN_LON};

    fn square_grid() -> TemperatureGrid {
        let config = GridConfig {
            bounds: Bounds::new(0.0, 0.0, 10.0, 10.0),
            divisions: 2,
            region_table: vec!["NW".into(), "NE".into(), "SW".into(), "SE".into()],
            source_unit: TemperatureUnit::Celsius,
            reading: TemperatureReading::Max,
        };
        let source: HashMap<String, TemperatureRange> = [
            ("NW", 10.0),
            ("NE", 20.0),
            ("SW", 30.0),
            ("SE", 40.0),
        ]
        .into_iter()
        .map(|(label, max)| (label.to_string(), TemperatureRange::new(max, max - 10.0)))
        .collect();
        TemperatureGrid::new(&config, &source).unwrap()
    }

    #[test]
    fn test_grid_creation() {
        let grid = square_grid();
        assert_eq!(grid.len(), 4);
        assert_eq!(grid.cell_width(), 5.0);

        let ids: Vec<u32> = grid.cells().iter().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);

        // Row 0 is the northern row
        let nw = grid.cell(CellId(1)).unwrap();
        assert_eq!((nw.x, nw.y), (0.0, 5.0));
        let se = grid.cell(CellId(4)).unwrap();
        assert_eq!((se.x, se.y), (5.0, 0.0));
    }

    #[test]
    fn test_cell_lookup() {
        let grid = square_grid();
        assert_eq!(grid.cell_of(Position::new(1.0, 9.0)), Some(CellId(1)));
        assert_eq!(grid.cell_of(Position::new(9.0, 9.0)), Some(CellId(2)));
        assert_eq!(grid.cell_of(Position::new(1.0, 1.0)), Some(CellId(3)));
        assert_eq!(grid.cell_of(Position::new(9.0, 1.0)), Some(CellId(4)));

        // Lower/left edges are inclusive
        assert_eq!(grid.cell_of(Position::new(5.0, 5.0)), Some(CellId(2)));
        assert_eq!(grid.cell_of(Position::new(0.0, 0.0)), Some(CellId(3)));
    }

    #[test]
    fn test_outside_grid_is_none() {
        let grid = square_grid();
        assert_eq!(grid.cell_of(Position::new(-0.1, 5.0)), None);
        assert_eq!(grid.cell_of(Position::new(10.0, 5.0)), None);
        assert_eq!(grid.cell_of(Position::new(5.0, 10.0)), None);
        assert_eq!(grid.cell_of(Position::new(500.0, -500.0)), None);
        assert_eq!(grid.cell_of(Position::new(f64::NAN, 1.0)), None);
    }

    #[test]
    fn test_far_positions_have_no_cell() {
        let grid = square_grid();
        for pos in [
            Position::new(1e300, 5.0),
            Position::new(-1e300, 5.0),
            Position::new(5.0, 1e300),
            Position::new(5.0, -1e300),
            Position::new(f64::MAX, f64::MIN),
        ] {
            assert_eq!(grid.cell_of(pos), None);
            assert_eq!(grid.temperature_of(grid.cell_of(pos)), 0.0);
        }
    }

    #[test]
    fn test_temperature_lookup() {
        let grid = square_grid();
        assert_eq!(grid.temperature_of(Some(CellId(1))), 10.0);
        assert_eq!(grid.temperature_of(Some(CellId(4))), 40.0);
        assert_eq!(grid.temperature_of(None), 0.0);
        assert_eq!(grid.temperature_of(Some(CellId(0))), 0.0);
        assert_eq!(grid.temperature_of(Some(CellId(99))), 0.0);

        let cell = grid.cell(CellId(2)).unwrap();
        assert_eq!(cell.region, "NE");
        assert_eq!(cell.range.min, 10.0);
    }

    #[test]
    fn test_reference_grid_converts_fahrenheit() {
        let config = GridConfig::default();
        let source: HashMap<String, TemperatureRange> = config
            .region_table
            .iter()
            .map(|label| (label.clone(), TemperatureRange::new(86.0, 50.0)))
            .collect();
        let grid = TemperatureGrid::new(&config, &source).unwrap();

        assert_eq!(grid.len(), 25);
        assert!((grid.temperature_of(Some(CellId(13))) - 30.0).abs() < 1e-9);

        let north_west = Position::new(REFERENCE_MIN_LON + 0.1, REFERENCE_MAX_LAT - 0.1);
        let id = grid.cell_of(north_west).unwrap();
        assert_eq!(grid.cell(id).unwrap().region, "OR");
    }

    #[test]
    fn test_mean_reading() {
        let mut config = GridConfig::default();
        config.reading = TemperatureReading::Mean;
        config.source_unit = TemperatureUnit::Celsius;
        let source: HashMap<String, TemperatureRange> = config
            .region_table
            .iter()
            .map(|label| (label.clone(), TemperatureRange::new(30.0, 10.0)))
            .collect();
        let grid = TemperatureGrid::new(&config, &source).unwrap();
        assert_eq!(grid.cells()[0].temperature, 20.0);
    }

    #[test]
    fn test_missing_region_fails() {
        let config = GridConfig::default();
        let source: HashMap<String, TemperatureRange> = HashMap::new();
        let result = TemperatureGrid::new(&config, &source);
        assert!(matches!(result, Err(Error::MissingRegion(label)) if label == "OR"));
    }

    #[test]
    fn test_invalid_dimensions_fail() {
        assert!(TemperatureGrid::uniform(Bounds::new(0.0, 0.0, -1.0, 1.0), 5, 20.0).is_err());
        assert!(TemperatureGrid::uniform(Bounds::new(0.0, 0.0, 1.0, 1.0), 0, 20.0).is_err());
    }

    #[test]
    fn test_uniform_grid() {
        let grid = TemperatureGrid::uniform(Bounds::new(0.0, 0.0, 3.0, 3.0), 3, 18.5).unwrap();
        assert_eq!(grid.len(), 9);
        assert!(grid.cells().iter().all(|c| c.temperature == 18.5));
        assert_eq!(grid.cell_of(Position::new(2.5, 0.5)), Some(CellId(9)));
    }
}
