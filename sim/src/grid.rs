//! Territory grid - dense row-major storage of cells over a square world.
//!
//! Grid coordinates are integer pairs; `(0, 0)` is the cell whose minimum
//! corner sits on the world origin. Cells outside the playfield shape do not
//! exist and are stored as `None`, so every lookup is bounds- and
//! existence-checked and returns `None` for "no cell".

use crate::cell::{DamageOutcome, TerritoryCell};
use crate::components::{Owner, Position, TurretId};
use crate::config::SimConfig;
use crate::error::SimError;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Integer cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: usize,
    pub y: usize,
}

impl GridCoord {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Which cells of the square grid exist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Playfield {
    /// Every cell exists.
    Full,
    /// Cells whose centre lies within `radius` of the world centre.
    Circle { radius: f32 },
}

/// Dimensions of the grid and the mapping between grid and world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    /// Width of the grid in cells.
    pub width: usize,
    /// Height of the grid in cells.
    pub height: usize,
    /// Size of each cell in world units.
    pub cell_size: f32,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self { width: 0, height: 0, cell_size: 1.0 }
    }
}

impl GridGeometry {
    pub fn new(width: usize, height: usize, cell_size: f32) -> Self {
        Self { width, height, cell_size }
    }

    /// Geometry covering a square world of side `world_size`.
    pub fn square(world_size: f32, cell_size: f32) -> Self {
        let n = (world_size / cell_size).floor() as usize;
        Self::new(n, n, cell_size)
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// World-space extent covered by the grid.
    pub fn world_extent(&self) -> (f32, f32) {
        (self.width as f32 * self.cell_size, self.height as f32 * self.cell_size)
    }

    /// Row-major index of a coordinate, `None` if out of range.
    #[inline]
    pub fn index(&self, coord: GridCoord) -> Option<usize> {
        if coord.x < self.width && coord.y < self.height {
            Some(coord.y * self.width + coord.x)
        } else {
            None
        }
    }

    /// Coordinate from possibly negative integers.
    #[inline]
    pub fn coord(&self, x: i64, y: i64) -> Option<GridCoord> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            None
        } else {
            Some(GridCoord::new(x as usize, y as usize))
        }
    }

    /// Cell containing a world position.
    pub fn world_to_grid(&self, world_x: f32, world_y: f32) -> Option<GridCoord> {
        let gx = (world_x / self.cell_size).floor();
        let gy = (world_y / self.cell_size).floor();
        if !gx.is_finite() || !gy.is_finite() {
            return None;
        }
        self.coord(gx as i64, gy as i64)
    }

    /// World position of a cell's centre.
    pub fn cell_center(&self, coord: GridCoord) -> Position {
        Position::new(
            (coord.x as f32 + 0.5) * self.cell_size,
            (coord.y as f32 + 0.5) * self.cell_size,
        )
    }

    /// World-space minimum corner of a cell.
    pub fn cell_min(&self, coord: GridCoord) -> Position {
        Position::new(coord.x as f32 * self.cell_size, coord.y as f32 * self.cell_size)
    }
}

/// The territory grid resource.
#[derive(Resource, Debug, Clone)]
pub struct TerritoryGrid {
    geometry: GridGeometry,
    max_durability: f32,
    /// Grid cells (row-major order), `None` where no cell exists.
    cells: Vec<Option<TerritoryCell>>,
    existing: usize,
    /// Bumped on every observable cell change.
    revision: u64,
}

impl TerritoryGrid {
    /// Build a grid whose existing cells are selected by `playfield`, centred
    /// on the middle of the grid.
    pub fn new(geometry: GridGeometry, playfield: Playfield, max_durability: f32) -> Self {
        let (extent_x, extent_y) = geometry.world_extent();
        let centre = Position::new(extent_x / 2.0, extent_y / 2.0);
        Self::with_centre(geometry, playfield, centre, max_durability)
    }

    /// Build a grid whose circular playfield is centred on `centre`.
    pub fn with_centre(
        geometry: GridGeometry,
        playfield: Playfield,
        centre: Position,
        max_durability: f32,
    ) -> Self {
        let mut cells = Vec::with_capacity(geometry.cell_count());
        for y in 0..geometry.height {
            for x in 0..geometry.width {
                let exists = match playfield {
                    Playfield::Full => true,
                    Playfield::Circle { radius } => {
                        geometry.cell_center(GridCoord::new(x, y)).distance_to(&centre) <= radius
                    }
                };
                cells.push(exists.then(|| TerritoryCell::neutral(max_durability)));
            }
        }
        let existing = cells.iter().filter(|c| c.is_some()).count();

        Self { geometry, max_durability, cells, existing, revision: 0 }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::with_centre(
            GridGeometry::square(config.world_size, config.cell_size),
            config.playfield,
            config.world_centre(),
            config.max_durability,
        )
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn width(&self) -> usize {
        self.geometry.width
    }

    pub fn height(&self) -> usize {
        self.geometry.height
    }

    pub fn cell_size(&self) -> f32 {
        self.geometry.cell_size
    }

    pub fn max_durability(&self) -> f32 {
        self.max_durability
    }

    /// Number of existing cells.
    pub fn existing_cells(&self) -> usize {
        self.existing
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Raw row-major storage.
    pub fn cells(&self) -> &[Option<TerritoryCell>] {
        &self.cells
    }

    /// Get a cell by grid coordinates.
    pub fn get(&self, coord: GridCoord) -> Option<&TerritoryCell> {
        self.geometry.index(coord).and_then(|i| self.cells[i].as_ref())
    }

    /// Get a cell by possibly negative integer coordinates.
    pub fn get_xy(&self, x: i64, y: i64) -> Option<&TerritoryCell> {
        self.geometry.coord(x, y).and_then(|c| self.get(c))
    }

    pub fn exists(&self, coord: GridCoord) -> bool {
        self.get(coord).is_some()
    }

    pub fn owner_at(&self, coord: GridCoord) -> Option<Owner> {
        self.get(coord).map(|c| c.owner)
    }

    /// Cell containing a world position.
    pub fn cell_at_world(&self, world_x: f32, world_y: f32) -> Option<(GridCoord, &TerritoryCell)> {
        let coord = self.geometry.world_to_grid(world_x, world_y)?;
        self.get(coord).map(|cell| (coord, cell))
    }

    /// Iterate existing cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, &TerritoryCell)> + '_ {
        let width = self.geometry.width;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.as_ref().map(|c| (GridCoord::new(i % width, i / width), c))
        })
    }

    /// Apply projectile damage to a cell. `None` if no cell exists there.
    pub fn apply_damage(
        &mut self,
        coord: GridCoord,
        damage: f32,
        attacker: TurretId,
        now: f64,
    ) -> Option<DamageOutcome> {
        let index = self.geometry.index(coord)?;
        let max_durability = self.max_durability;
        let outcome = self.cells[index]
            .as_mut()?
            .take_damage(damage, attacker, now, max_durability);
        if outcome.changed_cell() {
            self.revision += 1;
        }
        Some(outcome)
    }

    /// Set a cell's owner directly (scenario setup, editors).
    pub fn assign(&mut self, coord: GridCoord, owner: Owner) -> Result<(), SimError> {
        let max_durability = self.max_durability;
        let cell = self
            .geometry
            .index(coord)
            .and_then(|i| self.cells[i].as_mut())
            .ok_or(SimError::NoCell { x: coord.x as i64, y: coord.y as i64 })?;
        cell.assign(owner, max_durability);
        self.revision += 1;
        Ok(())
    }
}
