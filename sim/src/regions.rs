//! Greedy maximal-rectangle decomposition of the territory grid.
//!
//! Scanning row-major, every unclaimed existing cell starts a region that is
//! first grown right along its row, then grown down one full row at a time
//! while every cell of the next row matches. The result partitions all
//! existing cells into same-owner rectangles, which the broad phase tests
//! instead of individual cells.
//!
//! The merged set is rebuilt at most once per tick, only when captures have
//! marked it dirty.

use crate::cell::TerritoryCell;
use crate::components::{Owner, Position};
use crate::grid::{GridCoord, TerritoryGrid};
use crate::spatial::RegionIndex;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An axis-aligned rectangle of cells sharing one owner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MergedRegion {
    pub owner: Owner,
    pub start_x: usize,
    pub start_y: usize,
    pub width: usize,
    pub height: usize,
    pub world_min: Position,
    pub world_max: Position,
}

impl MergedRegion {
    pub fn new(owner: Owner, start_x: usize, start_y: usize, width: usize, height: usize, cell_size: f32) -> Self {
        Self {
            owner,
            start_x,
            start_y,
            width,
            height,
            world_min: Position::new(start_x as f32 * cell_size, start_y as f32 * cell_size),
            world_max: Position::new(
                (start_x + width) as f32 * cell_size,
                (start_y + height) as f32 * cell_size,
            ),
        }
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn contains_cell(&self, coord: GridCoord) -> bool {
        coord.x >= self.start_x
            && coord.x < self.start_x + self.width
            && coord.y >= self.start_y
            && coord.y < self.start_y + self.height
    }

    /// Iterate the cells covered by the region, row-major.
    pub fn cells(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (self.start_y..self.start_y + self.height)
            .flat_map(move |y| (self.start_x..self.start_x + self.width).map(move |x| GridCoord::new(x, y)))
    }

    /// Whether a circle touches the region's world-space box. Tangency counts.
    pub fn intersects_circle(&self, x: f32, y: f32, radius: f32) -> bool {
        let nearest_x = x.clamp(self.world_min.x, self.world_max.x);
        let nearest_y = y.clamp(self.world_min.y, self.world_max.y);
        let dx = x - nearest_x;
        let dy = y - nearest_y;
        dx * dx + dy * dy <= radius * radius
    }
}

/// Reusable scratch state for rebuilding merged regions.
#[derive(Debug, Default)]
pub struct RegionMerger {
    claimed: Vec<bool>,
}

impl RegionMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decompose `grid` into merged regions, appended to `out` in emission order.
    pub fn merge_into(&mut self, grid: &TerritoryGrid, out: &mut Vec<MergedRegion>) {
        let width = grid.width();
        let height = grid.height();
        let cell_size = grid.cell_size();
        let cells = grid.cells();

        self.claimed.clear();
        self.claimed.resize(width * height, false);
        let claimed = &mut self.claimed;

        for y in 0..height {
            let row = y * width;
            let mut x = 0;
            while x < width {
                let start = row + x;
                let owner = match cells[start].as_ref() {
                    Some(cell) if !claimed[start] => cell.owner,
                    _ => {
                        x += 1;
                        continue;
                    }
                };

                let mut region_width = 1;
                while x + region_width < width && is_open(cells, claimed, start + region_width, owner) {
                    region_width += 1;
                }

                let mut region_height = 1;
                'grow: while y + region_height < height {
                    let next_row = start + region_height * width;
                    for dx in 0..region_width {
                        if !is_open(cells, claimed, next_row + dx, owner) {
                            break 'grow;
                        }
                    }
                    region_height += 1;
                }

                for dy in 0..region_height {
                    let base = start + dy * width;
                    claimed[base..base + region_width].fill(true);
                }

                out.push(MergedRegion::new(owner, x, y, region_width, region_height, cell_size));
                x += region_width;
            }
        }
    }

    /// Decompose `grid` into a fresh vector of merged regions.
    pub fn merge(&mut self, grid: &TerritoryGrid) -> Vec<MergedRegion> {
        let mut out = Vec::new();
        self.merge_into(grid, &mut out);
        out
    }
}

#[inline]
fn is_open(cells: &[Option<TerritoryCell>], claimed: &[bool], index: usize, owner: Owner) -> bool {
    !claimed[index] && cells[index].as_ref().is_some_and(|c| c.owner == owner)
}

/// Convenience wrapper around a one-shot [`RegionMerger`].
pub fn merge_regions(grid: &TerritoryGrid) -> Vec<MergedRegion> {
    RegionMerger::new().merge(grid)
}

/// Current merged regions plus the dirty flag and broad-phase index.
#[derive(Resource, Debug)]
pub struct RegionSet {
    regions: Arc<Vec<MergedRegion>>,
    index: RegionIndex,
    merger: RegionMerger,
    dirty: bool,
    rebuilds: u64,
}

impl RegionSet {
    /// Build the initial region set for `grid`.
    pub fn new(grid: &TerritoryGrid, bucket_cells: usize) -> Self {
        let mut set = Self {
            regions: Arc::new(Vec::new()),
            index: RegionIndex::new(grid.geometry(), bucket_cells),
            merger: RegionMerger::new(),
            dirty: true,
            rebuilds: 0,
        };
        set.rebuild(grid);
        set
    }

    pub fn regions(&self) -> &[MergedRegion] {
        &self.regions
    }

    /// Shared handle to the current regions, for snapshots.
    pub fn shared(&self) -> Arc<Vec<MergedRegion>> {
        Arc::clone(&self.regions)
    }

    pub fn index(&self) -> &RegionIndex {
        &self.index
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Number of rebuilds performed, including the initial one.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Rebuild if a capture happened since the last rebuild.
    pub fn rebuild_if_dirty(&mut self, grid: &TerritoryGrid) -> bool {
        if !self.dirty {
            return false;
        }
        self.rebuild(grid);
        true
    }

    fn rebuild(&mut self, grid: &TerritoryGrid) {
        let mut regions = Vec::with_capacity(self.regions.len().max(16));
        self.merger.merge_into(grid, &mut regions);
        self.index.rebuild(&regions);
        self.regions = Arc::new(regions);
        self.dirty = false;
        self.rebuilds += 1;
    }

    /// First region, in emission order, not owned by `excluded` that touches
    /// the circle.
    pub fn first_hit(&self, x: f32, y: f32, radius: f32, excluded: Owner) -> Option<(usize, &MergedRegion)> {
        self.index
            .candidates(x, y, radius)
            .into_iter()
            .map(|i| (i, &self.regions[i]))
            .find(|(_, r)| r.owner != excluded && r.intersects_circle(x, y, radius))
    }
}
