//! Two-phase projectile vs territory collision.
//!
//! The broad phase tests the projectile circle against merged-region boxes,
//! skipping regions the projectile's owner already holds. Only on a broad hit
//! does the narrow phase scan the cells around the projectile, circle vs
//! circle, for the first cell that is not the owner's.

use crate::components::{Owner, TurretId};
use crate::grid::{GridCoord, TerritoryGrid};
use crate::regions::{MergedRegion, RegionSet};

/// A projectile as seen by collision queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionQuery {
    pub owner: TurretId,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl CollisionQuery {
    fn excluded(&self) -> Owner {
        Owner::Turret(self.owner)
    }
}

/// First merged region, in emission order, the projectile may damage.
pub fn broad_phase<'a>(regions: &'a RegionSet, query: &CollisionQuery) -> Option<&'a MergedRegion> {
    regions
        .first_hit(query.x, query.y, query.radius, query.excluded())
        .map(|(_, region)| region)
}

/// First non-owned cell within reach of the projectile.
///
/// Cells are scanned column by column (x outer, y inner) over a square
/// neighbourhood of `ceil(radius / cell_size)` cells around the cell under the
/// projectile. A cell is hit when the distance between centres is strictly
/// less than `radius + cell_size / 2`. A projectile outside the grid never
/// hits.
pub fn narrow_phase(grid: &TerritoryGrid, query: &CollisionQuery) -> Option<GridCoord> {
    let geometry = grid.geometry();
    let centre = geometry.world_to_grid(query.x, query.y)?;
    let cell_size = geometry.cell_size;
    let reach = (query.radius / cell_size).ceil() as i64;
    let hit_distance = query.radius + cell_size / 2.0;
    let hit_distance_sq = hit_distance * hit_distance;
    let excluded = query.excluded();

    for dx in -reach..=reach {
        for dy in -reach..=reach {
            let Some(coord) = geometry.coord(centre.x as i64 + dx, centre.y as i64 + dy) else {
                continue;
            };
            let Some(cell) = grid.get(coord) else {
                continue;
            };
            if cell.owner == excluded {
                continue;
            }
            let c = geometry.cell_center(coord);
            let ddx = query.x - c.x;
            let ddy = query.y - c.y;
            if ddx * ddx + ddy * ddy < hit_distance_sq {
                return Some(coord);
            }
        }
    }
    None
}

/// Full collision resolution: broad phase gate, then narrow phase.
///
/// A broad hit without a narrow hit reports no collision; the projectile
/// keeps flying.
pub fn resolve(grid: &TerritoryGrid, regions: &RegionSet, query: &CollisionQuery) -> Option<GridCoord> {
    broad_phase(regions, query)?;
    narrow_phase(grid, query)
}
