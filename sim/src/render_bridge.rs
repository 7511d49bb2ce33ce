//! Flat render buffers.
//!
//! Packs the parts of a `SimulationSnapshot` that a renderer draws in bulk
//! (merged regions and turrets) into contiguous `Vec<f32>` buffers with a
//! fixed stride, so a consumer on the other side of an FFI or GPU upload can
//! walk them without knowing any Rust types.
//!
//! # Region buffer
//!
//! ```text
//! [0]                    region_count
//! for region i at offset 1 + i * REGION_STRIDE:
//!   [+0] owner          - turret id, or -1.0 for neutral
//!   [+1] start_x        - first column
//!   [+2] start_y        - first row
//!   [+3] width          - columns
//!   [+4] height         - rows
//!   [+5] min_x  [+6] min_y   - world-space lower corner
//!   [+7] max_x  [+8] max_y   - world-space upper corner
//! ```
//!
//! # Turret buffer
//!
//! ```text
//! [0]                    turret_count
//! for turret i at offset 1 + i * TURRET_STRIDE:
//!   [+0] id   [+1] x   [+2] y
//!   [+3] dir_x  [+4] dir_y     - current firing direction
//!   [+5] score
//!   [+6] r  [+7] g  [+8] b     - palette colour
//! ```
//!
//! Both buffers are deterministic for a given snapshot: regions keep their
//! emission order and turrets their ascending id order.

use crate::world::SimulationSnapshot;

// ============================================================================
// LAYOUT
// ============================================================================

/// Number of f32 values in each buffer header (the element count).
pub const HEADER_SIZE: usize = 1;

/// Number of f32 values per region.
pub const REGION_STRIDE: usize = 9;

pub const REGION_FIELD_OWNER: usize = 0;
pub const REGION_FIELD_START_X: usize = 1;
pub const REGION_FIELD_START_Y: usize = 2;
pub const REGION_FIELD_WIDTH: usize = 3;
pub const REGION_FIELD_HEIGHT: usize = 4;
pub const REGION_FIELD_MIN_X: usize = 5;
pub const REGION_FIELD_MIN_Y: usize = 6;
pub const REGION_FIELD_MAX_X: usize = 7;
pub const REGION_FIELD_MAX_Y: usize = 8;

/// Number of f32 values per turret.
pub const TURRET_STRIDE: usize = 9;

pub const TURRET_FIELD_ID: usize = 0;
pub const TURRET_FIELD_X: usize = 1;
pub const TURRET_FIELD_Y: usize = 2;
pub const TURRET_FIELD_DIR_X: usize = 3;
pub const TURRET_FIELD_DIR_Y: usize = 4;
pub const TURRET_FIELD_SCORE: usize = 5;
pub const TURRET_FIELD_R: usize = 6;
pub const TURRET_FIELD_G: usize = 7;
pub const TURRET_FIELD_B: usize = 8;

/// Owner value written for neutral regions.
pub const NEUTRAL_OWNER: f32 = -1.0;

// ============================================================================
// ENCODING
// ============================================================================

/// Pack the snapshot's merged regions.
pub fn regions_to_flatbuffer(snapshot: &SimulationSnapshot) -> Vec<f32> {
    let count = snapshot.regions.len();
    let size = calculate_buffer_size(count, REGION_STRIDE);
    let mut buffer = Vec::with_capacity(size);

    buffer.push(count as f32);
    for region in snapshot.regions.iter() {
        buffer.push(region.owner.as_raw() as f32);
        buffer.push(region.start_x as f32);
        buffer.push(region.start_y as f32);
        buffer.push(region.width as f32);
        buffer.push(region.height as f32);
        buffer.push(region.world_min.x);
        buffer.push(region.world_min.y);
        buffer.push(region.world_max.x);
        buffer.push(region.world_max.y);
    }

    debug_assert_eq!(buffer.len(), size);
    buffer
}

/// Pack the snapshot's turrets.
pub fn turrets_to_flatbuffer(snapshot: &SimulationSnapshot) -> Vec<f32> {
    let count = snapshot.turrets.len();
    let size = calculate_buffer_size(count, TURRET_STRIDE);
    let mut buffer = Vec::with_capacity(size);

    buffer.push(count as f32);
    for turret in &snapshot.turrets {
        buffer.push(turret.id as f32);
        buffer.push(turret.x);
        buffer.push(turret.y);
        buffer.push(turret.fire_dir_x);
        buffer.push(turret.fire_dir_y);
        buffer.push(turret.score as f32);
        buffer.push(turret.color.r);
        buffer.push(turret.color.g);
        buffer.push(turret.color.b);
    }

    debug_assert_eq!(buffer.len(), size);
    buffer
}

// ============================================================================
// DECODING HELPERS
// ============================================================================

/// Total buffer length for `count` elements of `stride` values.
#[inline]
pub const fn calculate_buffer_size(count: usize, stride: usize) -> usize {
    HEADER_SIZE + count * stride
}

/// Element count stored in a buffer header.
#[inline]
pub fn parse_count(buffer: &[f32]) -> Option<usize> {
    buffer.first().map(|&count| count as usize)
}

/// Offset of element `index` in a buffer of the given stride.
#[inline]
pub const fn element_offset(index: usize, stride: usize) -> usize {
    HEADER_SIZE + index * stride
}
