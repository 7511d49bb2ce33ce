//! Spatial partitioning over merged regions.
//!
//! The world is divided into square buckets; every region is listed in each
//! bucket its box overlaps. A circle query only has to test the regions listed
//! in the buckets under the circle's bounding box, rather than every region.

use crate::grid::GridGeometry;
use crate::regions::MergedRegion;

/// Bucket grid mapping world areas to the regions that overlap them.
#[derive(Debug, Clone)]
pub struct RegionIndex {
    /// Bucket size in world units.
    bucket_size: f32,
    columns: usize,
    rows: usize,
    /// Region indices per bucket (row-major), ascending within each bucket.
    buckets: Vec<Vec<u32>>,
}

impl RegionIndex {
    /// Create an empty index covering `geometry`, `bucket_cells` cells per bucket edge.
    pub fn new(geometry: &GridGeometry, bucket_cells: usize) -> Self {
        let bucket_cells = bucket_cells.max(1);
        let columns = geometry.width.div_ceil(bucket_cells).max(1);
        let rows = geometry.height.div_ceil(bucket_cells).max(1);
        Self {
            bucket_size: geometry.cell_size * bucket_cells as f32,
            columns,
            rows,
            buckets: vec![Vec::new(); columns * rows],
        }
    }

    pub fn bucket_size(&self) -> f32 {
        self.bucket_size
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Convert a world coordinate span to an inclusive, clamped bucket range.
    #[inline]
    fn span(&self, min: f32, max: f32, limit: usize) -> (usize, usize) {
        let last = limit as i64 - 1;
        let lo = ((min / self.bucket_size).floor() as i64).clamp(0, last);
        let hi = ((max / self.bucket_size).floor() as i64).clamp(0, last);
        (lo as usize, hi as usize)
    }

    /// Re-index `regions`. Indices refer to positions in the slice.
    pub fn rebuild(&mut self, regions: &[MergedRegion]) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        for (i, region) in regions.iter().enumerate() {
            let (x0, x1) = self.span(region.world_min.x, region.world_max.x, self.columns);
            let (y0, y1) = self.span(region.world_min.y, region.world_max.y, self.rows);
            for by in y0..=y1 {
                for bx in x0..=x1 {
                    self.buckets[by * self.columns + bx].push(i as u32);
                }
            }
        }
    }

    /// Indices of regions that may touch the circle, ascending and unique.
    pub fn candidates(&self, x: f32, y: f32, radius: f32) -> Vec<usize> {
        let (x0, x1) = self.span(x - radius, x + radius, self.columns);
        let (y0, y1) = self.span(y - radius, y + radius, self.rows);

        let mut results = Vec::new();
        for by in y0..=y1 {
            for bx in x0..=x1 {
                results.extend(self.buckets[by * self.columns + bx].iter().map(|&i| i as usize));
            }
        }
        if y0 != y1 || x0 != x1 {
            results.sort_unstable();
            results.dedup();
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Owner, TurretId};

    fn geometry() -> GridGeometry {
        GridGeometry::new(16, 16, 10.0)
    }

    #[test]
    fn test_bucket_layout() {
        let index = RegionIndex::new(&geometry(), 4);
        assert_eq!(index.bucket_size(), 40.0);
        assert_eq!(index.bucket_count(), 16);

        let uneven = RegionIndex::new(&GridGeometry::new(10, 3, 1.0), 4);
        assert_eq!(uneven.bucket_count(), 3);
    }

    #[test]
    fn test_candidates_cover_overlapping_regions() {
        let regions = vec![
            MergedRegion::new(Owner::Neutral, 0, 0, 16, 2, 10.0),
            MergedRegion::new(Owner::Turret(TurretId(0)), 0, 2, 3, 3, 10.0),
            MergedRegion::new(Owner::Neutral, 12, 12, 4, 4, 10.0),
        ];
        let mut index = RegionIndex::new(&geometry(), 4);
        index.rebuild(&regions);

        assert_eq!(index.candidates(100.0, 5.0, 1.0), vec![0]);
        assert_eq!(index.candidates(5.0, 5.0, 1.0), vec![0, 1]);
        assert_eq!(index.candidates(35.0, 35.0, 10.0), vec![0, 1]);
        assert_eq!(index.candidates(150.0, 150.0, 5.0), vec![2]);
        // queries outside the world clamp to the border buckets
        assert_eq!(index.candidates(-50.0, 5.0, 2.0), vec![0, 1]);
    }

    #[test]
    fn test_candidates_are_sorted_and_unique() {
        let regions = vec![MergedRegion::new(Owner::Neutral, 0, 0, 16, 16, 10.0)];
        let mut index = RegionIndex::new(&geometry(), 2);
        index.rebuild(&regions);
        assert_eq!(index.candidates(80.0, 80.0, 60.0), vec![0]);
    }

    #[test]
    fn test_rebuild_clears_previous_entries() {
        let mut index = RegionIndex::new(&geometry(), 4);
        index.rebuild(&[MergedRegion::new(Owner::Neutral, 0, 0, 1, 1, 10.0)]);
        index.rebuild(&[]);
        assert!(index.candidates(5.0, 5.0, 5.0).is_empty());
    }
}
