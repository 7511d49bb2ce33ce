//! Territory statistics and leaderboard.

use crate::cell::TerritoryCell;
use crate::components::{Owner, TurretId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Existing-cell counts per owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritoryStats {
    pub neutral: usize,
    /// Cells held per turret; turrets holding nothing are absent.
    pub owned: BTreeMap<TurretId, usize>,
}

impl TerritoryStats {
    /// Count owners over a row-major cell array.
    pub fn from_cells(cells: &[Option<TerritoryCell>]) -> Self {
        #[cfg(feature = "parallel")]
        {
            cells
                .par_chunks(4096)
                .map(Self::count)
                .reduce(Self::default, Self::merge)
        }
        #[cfg(not(feature = "parallel"))]
        {
            Self::count(cells)
        }
    }

    fn count(cells: &[Option<TerritoryCell>]) -> Self {
        let mut stats = Self::default();
        for cell in cells.iter().flatten() {
            match cell.owner {
                Owner::Neutral => stats.neutral += 1,
                Owner::Turret(id) => *stats.owned.entry(id).or_default() += 1,
            }
        }
        stats
    }

    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    fn merge(mut self, other: Self) -> Self {
        self.neutral += other.neutral;
        for (id, count) in other.owned {
            *self.owned.entry(id).or_default() += count;
        }
        self
    }

    /// Total number of existing cells.
    pub fn total(&self) -> usize {
        self.neutral + self.owned.values().sum::<usize>()
    }

    pub fn cells_of(&self, owner: Owner) -> usize {
        match owner {
            Owner::Neutral => self.neutral,
            Owner::Turret(id) => self.owned.get(&id).copied().unwrap_or(0),
        }
    }

    /// Up to `n` turrets by held cells, largest first; ties by ascending id.
    pub fn top(&self, n: usize) -> Vec<(TurretId, usize)> {
        let mut ranked: Vec<_> = self.owned.iter().map(|(id, count)| (*id, *count)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(n);
        ranked
    }

    pub fn leader(&self) -> Option<(TurretId, usize)> {
        self.top(1).into_iter().next()
    }

    /// Share of existing cells held by `owner`, in percent.
    pub fn percent_of(&self, owner: Owner) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.cells_of(owner) as f64 * 100.0 / total as f64
        }
    }

    /// Log the leaderboard through `tracing`.
    pub fn log_leaderboard(&self, n: usize) {
        info!(
            neutral = self.neutral,
            neutral_pct = self.percent_of(Owner::Neutral),
            "territory summary"
        );
        for (rank, (id, cells)) in self.top(n).into_iter().enumerate() {
            info!(
                rank = rank + 1,
                turret = id.0,
                cells,
                pct = self.percent_of(Owner::Turret(id)),
                "leaderboard"
            );
        }
    }
}
