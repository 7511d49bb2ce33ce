//! Simple profiling utility for measuring tick phases.
//!
//! The engine records named sections (`tick`, `snapshot`) into a `Profiler`
//! once profiling is enabled on it. The summary is reported through
//! `tracing` rather than printed.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release --example basic_demo --features profile
//! ```

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::info;

/// A simple profiler for measuring named sections of code.
#[derive(Debug, Default)]
pub struct Profiler {
    /// Accumulated time per section
    sections: HashMap<String, SectionStats>,
    /// Total ticks profiled
    tick_count: u64,
}

/// Statistics for a profiled section
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SectionStats {
    pub total_time: Duration,
    pub call_count: u64,
    pub min_time: Option<Duration>,
    pub max_time: Option<Duration>,
}

impl SectionStats {
    pub fn avg_time(&self) -> Duration {
        if self.call_count == 0 {
            Duration::ZERO
        } else {
            self.total_time / self.call_count as u32
        }
    }

    fn record(&mut self, elapsed: Duration) {
        self.total_time += elapsed;
        self.call_count += 1;
        self.min_time = Some(self.min_time.map_or(elapsed, |m| m.min(elapsed)));
        self.max_time = Some(self.max_time.map_or(elapsed, |m| m.max(elapsed)));
    }
}

/// One row of a profiler summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionReport {
    pub name: String,
    pub stats: SectionStats,
    /// Share of the summed time across all sections, in percent.
    pub share: f64,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one measured duration for `name`.
    pub fn record(&mut self, name: &str, elapsed: Duration) {
        match self.sections.get_mut(name) {
            Some(stats) => stats.record(elapsed),
            None => {
                let mut stats = SectionStats::default();
                stats.record(elapsed);
                self.sections.insert(name.to_string(), stats);
            }
        }
    }

    /// Time a section using a closure.
    pub fn time_section<F, R>(&mut self, name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        self.record(name, start.elapsed());
        result
    }

    /// Increment the tick counter.
    pub fn tick(&mut self) {
        self.tick_count += 1;
    }

    /// Get the number of ticks profiled.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Get statistics for a specific section.
    pub fn get_section(&self, name: &str) -> Option<&SectionStats> {
        self.sections.get(name)
    }

    /// Sections sorted by total time, descending.
    pub fn report(&self) -> Vec<SectionReport> {
        let total: Duration = self.sections.values().map(|s| s.total_time).sum();
        let mut rows: Vec<SectionReport> = self
            .sections
            .iter()
            .map(|(name, stats)| SectionReport {
                name: name.clone(),
                stats: stats.clone(),
                share: if total.is_zero() {
                    0.0
                } else {
                    stats.total_time.as_secs_f64() * 100.0 / total.as_secs_f64()
                },
            })
            .collect();
        rows.sort_by(|a, b| b.stats.total_time.cmp(&a.stats.total_time).then(a.name.cmp(&b.name)));
        rows
    }

    /// Report the summary through `tracing` at info level.
    pub fn log_summary(&self) {
        info!(ticks = self.tick_count, "profiler summary");
        for row in self.report() {
            info!(
                section = %row.name,
                total = ?row.stats.total_time,
                avg = ?row.stats.avg_time(),
                min = ?row.stats.min_time.unwrap_or_default(),
                max = ?row.stats.max_time.unwrap_or_default(),
                share = row.share,
                "profiled section"
            );
        }
    }

    /// Reset all profiling data.
    pub fn reset(&mut self) {
        self.sections.clear();
        self.tick_count = 0;
    }
}
