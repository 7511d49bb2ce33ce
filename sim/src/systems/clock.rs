//! Simulation clock resources.

use bevy_ecs::prelude::*;

/// Resource containing the delta time for the current tick.
#[derive(Resource, Default)]
pub struct DeltaTime(pub f32);

/// Tick counter and simulation time.
///
/// Time is derived from the tick count, so it never drifts from `tick * dt`.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct SimClock {
    pub tick: u64,
    pub time: f64,
}

impl SimClock {
    /// Step the clock forward by one tick of length `dt`.
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.time = self.tick as f64 * dt as f64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_tracks_tick_count() {
        let mut clock = SimClock::default();
        for _ in 0..600 {
            clock.advance(0.25);
        }
        assert_eq!(clock.tick, 600);
        assert_eq!(clock.time, 150.0);
    }
}
