//! Territory cell ownership state machine.
//!
//! A cell is either neutral or owned by one turret. Hits from a non-owner wear
//! the durability down; once it reaches zero the attacker takes the cell and
//! durability resets. Hits from the current owner are ignored.

use crate::components::{Owner, TurretId};
use serde::{Deserialize, Serialize};

/// Result of applying damage to a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// The attacker already owns the cell; nothing changed.
    Ignored,
    /// Durability dropped but the cell kept its owner.
    Damaged { remaining: f32 },
    /// The attacker took the cell from `previous`.
    Captured { previous: Owner },
}

impl DamageOutcome {
    pub fn is_capture(&self) -> bool {
        matches!(self, DamageOutcome::Captured { .. })
    }

    /// Whether the cell's observable state changed.
    pub fn changed_cell(&self) -> bool {
        !matches!(self, DamageOutcome::Ignored)
    }
}

/// One square of the territory grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerritoryCell {
    pub owner: Owner,
    /// Owner before the most recent capture, kept for colour transitions.
    pub previous_owner: Owner,
    pub durability: f32,
    /// Simulation time of the most recent capture, `None` if never captured.
    pub captured_at: Option<f64>,
}

impl TerritoryCell {
    /// A neutral cell at full durability.
    pub fn neutral(max_durability: f32) -> Self {
        Self {
            owner: Owner::Neutral,
            previous_owner: Owner::Neutral,
            durability: max_durability,
            captured_at: None,
        }
    }

    /// Apply `damage` from `attacker` at simulation time `now`.
    pub fn take_damage(
        &mut self,
        damage: f32,
        attacker: TurretId,
        now: f64,
        max_durability: f32,
    ) -> DamageOutcome {
        let attacker = Owner::Turret(attacker);
        if self.owner == attacker {
            return DamageOutcome::Ignored;
        }

        self.durability -= damage;
        if self.durability > 0.0 {
            return DamageOutcome::Damaged { remaining: self.durability };
        }

        let previous = self.owner;
        self.previous_owner = previous;
        self.owner = attacker;
        self.durability = max_durability;
        self.captured_at = Some(now);
        DamageOutcome::Captured { previous }
    }

    /// Reassign ownership outright, resetting durability without a transition.
    pub fn assign(&mut self, owner: Owner, max_durability: f32) {
        self.previous_owner = owner;
        self.owner = owner;
        self.durability = max_durability;
        self.captured_at = None;
    }

    /// Progress (0..=1) of the colour transition after the last capture.
    pub fn transition_progress(&self, now: f64, duration: f32) -> f32 {
        progress_since(self.captured_at, now, duration)
    }

    /// Flip angle in radians (0..=PI) of the capture animation.
    pub fn flip_angle(&self, now: f64, duration: f32) -> f32 {
        progress_since(self.captured_at, now, duration) * std::f32::consts::PI
    }

    pub fn is_transitioning(&self, now: f64, duration: f32) -> bool {
        progress_since(self.captured_at, now, duration) < 1.0
    }
}

fn progress_since(start: Option<f64>, now: f64, duration: f32) -> f32 {
    match start {
        Some(start) if duration > 0.0 => (((now - start) / duration as f64) as f32).clamp(0.0, 1.0),
        _ => 1.0,
    }
}
