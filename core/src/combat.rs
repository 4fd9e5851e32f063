//! Health, damage and destruction semantics shared by enemies and structures.

use serde::{Deserialize, Serialize};

/// Health pool of a single combat participant.
///
/// A unit transitions to the destroyed state exactly once, the first time
/// incoming damage drains its health to zero. Destroyed units ignore further
/// damage and repairs so callers can never resurrect or double-count them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatUnit {
    current: u32,
    max: u32,
    destroyed: bool,
}

impl CombatUnit {
    /// Creates a unit at full health. A zero maximum is raised to one.
    #[must_use]
    pub const fn new(max: u32) -> Self {
        let max = if max == 0 { 1 } else { max };
        Self {
            current: max,
            max,
            destroyed: false,
        }
    }

    /// Creates a unit with explicit current health, clamped into `1..=max`.
    #[must_use]
    pub fn with_health(current: u32, max: u32) -> Self {
        let mut unit = Self::new(max);
        if current > unit.max {
            tracing::warn!(current, max = unit.max, "health above maximum; clamping");
        }
        unit.current = current.clamp(1, unit.max);
        unit
    }

    /// Current health.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Maximum health.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Remaining health as a fraction of the maximum in `0.0..=1.0`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        f64::from(self.current) / f64::from(self.max)
    }

    /// Reports whether the unit has been destroyed.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Reports whether the unit sits at maximum health.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.current == self.max
    }

    /// Applies incoming damage and reports the resulting transition.
    pub fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.destroyed {
            return DamageOutcome::Ignored;
        }

        self.current = self.current.saturating_sub(amount);
        if self.current == 0 {
            self.destroyed = true;
            DamageOutcome::Destroyed
        } else {
            DamageOutcome::Survived {
                remaining: self.current,
            }
        }
    }

    /// Restores the unit to full health. Destroyed units stay destroyed.
    pub fn repair(&mut self) {
        if !self.destroyed {
            self.current = self.max;
        }
    }

    /// Coarse damage bracket used by presentation collaborators.
    #[must_use]
    pub fn damage_state(&self) -> DamageState {
        // Integer comparisons keep the 25% / 50% thresholds exact.
        let current = u64::from(self.current) * 4;
        let max = u64::from(self.max);
        if current <= max {
            DamageState::Critical
        } else if current <= max * 2 {
            DamageState::Damaged
        } else {
            DamageState::Intact
        }
    }
}

/// Result of applying damage to a [`CombatUnit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DamageOutcome {
    /// The unit absorbed the hit and keeps fighting.
    Survived {
        /// Health left after the hit.
        remaining: u32,
    },
    /// This hit destroyed the unit. Reported once per unit.
    Destroyed,
    /// The unit was already destroyed; nothing changed.
    Ignored,
}

/// Damage bracket of a unit, derived from its remaining health.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageState {
    /// More than half of the maximum health remains.
    Intact,
    /// At or below half of the maximum health.
    Damaged,
    /// At or below a quarter of the maximum health.
    Critical,
}
