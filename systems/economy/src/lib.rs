#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Resource ledger that gates construction and repair.
//!
//! Balances only change through an atomic "can afford, then deduct" spend or a
//! saturating credit, so no counter ever goes negative and a failed spend never
//! leaves a partially deducted ledger behind.

use dusk_defence_core::{CombatUnit, ResourceBundle, ResourceKind};

/// Share of a structure's build cost charged to repair it from zero health.
pub const REPAIR_COST_FRACTION: f64 = 0.4;

/// Health fraction at or below which the repair bill is capped at the full fraction.
pub const REPAIR_CAP_THRESHOLD: f64 = 0.2;

/// Error returned when the ledger cannot cover a requested spend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("insufficient {kind:?}: need {required}, have {available}")]
pub struct InsufficientResources {
    /// First resource kind that falls short, in ledger order.
    pub kind: ResourceKind,
    /// Amount the spend requires.
    pub required: u32,
    /// Amount the ledger holds.
    pub available: u32,
}

/// Four non-negative resource counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResourceLedger {
    balance: ResourceBundle,
}

impl ResourceLedger {
    /// Creates a ledger holding the provided starting balance.
    #[must_use]
    pub const fn new(initial: ResourceBundle) -> Self {
        Self { balance: initial }
    }

    /// Current balance.
    #[must_use]
    pub const fn balance(&self) -> ResourceBundle {
        self.balance
    }

    /// Reports whether every component of `cost` is covered.
    #[must_use]
    pub fn can_afford(&self, cost: &ResourceBundle) -> bool {
        self.balance.covers(cost)
    }

    /// Deducts `cost` when affordable. Nothing changes on failure.
    pub fn try_spend(&mut self, cost: &ResourceBundle) -> Result<(), InsufficientResources> {
        if let Some(kind) = ResourceKind::ALL
            .into_iter()
            .find(|kind| self.balance.get(*kind) < cost.get(*kind))
        {
            return Err(InsufficientResources {
                kind,
                required: cost.get(kind),
                available: self.balance.get(kind),
            });
        }

        self.balance = self
            .balance
            .map(|kind, amount| amount - cost.get(kind));
        Ok(())
    }

    /// Adds `bundle`, saturating each counter at `u32::MAX`.
    pub fn credit(&mut self, bundle: &ResourceBundle) {
        self.balance = self
            .balance
            .map(|kind, amount| amount.saturating_add(bundle.get(kind)));
    }

    /// Sum of all four counters.
    #[must_use]
    pub fn total_resources(&self) -> u64 {
        self.balance.total()
    }
}

/// Cost of one resource to restore `unit` to full health.
///
/// The bill scales with missing health. Once health drops to a fifth of the
/// maximum it is additionally limited to the full repair fraction. Rounding is
/// half to even.
#[must_use]
pub fn repair_cost(base_cost: u32, unit: &CombatUnit) -> u32 {
    let base = f64::from(base_cost);
    let cap = (base * REPAIR_COST_FRACTION).round_ties_even();
    let scaled = (base * REPAIR_COST_FRACTION * (1.0 - unit.fraction())).round_ties_even();
    let cost = if unit.fraction() <= REPAIR_CAP_THRESHOLD {
        scaled.min(cap)
    } else {
        scaled
    };
    cost.clamp(0.0, cap) as u32
}

/// Repair bill for every resource of a structure that was built for `cost`.
#[must_use]
pub fn repair_bill(cost: &ResourceBundle, unit: &CombatUnit) -> ResourceBundle {
    cost.map(|_, amount| repair_cost(amount, unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_spend_leaves_balance_untouched() {
        let mut ledger = ResourceLedger::new(ResourceBundle::new(50, 50, 50, 4));
        let error = ledger
            .try_spend(&ResourceBundle::splat(5))
            .expect_err("electronics short");

        assert_eq!(error.kind, ResourceKind::Electronics);
        assert_eq!(error.required, 5);
        assert_eq!(error.available, 4);
        assert_eq!(ledger.balance(), ResourceBundle::new(50, 50, 50, 4));
    }

    #[test]
    fn successful_spend_deducts_every_component() {
        let mut ledger = ResourceLedger::new(ResourceBundle::splat(20));
        ledger
            .try_spend(&ResourceBundle::new(1, 2, 3, 4))
            .expect("affordable");
        assert_eq!(ledger.balance(), ResourceBundle::new(19, 18, 17, 16));
        assert_eq!(ledger.total_resources(), 70);
    }

    #[test]
    fn credit_saturates() {
        let mut ledger = ResourceLedger::new(ResourceBundle::new(u32::MAX - 1, 0, 0, 0));
        ledger.credit(&ResourceBundle::splat(5));
        assert_eq!(ledger.balance(), ResourceBundle::new(u32::MAX, 5, 5, 5));
    }

    #[test]
    fn repair_cost_is_zero_at_full_health() {
        assert_eq!(repair_cost(10, &CombatUnit::new(100)), 0);
        assert_eq!(repair_cost(1_000, &CombatUnit::new(3)), 0);
    }

    #[test]
    fn repair_cost_never_decreases_as_health_drops() {
        let mut previous = 0;
        for current in (1..=100).rev() {
            let cost = repair_cost(250, &CombatUnit::with_health(current, 100));
            assert!(cost >= previous, "current={current} cost={cost}");
            previous = cost;
        }
        // 250 * 0.4 * 0.99 = 99.
        assert_eq!(previous, 99);
    }

    #[test]
    fn low_health_cost_follows_formula_below_cap() {
        // 10 * 0.4 * 0.8 = 3.2 stays under the cap of 4.
        assert_eq!(repair_cost(10, &CombatUnit::with_health(20, 100)), 3);
        // 3.6 and 3.96 both round to the cap.
        assert_eq!(repair_cost(10, &CombatUnit::with_health(10, 100)), 4);
        assert_eq!(repair_cost(10, &CombatUnit::with_health(1, 100)), 4);
        assert_eq!(repair_cost(10, &CombatUnit::with_health(21, 100)), 3);
    }

    #[test]
    fn thirty_percent_damage_on_ten_wood_costs_one() {
        // 10 * 0.4 * 0.3 = 1.2 rounds to 1.
        assert_eq!(repair_cost(10, &CombatUnit::with_health(70, 100)), 1);
    }

    #[test]
    fn repair_bill_prices_each_resource() {
        let unit = CombatUnit::with_health(50, 100);
        let bill = repair_bill(&ResourceBundle::new(10, 20, 0, 5), &unit);
        // 2.0, 4.0, 0.0 and 1.0 after half-to-even rounding.
        assert_eq!(bill, ResourceBundle::new(2, 4, 0, 1));
    }
}
