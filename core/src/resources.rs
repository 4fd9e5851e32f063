//! Resource kinds and cost bundles.

use serde::{Deserialize, Serialize};

/// Raw materials tracked by the player's ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Timber gathered from trees.
    Wood,
    /// Scrap metal.
    Metal,
    /// Fuel canisters.
    Fuel,
    /// Salvaged electronics.
    Electronics,
}

impl ResourceKind {
    /// Every resource kind in ledger order.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Wood,
        ResourceKind::Metal,
        ResourceKind::Fuel,
        ResourceKind::Electronics,
    ];
}

/// Quantity of each resource kind, used for costs, credits and ledger balances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceBundle {
    /// Amount of wood.
    pub wood: u32,
    /// Amount of metal.
    pub metal: u32,
    /// Amount of fuel.
    pub fuel: u32,
    /// Amount of electronics.
    pub electronics: u32,
}

impl ResourceBundle {
    /// Bundle with no resources.
    pub const ZERO: Self = Self::splat(0);

    /// Creates a bundle with explicit amounts.
    #[must_use]
    pub const fn new(wood: u32, metal: u32, fuel: u32, electronics: u32) -> Self {
        Self {
            wood,
            metal,
            fuel,
            electronics,
        }
    }

    /// Creates a bundle holding the same amount of every kind.
    #[must_use]
    pub const fn splat(amount: u32) -> Self {
        Self::new(amount, amount, amount, amount)
    }

    /// Creates a bundle holding `amount` of a single kind.
    #[must_use]
    pub fn single(kind: ResourceKind, amount: u32) -> Self {
        let mut bundle = Self::ZERO;
        *bundle.get_mut(kind) = amount;
        bundle
    }

    /// Amount stored for the provided kind.
    #[must_use]
    pub const fn get(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Wood => self.wood,
            ResourceKind::Metal => self.metal,
            ResourceKind::Fuel => self.fuel,
            ResourceKind::Electronics => self.electronics,
        }
    }

    /// Mutable access to the amount stored for the provided kind.
    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut u32 {
        match kind {
            ResourceKind::Wood => &mut self.wood,
            ResourceKind::Metal => &mut self.metal,
            ResourceKind::Fuel => &mut self.fuel,
            ResourceKind::Electronics => &mut self.electronics,
        }
    }

    /// Sum of all four amounts.
    #[must_use]
    pub fn total(&self) -> u64 {
        ResourceKind::ALL
            .iter()
            .map(|kind| u64::from(self.get(*kind)))
            .sum()
    }

    /// Reports whether every amount in `self` covers the matching amount in `cost`.
    #[must_use]
    pub fn covers(&self, cost: &ResourceBundle) -> bool {
        ResourceKind::ALL
            .iter()
            .all(|kind| self.get(*kind) >= cost.get(*kind))
    }

    /// Builds a bundle by mapping every kind through `f`.
    #[must_use]
    pub fn map(&self, mut f: impl FnMut(ResourceKind, u32) -> u32) -> Self {
        let mut mapped = Self::ZERO;
        for kind in ResourceKind::ALL {
            *mapped.get_mut(kind) = f(kind, self.get(kind));
        }
        mapped
    }
}
