//! Gatherable resource nodes.

use dusk_defence_core::{ResourceKind, ResourceNodeId, WorldPoint};
use serde::Deserialize;

/// Tuning applied to every resource node the world spawns.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResourceNodeSettings {
    /// Harvests a node supports before it is removed.
    pub charges: u32,
    /// Seconds a node stays in the world before it expires.
    pub lifetime_seconds: f32,
    /// Smallest amount credited per harvest.
    pub yield_min: u32,
    /// Largest amount credited per harvest.
    pub yield_max: u32,
}

impl Default for ResourceNodeSettings {
    fn default() -> Self {
        Self {
            charges: 3,
            lifetime_seconds: 20.0,
            yield_min: 2,
            yield_max: 4,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ResourceNode {
    pub(crate) id: ResourceNodeId,
    pub(crate) kind: ResourceKind,
    pub(crate) position: WorldPoint,
    pub(crate) charges: u32,
    pub(crate) remaining_lifetime: f32,
}
