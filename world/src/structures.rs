//! Authoritative structure state management utilities.

use std::collections::BTreeMap;

use dusk_defence_core::{
    BlueprintId, CombatUnit, EnemyId, ResourceBundle, StructureId, WorldPoint,
};

/// Snapshot of a structure stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct StructureState {
    /// Identifier allocated by the world for the structure.
    pub(crate) id: StructureId,
    /// Centre of the structure.
    pub(crate) position: WorldPoint,
    /// Facing in radians.
    pub(crate) heading: f32,
    /// Health pool.
    pub(crate) health: CombatUnit,
    /// Catalog entry; `None` marks the main structure.
    pub(crate) blueprint: Option<BlueprintId>,
    /// Build cost that prices repairs.
    pub(crate) cost: ResourceBundle,
    /// Simulation time at which the next shot may leave the barrel.
    pub(crate) next_fire_time: f64,
    /// Enemy aimed at most recently.
    pub(crate) target: Option<EnemyId>,
}

impl StructureState {
    pub(crate) fn is_main(&self) -> bool {
        self.blueprint.is_none()
    }
}

/// Registry that stores structures and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct StructureRegistry {
    entries: BTreeMap<StructureId, StructureState>,
    next_structure_id: StructureId,
}

impl StructureRegistry {
    /// Creates an empty structure registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_structure_id: StructureId::new(0),
        }
    }

    /// Inserts a structure at full health and returns its identifier.
    pub(crate) fn insert(
        &mut self,
        position: WorldPoint,
        max_health: u32,
        blueprint: Option<BlueprintId>,
        cost: ResourceBundle,
    ) -> StructureId {
        let id = self.next_structure_id;
        self.next_structure_id = StructureId::new(id.get().saturating_add(1));
        let previous = self.entries.insert(
            id,
            StructureState {
                id,
                position,
                heading: 0.0,
                health: CombatUnit::new(max_health),
                blueprint,
                cost,
                next_fire_time: 0.0,
                target: None,
            },
        );
        debug_assert!(previous.is_none(), "structure identifiers are never reused");
        id
    }

    pub(crate) fn get(&self, id: StructureId) -> Option<&StructureState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: StructureId) -> Option<&mut StructureState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: StructureId) -> Option<StructureState> {
        self.entries.remove(&id)
    }

    /// Structures in ascending identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &StructureState> {
        self.entries.values()
    }

    /// The main structure, if it still stands.
    pub(crate) fn base(&self) -> Option<&StructureState> {
        self.entries.values().find(|state| state.is_main())
    }

    /// Reports whether any structure centre lies strictly closer than `clearance`.
    pub(crate) fn is_occupied(&self, position: WorldPoint, clearance: f32) -> bool {
        self.entries
            .values()
            .any(|state| state.position.distance(position) < clearance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_allocates_monotonic_identifiers() {
        let mut registry = StructureRegistry::new();
        let first = registry.insert(WorldPoint::ORIGIN, 10, None, ResourceBundle::ZERO);
        let second = registry.insert(
            WorldPoint::new(3.0, 0.0),
            10,
            Some(BlueprintId::new(0)),
            ResourceBundle::ZERO,
        );
        let _ = registry.remove(first);
        let third = registry.insert(WorldPoint::ORIGIN, 10, None, ResourceBundle::ZERO);

        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
        assert_eq!(third.get(), 2);
    }

    #[test]
    fn occupancy_uses_strict_clearance() {
        let mut registry = StructureRegistry::new();
        let _ = registry.insert(WorldPoint::ORIGIN, 10, None, ResourceBundle::ZERO);

        assert!(registry.is_occupied(WorldPoint::new(0.5, 0.0), 1.0));
        assert!(!registry.is_occupied(WorldPoint::new(1.0, 0.0), 1.0));
    }

    #[test]
    fn base_is_found_among_built_structures() {
        let mut registry = StructureRegistry::new();
        let _ = registry.insert(
            WorldPoint::new(4.0, 4.0),
            10,
            Some(BlueprintId::new(1)),
            ResourceBundle::ZERO,
        );
        let base = registry.insert(WorldPoint::ORIGIN, 10, None, ResourceBundle::ZERO);

        assert_eq!(registry.base().map(|state| state.id), Some(base));
    }
}
