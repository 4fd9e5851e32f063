//! Scripted player that harvests nodes and patches damaged structures.

use std::collections::BTreeSet;

use dusk_defence_core::{Command, Event, ResourceNodeId, StructureView};

/// Health fraction at or below which a structure is repaired.
const REPAIR_THRESHOLD: f64 = 0.5;

#[derive(Debug, Default)]
pub(crate) struct Autopilot {
    nodes: BTreeSet<ResourceNodeId>,
}

impl Autopilot {
    /// Tracks which resource nodes are available.
    pub(crate) fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::ResourceNodeSpawned { node, .. } => {
                    let _ = self.nodes.insert(*node);
                }
                Event::ResourceNodeRemoved { node } | Event::GatherRejected { node, .. } => {
                    let _ = self.nodes.remove(node);
                }
                _ => {}
            }
        }
    }

    /// Queues one harvest per known node and a repair for every worn structure.
    pub(crate) fn plan(&self, structures: &StructureView, out: &mut Vec<Command>) {
        out.extend(
            self.nodes
                .iter()
                .map(|node| Command::GatherResource { node: *node }),
        );
        out.extend(
            structures
                .iter()
                .filter(|structure| structure.health.fraction() <= REPAIR_THRESHOLD)
                .map(|structure| Command::RepairStructure {
                    structure: structure.id,
                }),
        );
    }
}
