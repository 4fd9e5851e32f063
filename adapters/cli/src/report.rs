//! End-of-run summary and the win/lose decision.

use std::fmt;

use dusk_defence_core::{Event, ResourceBundle};
use dusk_defence_runtime::Simulation;
use serde::Serialize;

/// Ledger total at which the player wins.
pub(crate) const DEFAULT_VICTORY_THRESHOLD: u64 = 400;

/// Result of a run as judged by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Outcome {
    /// The ledger reached the victory threshold.
    Victory,
    /// The base was destroyed.
    Defeat,
    /// Neither condition holds yet.
    Ongoing,
}

impl Outcome {
    /// Judges the current state. Losing the base outranks a full ledger.
    pub(crate) fn evaluate(base_alive: bool, total_resources: u64, threshold: u64) -> Self {
        if !base_alive {
            Self::Defeat
        } else if total_resources >= threshold {
            Self::Victory
        } else {
            Self::Ongoing
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Victory => "victory",
            Self::Defeat => "defeat",
            Self::Ongoing => "ongoing",
        };
        f.write_str(label)
    }
}

/// Counters accumulated from the event stream while the run progresses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub(crate) waves_completed: u32,
    pub(crate) enemies_killed: u32,
    pub(crate) enemies_withdrawn: u32,
    pub(crate) structures_lost: u32,
    pub(crate) shots_fired: u32,
    pub(crate) resources_gathered: u64,
}

impl Tally {
    pub(crate) fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::WaveCompleted { .. } => self.waves_completed += 1,
                Event::EnemyDestroyed { .. } => self.enemies_killed += 1,
                Event::EnemyWithdrawn { .. } => self.enemies_withdrawn += 1,
                Event::StructureDestroyed { .. } => self.structures_lost += 1,
                Event::ProjectileFired { .. } => self.shots_fired += 1,
                Event::ResourceGathered { amount, .. } => {
                    self.resources_gathered += u64::from(*amount);
                }
                _ => {}
            }
        }
    }
}

/// Serializable summary printed when the run ends.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct RunReport {
    pub(crate) seed: u64,
    pub(crate) outcome: Outcome,
    pub(crate) clock: String,
    pub(crate) days_survived: u32,
    pub(crate) current_wave: u32,
    pub(crate) waves_completed: u32,
    pub(crate) enemies_alive: u32,
    pub(crate) enemies_killed: u32,
    pub(crate) enemies_withdrawn: u32,
    pub(crate) structures_lost: u32,
    pub(crate) shots_fired: u32,
    pub(crate) resources_gathered: u64,
    pub(crate) resources: ResourceBundle,
    pub(crate) total_resources: u64,
    pub(crate) base_health: Option<u32>,
}

impl RunReport {
    pub(crate) fn new(seed: u64, outcome: Outcome, simulation: &Simulation, tally: Tally) -> Self {
        let structures = simulation.structures();
        Self {
            seed,
            outcome,
            clock: simulation.clock().display().to_string(),
            days_survived: simulation.days_survived(),
            current_wave: simulation.current_wave(),
            waves_completed: tally.waves_completed,
            enemies_alive: simulation.enemies_alive(),
            enemies_killed: tally.enemies_killed,
            enemies_withdrawn: tally.enemies_withdrawn,
            structures_lost: tally.structures_lost,
            shots_fired: tally.shots_fired,
            resources_gathered: tally.resources_gathered,
            resources: simulation.resources(),
            total_resources: simulation.total_resources(),
            base_health: structures.base().map(|base| base.health.current()),
        }
    }

    pub(crate) fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "outcome:        {}", self.outcome)?;
        writeln!(
            f,
            "time:           day {} at {}",
            self.days_survived, self.clock
        )?;
        writeln!(
            f,
            "waves:          {} completed, wave {} next",
            self.waves_completed, self.current_wave
        )?;
        writeln!(
            f,
            "enemies:        {} killed, {} withdrawn, {} alive",
            self.enemies_killed, self.enemies_withdrawn, self.enemies_alive
        )?;
        writeln!(
            f,
            "structures:     {} lost, {} shots fired",
            self.structures_lost, self.shots_fired
        )?;
        match self.base_health {
            Some(health) => writeln!(f, "base health:    {health}")?,
            None => writeln!(f, "base health:    destroyed")?,
        }
        write!(
            f,
            "resources:      wood {} metal {} fuel {} electronics {} (total {})",
            self.resources.wood,
            self.resources.metal,
            self.resources.fuel,
            self.resources.electronics,
            self.total_resources
        )
    }
}
