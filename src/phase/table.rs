//! Phase table representation.
//!
//! A [`PhaseTable`] is the single ordered source of truth for which phases
//! run, how they are described and how many ticks each one emits.

use serde::{Deserialize, Serialize};

/// Ticks emitted by every phase of the built-in flight profile.
pub const DEFAULT_TICKS_PER_PHASE: u32 = 10;

/// Code of the sentinel phase that marks the end of a simulation.
pub const SIMULATION_FINISHED: char = 'J';

/// Built-in flight profile, in transmission order.
const FLIGHT_PROFILE: [(char, &str); 11] = [
    ('@', "No flight state reached"),
    ('A', "Liftoff"),
    ('B', "Meco"),
    ('C', "Separation"),
    ('D', "Coast_Start"),
    ('E', "Apogee"),
    ('F', "Coast_End"),
    ('G', "Under_Chutes"),
    ('H', "Landing"),
    ('I', "Safing"),
    (SIMULATION_FINISHED, "Simulation Finished"),
];

/// One stage of a simulated flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    /// Single-character code sent in field 0 of every frame
    pub code: char,
    /// Human-readable name, shown in console announcements
    pub description: String,
    /// Number of frames emitted while this phase is active
    pub ticks: u32,
}

impl Phase {
    /// Creates a phase.
    #[must_use]
    pub fn new(code: char, description: impl Into<String>, ticks: u32) -> Self {
        Self {
            code,
            description: description.into(),
            ticks,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)
    }
}

/// Ordered sequence of phases.
///
/// Deserializes from `{ phases: [{ code, description, ticks }, ...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTable {
    phases: Vec<Phase>,
}

impl PhaseTable {
    /// Creates a table from phases in transmission order.
    #[must_use]
    pub const fn new(phases: Vec<Phase>) -> Self {
        Self { phases }
    }

    /// The built-in profile: `@` through `J`, ten ticks each.
    #[must_use]
    pub fn flight_profile() -> Self {
        Self::new(
            FLIGHT_PROFILE
                .iter()
                .map(|&(code, description)| Phase::new(code, description, DEFAULT_TICKS_PER_PHASE))
                .collect(),
        )
    }

    /// Returns the phases in transmission order.
    #[must_use]
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Iterates phases in transmission order.
    pub fn iter(&self) -> std::slice::Iter<'_, Phase> {
        self.phases.iter()
    }

    /// Number of phases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Whether the table has no phases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Looks up a phase by its code.
    #[must_use]
    pub fn get(&self, code: char) -> Option<&Phase> {
        self.phases.iter().find(|p| p.code == code)
    }

    /// Total frames a full run of this table emits.
    #[must_use]
    pub fn total_ticks(&self) -> u64 {
        self.phases.iter().map(|p| u64::from(p.ticks)).sum()
    }
}

impl Default for PhaseTable {
    fn default() -> Self {
        Self::flight_profile()
    }
}

impl<'a> IntoIterator for &'a PhaseTable {
    type Item = &'a Phase;
    type IntoIter = std::slice::Iter<'a, Phase>;

    fn into_iter(self) -> Self::IntoIter {
        self.phases.iter()
    }
}
