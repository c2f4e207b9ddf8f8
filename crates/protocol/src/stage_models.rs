//! Project lifecycle stage models.
//!
//! A project progresses through an ordered list of [`Stage`]s. Which of them
//! have been reached is captured in a [`StageSet`] snapshot computed by the
//! project on demand. [`PseudoStage`]s describe a project that has no
//! underlying object yet (or failed to get one).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use ts_rs::TS;

/// Public view of a [`StageSet`]: stage name to "reached" flag.
pub type StageMap = BTreeMap<String, bool>;

/// A named lifecycle milestone.
///
/// Variants are declared in rank order, so the derived `Ord` is the rank:
/// `Undefined < Empty < Initialized < ... < Built`.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// Sentinel, never part of the public view.
    Undefined,

    /// Nothing has been done in the project directory yet.
    Empty,

    /// The project config has been created.
    Initialized,

    /// Source code has been generated.
    Generated,

    /// The build toolchain has been set up for the project.
    ToolchainReady,

    /// Toolchain config has been patched to match the generated code.
    Patched,

    /// The project has been built.
    Built,
}

impl Stage {
    /// Every real stage in ascending rank order (`Undefined` excluded).
    pub const ALL: [Stage; 6] = [
        Stage::Empty,
        Stage::Initialized,
        Stage::Generated,
        Stage::ToolchainReady,
        Stage::Patched,
        Stage::Built,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Undefined => "UNDEFINED",
            Stage::Empty => "EMPTY",
            Stage::Initialized => "INITIALIZED",
            Stage::Generated => "GENERATED",
            Stage::ToolchainReady => "TOOLCHAIN_READY",
            Stage::Patched => "PATCHED",
            Stage::Built => "BUILT",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display-only states of a project that has no live underlying object.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PseudoStage {
    /// The underlying project is still being constructed.
    Loading,

    /// Construction of the underlying project failed.
    InitError,
}

impl PseudoStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PseudoStage::Loading => "LOADING",
            PseudoStage::InitError => "INIT_ERROR",
        }
    }
}

impl fmt::Display for PseudoStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of which stages a project has reached.
///
/// A `StageSet` is only valid for the query that produced it; projects
/// compute a fresh one every time they are asked.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct StageSet {
    reached: BTreeMap<Stage, bool>,
}

impl StageSet {
    /// Create a set where no real stage has been reached.
    pub fn new() -> Self {
        Self {
            reached: Stage::ALL.iter().map(|stage| (*stage, false)).collect(),
        }
    }

    /// Create a set with exactly the given stages flagged as reached.
    pub fn from_reached(stages: impl IntoIterator<Item = Stage>) -> Self {
        let mut set = Self::new();
        for stage in stages {
            set.set(stage, true);
        }
        set
    }

    /// Set the flag for a stage. `Undefined` is accepted but never shown.
    pub fn set(&mut self, stage: Stage, reached: bool) {
        self.reached.insert(stage, reached);
    }

    /// Builder-style variant of [`StageSet::set`] with `reached = true`.
    pub fn with(mut self, stage: Stage) -> Self {
        self.set(stage, true);
        self
    }

    pub fn is_reached(&self, stage: Stage) -> bool {
        self.reached.get(&stage).copied().unwrap_or(false)
    }

    /// Public view keyed by stage name, excluding `Undefined`.
    pub fn as_map(&self) -> StageMap {
        Stage::ALL
            .iter()
            .map(|stage| (stage.as_str().to_string(), self.is_reached(*stage)))
            .collect()
    }

    /// The highest-ranked reached stage, or `Empty` if none is reached.
    pub fn current_stage(&self) -> Stage {
        Stage::ALL
            .iter()
            .rev()
            .find(|stage| self.is_reached(**stage))
            .copied()
            .unwrap_or(Stage::Empty)
    }
}

impl Default for StageSet {
    fn default() -> Self {
        Self::new()
    }
}
