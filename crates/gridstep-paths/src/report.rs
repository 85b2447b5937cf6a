//! What a search reports after each step.

use gridstep_core::Cell;

/// One open node as reported to observers. On the wire this is the array
/// `[[x, y], g, h, f]`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "(Cell, f64, f64, f64)", into = "(Cell, f64, f64, f64)")
)]
pub struct OpenEntry {
    pub cell: Cell,
    pub g: f64,
    pub h: f64,
    pub f: f64,
}

impl From<(Cell, f64, f64, f64)> for OpenEntry {
    fn from((cell, g, h, f): (Cell, f64, f64, f64)) -> Self {
        Self { cell, g, h, f }
    }
}

impl From<OpenEntry> for (Cell, f64, f64, f64) {
    fn from(e: OpenEntry) -> Self {
        (e.cell, e.g, e.h, e.f)
    }
}

/// Running counters of a search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    /// Nodes popped from the open set so far.
    pub expanded: u64,
    /// Milliseconds since the search was started.
    #[cfg_attr(feature = "serde", serde(rename = "elapsed"))]
    pub elapsed_ms: u64,
}

/// Counters of a finished search.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FinalStats {
    pub expanded: u64,
    #[cfg_attr(feature = "serde", serde(rename = "elapsed"))]
    pub elapsed_ms: u64,
    /// Path cost, `None` when no path exists.
    pub cost: Option<f64>,
}

/// Frontier state after a non-terminal step.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// The cell expanded by this step.
    pub current: Cell,
    /// Neighbours inserted into or improved in the open set by this step.
    pub neighbors: Vec<Cell>,
    /// Open nodes in pop order.
    pub open: Vec<OpenEntry>,
    /// Closed cells in finalization order.
    pub closed: Vec<Cell>,
    pub stats: Stats,
    /// Current waypoint of a guided search.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub target: Option<Cell>,
}

/// Terminal result of a search.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Finished {
    /// Start to goal inclusive; empty when no path exists.
    pub path: Vec<Cell>,
    /// The goal on success, `None` when the open set ran dry.
    pub current: Option<Cell>,
    pub open: Vec<OpenEntry>,
    pub closed: Vec<Cell>,
    pub stats: FinalStats,
}

impl Finished {
    #[inline]
    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Result of one `step`.
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    Snapshot(Snapshot),
    Finished(Finished),
}

impl StepOutcome {
    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }

    /// Nodes expanded so far, whichever kind of report this is.
    pub fn expanded(&self) -> u64 {
        match self {
            Self::Snapshot(s) => s.stats.expanded,
            Self::Finished(f) => f.stats.expanded,
        }
    }

    /// The same report with wall-clock time zeroed, for comparing runs.
    pub fn without_timing(mut self) -> Self {
        match &mut self {
            Self::Snapshot(s) => s.stats.elapsed_ms = 0,
            Self::Finished(f) => f.stats.elapsed_ms = 0,
        }
        self
    }
}
