//! The closed set of search strategies and how each orders the open set.
//!
//! Every strategy runs the same expansion loop; they differ only in the
//! [`Rank`] given to a node and in whether accumulated cost counts.

use std::cmp::Ordering;

use gridstep_core::CostModel;

use crate::heuristic::Heuristic;

/// Open-set ordering key. Lower `f` pops first, ties go to lower `h`.
/// The frontier breaks any remaining tie by insertion order.
#[derive(Copy, Clone, Debug)]
pub struct Rank {
    pub f: f64,
    pub h: f64,
}

impl Rank {
    /// A rank every node shares, leaving only insertion order.
    pub const FIFO: Self = Self { f: 0.0, h: 0.0 };
}

impl PartialEq for Rank {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rank {}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f.total_cmp(&other.f).then(self.h.total_cmp(&other.h))
    }
}

/// A search algorithm.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Algorithm {
    /// Uniform-cost search: `f = g`, heuristic ignored.
    Dijkstra,
    /// Breadth-first: every move costs 1, strict FIFO expansion.
    Bfs,
    /// Greedy best-first: `f = h`. Fast, not optimal.
    Greedy,
    /// A* and weighted A*: `f = g + weight·h`.
    #[default]
    Astar,
    /// Weighted A* steered through client-supplied waypoints.
    GuidedAstar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Self::Dijkstra,
        Self::Bfs,
        Self::Greedy,
        Self::Astar,
        Self::GuidedAstar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Dijkstra => "dijkstra",
            Self::Bfs => "bfs",
            Self::Greedy => "greedy",
            Self::Astar => "astar",
            Self::GuidedAstar => "guided_astar",
        }
    }

    /// Parse a wire name, accepting a few spelled-out aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dijkstra" => Some(Self::Dijkstra),
            "bfs" | "breadth_first" => Some(Self::Bfs),
            "greedy" | "greedy_best_first" => Some(Self::Greedy),
            "astar" | "a_star" => Some(Self::Astar),
            "guided_astar" | "llm_astar" => Some(Self::GuidedAstar),
            _ => None,
        }
    }

    /// The heuristic actually used once the algorithm's rules apply.
    #[inline]
    pub fn effective_heuristic(self, requested: Heuristic) -> Heuristic {
        match self {
            Self::Dijkstra => Heuristic::Zero,
            _ => requested,
        }
    }

    /// Movement costs this algorithm accumulates into `g`.
    #[inline]
    pub fn costs(self) -> CostModel {
        match self {
            Self::Bfs => CostModel::UNIT,
            _ => CostModel::GEOMETRIC,
        }
    }

    /// Whether the weight parameter means anything.
    #[inline]
    pub fn uses_weight(self) -> bool {
        matches!(self, Self::Astar | Self::GuidedAstar)
    }

    /// The `f` value reported for a node.
    #[inline]
    pub fn priority(self, g: f64, h: f64, weight: f64) -> f64 {
        match self {
            Self::Dijkstra | Self::Bfs => g,
            Self::Greedy => h,
            Self::Astar | Self::GuidedAstar => g + weight * h,
        }
    }

    /// The ordering key of a node.
    #[inline]
    pub fn rank(self, g: f64, h: f64, weight: f64) -> Rank {
        match self {
            Self::Bfs => Rank::FIFO,
            _ => Rank {
                f: self.priority(g, h, weight),
                h,
            },
        }
    }
}
