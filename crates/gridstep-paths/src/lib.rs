//! Externally stepped search over a [`GridModel`](gridstep_core::GridModel).
//!
//! A [`SearchSession`] runs one search at a time and advances it by exactly
//! one expansion per [`step`](SearchSession::step), reporting the frontier
//! after each one. Supported strategies:
//!
//! - **Dijkstra** uniform-cost search
//! - **BFS** with unit move costs and strict FIFO expansion
//! - **Greedy** best-first on the heuristic alone
//! - **A\*** with an optional heuristic weight
//! - **Guided A\*** steered through a chain of waypoints ([`Guide`])
//!
//! All strategies share one [`SearchFrontier`]: an open set with
//! decrease-key and a closed set that is never reopened. Ties are broken by
//! lower `f`, then lower `h`, then insertion order, so identical inputs
//! always produce identical snapshot sequences.

mod frontier;
mod guide;
mod heuristic;
mod report;
mod session;
mod strategy;

pub use frontier::{Mark, Node, Pushed, SearchFrontier};
pub use guide::{Guide, MAX_WAYPOINTS};
pub use heuristic::{Heuristic, chebyshev, euclidean, manhattan, octile};
pub use report::{FinalStats, Finished, OpenEntry, Snapshot, Stats, StepOutcome};
pub use session::{Outcome, SearchParams, SearchSession, SearchState, SessionError};
pub use strategy::{Algorithm, Rank};
