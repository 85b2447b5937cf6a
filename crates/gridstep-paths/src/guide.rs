//! Waypoint guidance for [`Algorithm::GuidedAstar`](crate::Algorithm).
//!
//! The search is pulled toward the goal and toward the current waypoint at
//! once. Discovering the waypoint moves the pull on to the next one.

use gridstep_core::{Cell, GridModel};

use crate::heuristic::Heuristic;

/// Longest waypoint chain kept, start and goal included.
pub const MAX_WAYPOINTS: usize = 32;

#[derive(Clone, Debug)]
pub struct Guide {
    /// `[start, w1, .., goal]`.
    targets: Vec<Cell>,
    next: usize,
}

impl Guide {
    /// Build the chain from client waypoints. Waypoints that are out of
    /// bounds, on obstacles, or repeat the previous entry are dropped.
    pub fn new(model: &GridModel, waypoints: &[Cell]) -> Self {
        let mut targets = vec![model.start()];
        for &w in waypoints {
            if targets.len() + 1 >= MAX_WAYPOINTS {
                break;
            }
            if !model.is_free(w) || w == model.goal() || targets.last() == Some(&w) {
                continue;
            }
            targets.push(w);
        }
        targets.push(model.goal());
        Self { targets, next: 1 }
    }

    #[inline]
    pub fn target(&self) -> Cell {
        self.targets[self.next]
    }

    #[inline]
    pub fn targets(&self) -> &[Cell] {
        &self.targets
    }

    /// Distance to the goal plus distance to the current waypoint.
    #[inline]
    pub fn estimate(&self, h: Heuristic, c: Cell, goal: Cell) -> f64 {
        h.estimate(c, goal) + h.estimate(c, self.target())
    }

    /// Move on to the next waypoint if `reached` is the current one.
    /// Returns whether the target changed.
    pub fn advance(&mut self, reached: Cell) -> bool {
        if reached != self.target() || self.next + 1 >= self.targets.len() {
            return false;
        }
        self.next += 1;
        true
    }
}
