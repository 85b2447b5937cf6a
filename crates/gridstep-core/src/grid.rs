//! [`GridConfig`] (what a client submits) and [`GridModel`] (what a search
//! walks).
//!
//! A `GridModel` is only ever built from a config that passed
//! [`GridConfig::validate`], so start and goal are always in bounds, distinct
//! and free.

use std::collections::BTreeSet;
use std::f64::consts::SQRT_2;

use crate::geom::{Cell, Direction};

/// Largest accepted grid side.
pub const MAX_GRID_SIZE: i32 = 200;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A structurally invalid grid description.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("grid size {size} must be between 1 and {max}")]
    InvalidSize { size: i64, max: i32 },

    #[error("{what} {cell} is outside the {size}x{size} grid")]
    OutOfBounds {
        what: &'static str,
        cell: Cell,
        size: i32,
    },

    #[error("{what} {cell} is on an obstacle")]
    Blocked { what: &'static str, cell: Cell },

    #[error("start and goal are the same cell {0}")]
    SameStartGoal(Cell),
}

// ---------------------------------------------------------------------------
// CornerPolicy
// ---------------------------------------------------------------------------

/// Which diagonal moves are allowed next to obstacles.
///
/// The two cells flanking a diagonal move are the orthogonal neighbours the
/// move passes between, e.g. E and N for a NE move.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum CornerPolicy {
    /// Any free diagonal cell may be entered.
    Allow,
    /// At least one flanking cell must be free: no squeezing between two
    /// obstacles that touch at a corner.
    #[default]
    NoSqueeze,
    /// Both flanking cells must be free.
    NoCut,
}

impl CornerPolicy {
    /// Whether a diagonal move is allowed given its flanking cells.
    #[inline]
    pub fn permits(self, first_free: bool, second_free: bool) -> bool {
        match self {
            Self::Allow => true,
            Self::NoSqueeze => first_free || second_free,
            Self::NoCut => first_free && second_free,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::NoSqueeze => "no_squeeze",
            Self::NoCut => "no_cut",
        }
    }

    /// Parse the wire name of a policy.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "allow" => Some(Self::Allow),
            "no_squeeze" => Some(Self::NoSqueeze),
            "no_cut" => Some(Self::NoCut),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// CostModel
// ---------------------------------------------------------------------------

/// Cost of a single move by kind.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CostModel {
    pub orthogonal: f64,
    pub diagonal: f64,
}

impl CostModel {
    /// Orthogonal moves cost 1, diagonal moves cost √2.
    pub const GEOMETRIC: Self = Self {
        orthogonal: 1.0,
        diagonal: SQRT_2,
    };

    /// Every move costs 1.
    pub const UNIT: Self = Self {
        orthogonal: 1.0,
        diagonal: 1.0,
    };

    #[inline]
    pub fn cost(self, d: Direction) -> f64 {
        if d.is_diagonal() {
            self.diagonal
        } else {
            self.orthogonal
        }
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::GEOMETRIC
    }
}

// ---------------------------------------------------------------------------
// GridConfig
// ---------------------------------------------------------------------------

/// A square grid with obstacles, a start and a goal.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    pub size: i32,
    pub obstacles: BTreeSet<Cell>,
    pub start: Cell,
    pub goal: Cell,
    pub diagonal: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub corner: CornerPolicy,
}

impl GridConfig {
    /// An obstacle-free, 4-connected grid.
    pub fn new(size: i32, start: Cell, goal: Cell) -> Self {
        Self {
            size,
            obstacles: BTreeSet::new(),
            start,
            goal,
            diagonal: false,
            corner: CornerPolicy::default(),
        }
    }

    pub fn with_obstacles(mut self, obstacles: impl IntoIterator<Item = Cell>) -> Self {
        self.obstacles.extend(obstacles);
        self
    }

    pub fn with_diagonal(mut self, diagonal: bool) -> Self {
        self.diagonal = diagonal;
        self
    }

    pub fn with_corner(mut self, corner: CornerPolicy) -> Self {
        self.corner = corner;
        self
    }

    /// Whether `c` lies inside the grid.
    #[inline]
    pub fn contains(&self, c: Cell) -> bool {
        c.x >= 0 && c.y >= 0 && c.x < self.size && c.y < self.size
    }

    /// Check the grid against its invariants: `1 <= size <= max_size`, every
    /// cell in bounds, start and goal distinct and not obstacles.
    pub fn validate(&self, max_size: i32) -> Result<(), ConfigError> {
        if self.size < 1 || self.size > max_size {
            return Err(ConfigError::InvalidSize {
                size: self.size as i64,
                max: max_size,
            });
        }
        for (what, cell) in [("start", self.start), ("goal", self.goal)] {
            if !self.contains(cell) {
                return Err(ConfigError::OutOfBounds {
                    what,
                    cell,
                    size: self.size,
                });
            }
        }
        if let Some(&cell) = self.obstacles.iter().find(|c| !self.contains(**c)) {
            return Err(ConfigError::OutOfBounds {
                what: "obstacle",
                cell,
                size: self.size,
            });
        }
        for (what, cell) in [("start", self.start), ("goal", self.goal)] {
            if self.obstacles.contains(&cell) {
                return Err(ConfigError::Blocked { what, cell });
            }
        }
        if self.start == self.goal {
            return Err(ConfigError::SameStartGoal(self.start));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// GridModel
// ---------------------------------------------------------------------------

/// Immutable traversal view of a validated [`GridConfig`].
#[derive(Clone, Debug)]
pub struct GridModel {
    size: i32,
    blocked: Vec<bool>,
    start: Cell,
    goal: Cell,
    diagonal: bool,
    corner: CornerPolicy,
    costs: CostModel,
}

impl GridModel {
    /// Validate `config` against `max_size` and build the model.
    pub fn new(config: &GridConfig, max_size: i32) -> Result<Self, ConfigError> {
        config.validate(max_size)?;
        let side = config.size as usize;
        let mut blocked = vec![false; side * side];
        for &c in &config.obstacles {
            blocked[c.y as usize * side + c.x as usize] = true;
        }
        Ok(Self {
            size: config.size,
            blocked,
            start: config.start,
            goal: config.goal,
            diagonal: config.diagonal,
            corner: config.corner,
            costs: CostModel::GEOMETRIC,
        })
    }

    /// Replace the cost model (e.g. [`CostModel::UNIT`]).
    pub fn with_costs(mut self, costs: CostModel) -> Self {
        self.costs = costs;
        self
    }

    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    #[inline]
    pub fn start(&self) -> Cell {
        self.start
    }

    #[inline]
    pub fn goal(&self) -> Cell {
        self.goal
    }

    #[inline]
    pub fn diagonal(&self) -> bool {
        self.diagonal
    }

    #[inline]
    pub fn corner(&self) -> CornerPolicy {
        self.corner
    }

    #[inline]
    pub fn costs(&self) -> CostModel {
        self.costs
    }

    #[inline]
    pub fn contains(&self, c: Cell) -> bool {
        c.x >= 0 && c.y >= 0 && c.x < self.size && c.y < self.size
    }

    /// Row-major index of `c`, or `None` if out of bounds.
    #[inline]
    pub fn index(&self, c: Cell) -> Option<usize> {
        if !self.contains(c) {
            return None;
        }
        Some(c.y as usize * self.size as usize + c.x as usize)
    }

    /// Inverse of [`index`](Self::index).
    #[inline]
    pub fn cell(&self, idx: usize) -> Cell {
        let side = self.size as usize;
        Cell::new((idx % side) as i32, (idx / side) as i32)
    }

    /// In bounds and not an obstacle.
    #[inline]
    pub fn is_free(&self, c: Cell) -> bool {
        self.index(c).is_some_and(|i| !self.blocked[i])
    }

    /// The moves this grid allows, in enumeration order.
    #[inline]
    pub fn directions(&self) -> &'static [Direction] {
        if self.diagonal {
            &Direction::ALL
        } else {
            &Direction::ORTHOGONAL
        }
    }

    /// Whether the move `d` out of `from` is allowed.
    pub fn can_move(&self, from: Cell, d: Direction) -> bool {
        if d.is_diagonal() && !self.diagonal {
            return false;
        }
        if !self.is_free(from.step(d)) {
            return false;
        }
        match d.flanks() {
            Some((a, b)) => self
                .corner
                .permits(self.is_free(from.step(a)), self.is_free(from.step(b))),
            None => true,
        }
    }

    /// Cost of moving between two cells, or `None` if `to` is not reachable
    /// from `from` in one move.
    pub fn move_cost(&self, from: Cell, to: Cell) -> Option<f64> {
        let delta = to - from;
        let d = *Direction::ALL
            .iter()
            .find(|d| d.offset() == (delta.x, delta.y))?;
        self.can_move(from, d).then(|| self.costs.cost(d))
    }

    /// Append the traversable neighbours of `c` and their move costs into
    /// `buf`, in enumeration order. The caller clears `buf` before calling.
    pub fn neighbors(&self, c: Cell, buf: &mut Vec<(Cell, f64)>) {
        for &d in self.directions() {
            if self.can_move(c, d) {
                buf.push((c.step(d), self.costs.cost(d)));
            }
        }
    }
}
