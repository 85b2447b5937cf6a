use std::f64::consts::SQRT_2;

use gridstep_core::Cell;

/// Manhattan (L1) distance between two cells.
#[inline]
pub fn manhattan(a: Cell, b: Cell) -> f64 {
    ((a.x - b.x).abs() + (a.y - b.y).abs()) as f64
}

/// Chebyshev (L∞) distance between two cells.
#[inline]
pub fn chebyshev(a: Cell, b: Cell) -> f64 {
    (a.x - b.x).abs().max((a.y - b.y).abs()) as f64
}

/// Euclidean (L2) distance between two cells.
#[inline]
pub fn euclidean(a: Cell, b: Cell) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    dx.hypot(dy)
}

/// Octile distance: the cost of the cheapest 8-connected walk on an empty
/// grid where diagonal moves cost √2.
#[inline]
pub fn octile(a: Cell, b: Cell) -> f64 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
    hi as f64 + (SQRT_2 - 1.0) * lo as f64
}

/// Remaining-cost estimate used to order the open set.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Heuristic {
    Zero,
    Manhattan,
    Euclidean,
    #[default]
    Octile,
    Chebyshev,
}

impl Heuristic {
    pub const ALL: [Heuristic; 5] = [
        Self::Zero,
        Self::Manhattan,
        Self::Euclidean,
        Self::Octile,
        Self::Chebyshev,
    ];

    /// Estimate the cost from `from` to `to`. Pure; never negative.
    #[inline]
    pub fn estimate(self, from: Cell, to: Cell) -> f64 {
        match self {
            Self::Zero => 0.0,
            Self::Manhattan => manhattan(from, to),
            Self::Euclidean => euclidean(from, to),
            Self::Octile => octile(from, to),
            Self::Chebyshev => chebyshev(from, to),
        }
    }

    /// Whether the estimate never exceeds the true cost on a grid with the
    /// given movement rules. Obstacles and corner rules only make true
    /// costs larger, so they do not matter here.
    pub fn is_admissible(self, diagonal: bool) -> bool {
        match self {
            Self::Manhattan => !diagonal,
            Self::Zero | Self::Euclidean | Self::Octile | Self::Chebyshev => true,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Manhattan => "manhattan",
            Self::Euclidean => "euclidean",
            Self::Octile => "octile",
            Self::Chebyshev => "chebyshev",
        }
    }

    /// Parse the wire name of a heuristic.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.name() == name)
    }
}
