use serde::{Deserialize, Serialize};
use std::f32::consts::SQRT_2;

/// Grid coordinate `(ku, kv)` of a cloth particle. Row `ku = 0` is the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub ku: usize,
    pub kv: usize,
}

impl GridCoord {
    pub const fn new(ku: usize, kv: usize) -> Self {
        Self { ku, kv }
    }

    /// Offsets this coordinate, returning `None` when it leaves a `n x n` grid.
    pub fn offset(self, du: isize, dv: isize, n: usize) -> Option<Self> {
        let ku = self.ku.checked_add_signed(du)?;
        let kv = self.kv.checked_add_signed(dv)?;
        (ku < n && kv < n).then_some(Self { ku, kv })
    }
}

impl From<(usize, usize)> for GridCoord {
    fn from((ku, kv): (usize, usize)) -> Self {
        Self { ku, kv }
    }
}

/// Deformation mode a spring resists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpringKind {
    /// Direct neighbours along the grid axes (stretch).
    Structural,
    /// Diagonal neighbours (shear).
    Shear,
    /// Neighbours two steps apart along the grid axes (bending).
    Bend,
}

const STRUCTURAL_OFFSETS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const SHEAR_OFFSETS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const BEND_OFFSETS: [(isize, isize); 4] = [(2, 0), (-2, 0), (0, 2), (0, -2)];

impl SpringKind {
    pub const ALL: [SpringKind; 3] = [SpringKind::Structural, SpringKind::Shear, SpringKind::Bend];

    /// Grid offsets to every neighbour connected by this kind of spring.
    pub fn offsets(self) -> &'static [(isize, isize); 4] {
        match self {
            SpringKind::Structural => &STRUCTURAL_OFFSETS,
            SpringKind::Shear => &SHEAR_OFFSETS,
            SpringKind::Bend => &BEND_OFFSETS,
        }
    }

    /// Offsets pointing "forward" only, so that each spring is listed once.
    pub fn forward_offsets(self) -> [(isize, isize); 2] {
        match self {
            SpringKind::Structural => [(1, 0), (0, 1)],
            SpringKind::Shear => [(1, 1), (1, -1)],
            SpringKind::Bend => [(2, 0), (0, 2)],
        }
    }

    /// Rest length in units of the grid spacing.
    pub fn rest_factor(self) -> f32 {
        match self {
            SpringKind::Structural => 1.0,
            SpringKind::Shear => SQRT_2,
            SpringKind::Bend => 2.0,
        }
    }

    /// Number of distinct springs of this kind in a `n x n` grid.
    pub fn count_in_grid(self, n: usize) -> usize {
        match self {
            SpringKind::Structural => 2 * n * n.saturating_sub(1),
            SpringKind::Shear => 2 * n.saturating_sub(1).pow(2),
            SpringKind::Bend => 2 * n * n.saturating_sub(2),
        }
    }
}

/// A single spring between two particles, identified by flat index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    pub a: usize,
    pub b: usize,
    pub rest_length: f32,
    pub kind: SpringKind,
}
