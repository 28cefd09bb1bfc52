//! Grid coordinates and perimeter edges.

use std::fmt;

/// A cell coordinate, 0-indexed from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.x, self.y)
    }
}

/// One side of the grid's outer boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// Inference order when a corner cell touches two edges. Entries are
    /// biased towards the top row.
    pub const PRIORITY: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    pub fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Whether `cell` sits against this edge of a `width × height` grid.
    pub fn touches(self, cell: Cell, width: usize, height: usize) -> bool {
        match self {
            Self::Top => cell.y == 0,
            Self::Bottom => cell.y + 1 == height,
            Self::Left => cell.x == 0,
            Self::Right => cell.x + 1 == width,
        }
    }

    /// The first edge in [`PRIORITY`](Self::PRIORITY) order that `cell`
    /// touches, or `None` for interior cells.
    pub fn infer(cell: Cell, width: usize, height: usize) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|edge| edge.touches(cell, width, height))
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(name)
    }
}
