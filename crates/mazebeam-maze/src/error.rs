//! Error types for maze construction.

use crate::Edge;

/// Errors that can occur while building a maze.
///
/// All of these are contract violations by the caller: legitimate game
/// flow never asks for a maze that can't exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    /// Width or height is zero.
    #[error("maze dimensions must be non-zero, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    /// The start cell lies outside the grid.
    #[error("start {x}.{y} is outside a {width}x{height} grid")]
    StartOffGrid {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// The start cell is inside the grid but touches no perimeter edge.
    #[error("start {x}.{y} is not on the grid boundary")]
    StartNotOnBoundary { x: usize, y: usize },

    /// An entry edge was requested that the start cell doesn't touch.
    #[error("start {x}.{y} does not lie on the {edge} edge")]
    EdgeMismatch { x: usize, y: usize, edge: Edge },

    /// The wire format only carries square mazes.
    #[error("only square mazes can be broadcast, got {width}x{height}")]
    NotSquare { width: usize, height: usize },
}
