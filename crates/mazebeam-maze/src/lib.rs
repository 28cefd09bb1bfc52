//! Maze generation for mazebeam.
//!
//! A maze is a rectangular grid of cells whose walls are light beams. The
//! generator carves a perfect maze (a spanning tree: exactly one path
//! between any two cells) with a randomized depth-first backtracker, then
//! tags one perimeter wall as the entry and the mirrored wall on the
//! opposite side as the exit.
//!
//! # Key types
//!
//! - [`Maze`] — the wall arrays plus start/end cells
//! - [`MazeBuilder`] — generation options (start cell, entry edge, seed)
//! - [`Cell`] / [`Edge`] — grid coordinates and perimeter sides
//! - [`MazeError`] — invalid construction parameters

mod error;
mod grid;
mod maze;

pub use error::MazeError;
pub use grid::{Cell, Edge};
pub use maze::{Maze, MazeBuilder};
