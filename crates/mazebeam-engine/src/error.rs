//! Error types for the engine layer.

use mazebeam_maze::MazeError;
use mazebeam_protocol::GameState;
use mazebeam_transport::TransportError;

/// Errors that can occur while running the maze engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The configured grid can't be generated or broadcast.
    #[error("grid size must be between 1 and {max}, got {size}")]
    InvalidGridSize { size: usize, max: usize },

    /// The state machine was asked to make a transition it doesn't have.
    #[error("invalid state transition from {from} to {to}")]
    InvalidTransition { from: GameState, to: GameState },

    /// Maze generation rejected its parameters.
    #[error(transparent)]
    Maze(#[from] MazeError),

    /// The engine's socket failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
