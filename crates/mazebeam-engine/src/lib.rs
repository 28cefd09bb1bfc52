//! The maze game engine for mazebeam.
//!
//! Listens on the engine's bus port for beam events, runs the game state
//! machine, and broadcasts state, maze, sound, and player-location
//! messages back through the bus.
//!
//! # Key types
//!
//! - [`MazeEngine`] — the state machine (pure, no I/O)
//! - [`EngineDriver`] — the polling receive loop around it
//! - [`PlayerLocation`] — inferred player cell
//! - [`EngineConfig`] — grid size, cadence, and cue timings

mod config;
mod driver;
mod engine;
mod error;
mod location;

pub use config::EngineConfig;
pub use driver::EngineDriver;
pub use engine::{
    cue, is_valid_transition, perimeter_cell, round_start, MazeEngine, Outbound,
};
pub use error::EngineError;
pub use location::PlayerLocation;
