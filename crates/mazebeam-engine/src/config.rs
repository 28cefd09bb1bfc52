//! Engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Settings for the maze engine.
///
/// Durations are stored as milliseconds so the config file stays plain
/// numbers; use the accessor methods to get a [`Duration`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cells per side of the (square) maze.
    pub grid_size: usize,

    /// How often the receive loop drains its socket.
    pub poll_interval_ms: u64,

    /// Hold after the "round starting" cue, before generation begins.
    pub start_cue_hold_ms: u64,

    /// Hold after the "generating" cue, before the maze is revealed.
    pub generate_cue_hold_ms: u64,

    /// Source name stamped on every `event` message the engine emits.
    pub event_source: String,

    /// Fixed seed for reproducible mazes. `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_size: 4,
            poll_interval_ms: 500,
            start_cue_hold_ms: 2250,
            generate_cue_hold_ms: 4750,
            event_source: "maze-driver".to_owned(),
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn start_cue_hold(&self) -> Duration {
        Duration::from_millis(self.start_cue_hold_ms)
    }

    pub fn generate_cue_hold(&self) -> Duration {
        Duration::from_millis(self.generate_cue_hold_ms)
    }
}
