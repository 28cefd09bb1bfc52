//! Unified error type for mazebeam.

use std::io;
use std::path::PathBuf;

use mazebeam_engine::EngineError;
use mazebeam_maze::MazeError;
use mazebeam_protocol::ProtocolError;
use mazebeam_supervisor::SupervisorError;
use mazebeam_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The executables return this from `main`, so any failure during
/// startup (most often a port that is already taken) exits non-zero.
#[derive(Debug, thiserror::Error)]
pub enum MazebeamError {
    /// A socket error (bind, send, receive).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A wire-format error.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Invalid maze parameters.
    #[error(transparent)]
    Maze(#[from] MazeError),

    /// The game engine failed.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The supervisor failed.
    #[error(transparent)]
    Supervisor(#[from] SupervisorError),

    /// The config file could not be read.
    #[error("cannot read config {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file is not valid JSON for [`InstallationConfig`](crate::InstallationConfig).
    #[error("invalid config {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Any other I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}
