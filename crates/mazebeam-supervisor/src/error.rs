//! Error types for the supervisor.

use std::io;
use std::path::PathBuf;

/// Errors that can occur while supervising module processes.
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    /// The module's program could not be started.
    #[error("failed to launch module {module}")]
    Launch {
        module: String,
        #[source]
        source: io::Error,
    },

    /// Delivering a signal to a running process failed.
    #[error("failed to signal process {pid}")]
    Signal {
        pid: u32,
        #[source]
        source: io::Error,
    },

    /// A pid file or the run directory could not be written or removed.
    #[error("pid file {}", path.display())]
    PidFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configured bus module is not in the module list.
    #[error("bus module {0:?} is not in the module list")]
    UnknownBusModule(String),

    /// Two modules share a name, so their records and pid files collide.
    #[error("module {0:?} is listed more than once")]
    DuplicateModule(String),
}
