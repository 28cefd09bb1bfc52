//! Process supervision for mazebeam.
//!
//! Every component runs as its own process. The supervisor launches them
//! (bus first), writes their pid files, relaunches any that die, and on
//! shutdown stops them politely before resorting to `SIGKILL`.
//!
//! # Key types
//!
//! - [`Supervisor`] — owns the module table and runs the monitor loop
//! - [`ProcessLauncher`] — start/probe/signal capability; [`OsLauncher`]
//!   is the real one
//! - [`ModuleSpec`] / [`SupervisorConfig`] — what to run and how often to
//!   check on it

mod config;
mod error;
mod launcher;
mod pidfile;
mod supervisor;

pub use config::{ModuleSpec, SupervisorConfig};
pub use error::SupervisorError;
#[cfg(unix)]
pub use launcher::OsLauncher;
pub use launcher::{ProcessHandle, ProcessLauncher, SignalKind};
pub use pidfile::{pid_file_path, read_pid, remove_pid, write_pid};
pub use supervisor::{ModuleRecord, Supervisor};
