//! The process-launching capability the supervisor is built on.
//!
//! The supervisor never touches the OS directly. It asks a
//! [`ProcessLauncher`] to start, probe, and signal processes, so its
//! restart and shutdown logic can run against a fake in tests.

use std::fmt;

use crate::{ModuleSpec, SupervisorError};

/// Signals the supervisor sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// Polite stop request (`SIGINT`).
    Interrupt,
    /// Forced stop (`SIGKILL`).
    Kill,
}

/// A launched process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessHandle {
    pub pid: u32,
}

impl fmt::Display for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pid)
    }
}

/// Starts, probes, and signals module processes.
///
/// Methods take `&mut self` so implementations can keep per-child state
/// (such as an owned `Child` to reap).
pub trait ProcessLauncher {
    /// Starts the module as a detached process.
    fn launch(&mut self, module: &ModuleSpec) -> Result<ProcessHandle, SupervisorError>;

    /// Whether the process is still running. Reaps it if it has exited.
    fn is_alive(&mut self, handle: &ProcessHandle) -> bool;

    /// Delivers a signal. Signalling a process that is already gone is
    /// not an error.
    fn signal(&mut self, handle: &ProcessHandle, kind: SignalKind)
        -> Result<(), SupervisorError>;
}

#[cfg(unix)]
pub use os::OsLauncher;

#[cfg(unix)]
mod os {
    use std::collections::HashMap;
    use std::io;
    use std::os::unix::process::CommandExt;
    use std::path::{Path, PathBuf};
    use std::process::{Child, Command, Stdio};

    use super::{ProcessHandle, ProcessLauncher, SignalKind};
    use crate::{ModuleSpec, SupervisorError};

    /// Launches real processes with `std::process` and signals them with
    /// `kill(2)`.
    ///
    /// Children are put in their own process group so a Ctrl-C on the
    /// supervisor's terminal reaches only the supervisor, which then shuts
    /// the modules down in order.
    #[derive(Debug, Default)]
    pub struct OsLauncher {
        bin_dir: Option<PathBuf>,
        envs: Vec<(String, String)>,
        children: HashMap<u32, Child>,
    }

    impl OsLauncher {
        pub fn new() -> Self {
            Self::default()
        }

        /// Looks for bare program names in `dir` before falling back to
        /// `PATH`.
        pub fn with_bin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
            self.bin_dir = Some(dir.into());
            self
        }

        /// Sets an environment variable for every launched module.
        pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
            self.envs.push((key.into(), value.into()));
            self
        }

        fn resolve(&self, program: &Path) -> PathBuf {
            if let Some(dir) = &self.bin_dir {
                if program.components().count() == 1 {
                    let candidate = dir.join(program);
                    if candidate.is_file() {
                        return candidate;
                    }
                }
            }
            program.to_path_buf()
        }
    }

    fn to_pid(handle: &ProcessHandle) -> Result<libc::pid_t, SupervisorError> {
        libc::pid_t::try_from(handle.pid).map_err(|_| SupervisorError::Signal {
            pid: handle.pid,
            source: io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"),
        })
    }

    /// Liveness of a process this launcher does not own, via signal 0.
    fn probe(handle: &ProcessHandle) -> bool {
        let Ok(pid) = to_pid(handle) else {
            return false;
        };
        // SAFETY: kill(2) with signal 0 only checks the pid; it has no
        // memory-safety preconditions.
        unsafe { libc::kill(pid, 0) == 0 }
    }

    impl ProcessLauncher for OsLauncher {
        fn launch(&mut self, module: &ModuleSpec) -> Result<ProcessHandle, SupervisorError> {
            let program = self.resolve(&module.program);
            let child = Command::new(&program)
                .args(&module.args)
                .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .stdin(Stdio::null())
                .process_group(0)
                .spawn()
                .map_err(|source| SupervisorError::Launch {
                    module: module.name.clone(),
                    source,
                })?;

            let pid = child.id();
            tracing::debug!(module = %module.name, pid, program = %program.display(), "spawned");
            self.children.insert(pid, child);
            Ok(ProcessHandle { pid })
        }

        fn is_alive(&mut self, handle: &ProcessHandle) -> bool {
            let Some(child) = self.children.get_mut(&handle.pid) else {
                return probe(handle);
            };
            match child.try_wait() {
                Ok(None) => true,
                Ok(Some(status)) => {
                    tracing::debug!(pid = handle.pid, %status, "child exited");
                    self.children.remove(&handle.pid);
                    false
                }
                Err(e) => {
                    // The child can no longer be waited on; stop tracking it
                    // and fall back to probing the pid.
                    tracing::warn!(pid = handle.pid, error = %e, "could not poll child");
                    self.children.remove(&handle.pid);
                    probe(handle)
                }
            }
        }

        fn signal(
            &mut self,
            handle: &ProcessHandle,
            kind: SignalKind,
        ) -> Result<(), SupervisorError> {
            let signal = match kind {
                SignalKind::Interrupt => libc::SIGINT,
                SignalKind::Kill => libc::SIGKILL,
            };
            let pid = to_pid(handle)?;
            // SAFETY: kill(2) has no memory-safety preconditions.
            if unsafe { libc::kill(pid, signal) } == 0 {
                return Ok(());
            }
            let err = io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::ESRCH) {
                return Ok(());
            }
            Err(SupervisorError::Signal {
                pid: handle.pid,
                source: err,
            })
        }
    }
}
