//! Supervisor configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One module the supervisor keeps running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSpec {
    /// Short name, used in logs and the pid file name.
    pub name: String,
    /// Executable to run. A bare name is looked up next to the
    /// supervisor's own binary first, then on `PATH`.
    pub program: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ModuleSpec {
    /// A module whose program is `mazebeam-<name>`.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            program: PathBuf::from(format!("mazebeam-{name}")),
            args: Vec::new(),
        }
    }
}

/// Settings for the process supervisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Modules in launch order. The bus module always goes first.
    pub modules: Vec<ModuleSpec>,

    /// Name of the module every other module depends on.
    pub bus_module: String,

    /// Pause after launching the bus before launching anything else.
    pub bus_settle_ms: u64,

    /// How often module liveness is checked.
    pub poll_interval_ms: u64,

    /// How often an exiting module is polled during shutdown.
    pub shutdown_poll_ms: u64,

    /// Polls to wait for a graceful exit before force-killing.
    pub shutdown_attempts: u32,

    /// Pause after force-killing stragglers, before reaping them.
    pub force_kill_delay_ms: u64,

    /// Directory holding the pid files.
    pub run_dir: PathBuf,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            modules: vec![ModuleSpec::named("bus"), ModuleSpec::named("engine")],
            bus_module: "bus".to_owned(),
            bus_settle_ms: 1000,
            poll_interval_ms: 1000,
            shutdown_poll_ms: 100,
            shutdown_attempts: 30,
            force_kill_delay_ms: 500,
            run_dir: PathBuf::from("run"),
        }
    }
}

impl SupervisorConfig {
    pub fn bus_settle(&self) -> Duration {
        Duration::from_millis(self.bus_settle_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn shutdown_poll(&self) -> Duration {
        Duration::from_millis(self.shutdown_poll_ms)
    }

    pub fn force_kill_delay(&self) -> Duration {
        Duration::from_millis(self.force_kill_delay_ms)
    }

    /// Longest a shutdown can take: every graceful poll, then the
    /// force-kill pause.
    pub fn shutdown_bound(&self) -> Duration {
        self.shutdown_poll() * self.shutdown_attempts + self.force_kill_delay()
    }
}
