//! The supervisor: keeps every module process running.

use std::collections::HashSet;
use std::future::Future;

use mazebeam_tick::Cadence;
use tracing::{debug, error, info, warn};

use crate::pidfile;
use crate::{
    ModuleSpec, ProcessHandle, ProcessLauncher, SignalKind, SupervisorConfig, SupervisorError,
};

/// What the supervisor knows about one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRecord {
    pub spec: ModuleSpec,
    /// The running process, `None` before the first launch, after a
    /// failed launch, and after shutdown.
    pub handle: Option<ProcessHandle>,
    /// Relaunches after the initial start.
    pub restarts: u32,
}

impl ModuleRecord {
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn pid(&self) -> Option<u32> {
        self.handle.map(|h| h.pid)
    }
}

/// Owns the module table and the launcher.
///
/// Both the monitor loop and the shutdown routine go through `&mut self`,
/// so there is no shared process table to guard.
pub struct Supervisor<L: ProcessLauncher> {
    config: SupervisorConfig,
    launcher: L,
    records: Vec<ModuleRecord>,
}

impl<L: ProcessLauncher> Supervisor<L> {
    /// Builds the module table with the bus module first.
    ///
    /// # Errors
    /// - [`SupervisorError::UnknownBusModule`] if `bus_module` isn't listed
    /// - [`SupervisorError::DuplicateModule`] if two modules share a name
    pub fn new(config: SupervisorConfig, launcher: L) -> Result<Self, SupervisorError> {
        let mut seen = HashSet::new();
        for module in &config.modules {
            if !seen.insert(module.name.as_str()) {
                return Err(SupervisorError::DuplicateModule(module.name.clone()));
            }
        }
        let Some(bus) = config.modules.iter().find(|m| m.name == config.bus_module) else {
            return Err(SupervisorError::UnknownBusModule(config.bus_module.clone()));
        };

        let records = std::iter::once(bus)
            .chain(config.modules.iter().filter(|m| m.name != config.bus_module))
            .map(|spec| ModuleRecord {
                spec: spec.clone(),
                handle: None,
                restarts: 0,
            })
            .collect();

        Ok(Self {
            config,
            launcher,
            records,
        })
    }

    /// Module records in launch order.
    pub fn records(&self) -> &[ModuleRecord] {
        &self.records
    }

    pub fn record(&self, name: &str) -> Option<&ModuleRecord> {
        self.records.iter().find(|r| r.name() == name)
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    /// Launches every module, pausing after the bus so it is listening
    /// before anything starts sending. A module that fails to launch is
    /// logged and retried by the next liveness check.
    pub async fn start_all(&mut self) {
        for index in 0..self.records.len() {
            let name = self.records[index].spec.name.clone();
            info!(module = %name, "launching");
            self.launch(index);

            if name == self.config.bus_module {
                debug!(settle = ?self.config.bus_settle(), "waiting for the bus");
                tokio::time::sleep(self.config.bus_settle()).await;
            }
        }
        info!(modules = self.records.len(), "all modules launched");
    }

    /// Relaunches every module that is not running. Returns the names of
    /// the modules that were relaunched successfully.
    pub fn check_liveness(&mut self) -> Vec<String> {
        let mut restarted = Vec::new();
        for index in 0..self.records.len() {
            let record = &self.records[index];
            let alive = match record.handle {
                Some(handle) => self.launcher.is_alive(&handle),
                None => false,
            };
            if alive {
                continue;
            }

            let name = self.records[index].spec.name.clone();
            match self.records[index].handle.take() {
                Some(dead) => warn!(module = %name, pid = dead.pid, "module died, relaunching"),
                None => warn!(module = %name, "module not running, retrying launch"),
            }
            if self.launch(index) {
                self.records[index].restarts += 1;
                restarted.push(self.records[index].spec.name.clone());
            }
        }
        restarted
    }

    /// Starts every module, checks liveness each poll interval, and shuts
    /// everything down once `shutdown` resolves.
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("shutdown requested during startup");
                self.shutdown().await;
                return;
            }
            _ = self.start_all() => {}
        }

        let mut cadence = Cadence::new(self.config.poll_interval());
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = cadence.wait() => {
                    let restarted = self.check_liveness();
                    if !restarted.is_empty() {
                        info!(?restarted, "modules relaunched");
                    }
                }
            }
        }

        info!("shutdown requested");
        self.shutdown().await;
    }

    /// Stops every module, newest first.
    ///
    /// Each running module gets an interrupt, then is polled every
    /// `shutdown_poll` for up to `shutdown_attempts` polls. Whatever is
    /// still running after that is killed. Returns the names of the
    /// modules that had to be killed.
    pub async fn shutdown(&mut self) -> Vec<String> {
        let mut pending: Vec<usize> = Vec::new();
        for index in (0..self.records.len()).rev() {
            let Some(handle) = self.records[index].handle else {
                continue;
            };
            if !self.launcher.is_alive(&handle) {
                continue;
            }
            info!(module = %self.records[index].name(), pid = handle.pid, "stopping");
            if let Err(e) = self.launcher.signal(&handle, SignalKind::Interrupt) {
                warn!(module = %self.records[index].name(), error = %e, "interrupt failed");
            }
            pending.push(index);
        }

        for _ in 0..self.config.shutdown_attempts {
            if pending.is_empty() {
                break;
            }
            tokio::time::sleep(self.config.shutdown_poll()).await;
            pending.retain(|&index| {
                self.records[index]
                    .handle
                    .is_some_and(|handle| self.launcher.is_alive(&handle))
            });
        }

        let mut killed = Vec::new();
        for &index in &pending {
            let Some(handle) = self.records[index].handle else {
                continue;
            };
            let name = self.records[index].name();
            warn!(module = %name, pid = handle.pid, "module ignored interrupt, killing");
            if let Err(e) = self.launcher.signal(&handle, SignalKind::Kill) {
                error!(module = %name, error = %e, "kill failed");
            }
            killed.push(self.records[index].spec.name.clone());
        }
        if !killed.is_empty() {
            tokio::time::sleep(self.config.force_kill_delay()).await;
            for &index in &pending {
                if let Some(handle) = self.records[index].handle {
                    if self.launcher.is_alive(&handle) {
                        error!(
                            module = %self.records[index].name(),
                            pid = handle.pid,
                            "module survived kill"
                        );
                    }
                }
            }
        }

        for record in &mut self.records {
            record.handle = None;
            if let Err(e) = pidfile::remove_pid(&self.config.run_dir, &record.spec.name) {
                warn!(module = %record.spec.name, error = %e, "could not remove pid file");
            }
        }
        info!(killed = killed.len(), "all modules stopped");
        killed
    }

    /// Launches one module and records it. Returns whether it started.
    fn launch(&mut self, index: usize) -> bool {
        let record = &mut self.records[index];
        match self.launcher.launch(&record.spec) {
            Ok(handle) => {
                info!(module = %record.spec.name, pid = handle.pid, "module running");
                record.handle = Some(handle);
                let run_dir = &self.config.run_dir;
                if let Err(e) = pidfile::write_pid(run_dir, &record.spec.name, handle.pid) {
                    warn!(module = %record.spec.name, error = %e, "could not write pid file");
                }
                true
            }
            Err(e) => {
                error!(module = %record.spec.name, error = %e, "launch failed");
                record.handle = None;
                false
            }
        }
    }
}
