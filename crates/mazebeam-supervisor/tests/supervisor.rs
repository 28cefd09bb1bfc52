//! Supervisor behavior against a fake launcher and a paused clock.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use mazebeam_supervisor::{
    read_pid, ModuleSpec, ProcessHandle, ProcessLauncher, SignalKind, Supervisor,
    SupervisorConfig, SupervisorError,
};
use tokio::sync::oneshot;
use tokio::time::Instant;

// =========================================================================
// Fake launcher
// =========================================================================

#[derive(Default)]
struct FakeState {
    next_pid: u32,
    /// Running pids and the module each belongs to.
    alive: HashMap<u32, String>,
    launches: Vec<(String, u32, Instant)>,
    signals: Vec<(u32, SignalKind)>,
    /// Modules that ignore interrupts.
    stubborn: HashSet<String>,
    /// Modules whose launch fails.
    broken: HashSet<String>,
}

#[derive(Clone, Default)]
struct FakeLauncher(Arc<Mutex<FakeState>>);

impl FakeLauncher {
    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.0.lock().unwrap()
    }

    /// Kills a process behind the supervisor's back.
    fn crash(&self, pid: u32) {
        self.state().alive.remove(&pid);
    }

    fn pids_of(&self, module: &str) -> Vec<u32> {
        self.state()
            .launches
            .iter()
            .filter(|(name, _, _)| name == module)
            .map(|(_, pid, _)| *pid)
            .collect()
    }

    fn launch_order(&self) -> Vec<String> {
        self.state().launches.iter().map(|(name, _, _)| name.clone()).collect()
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&mut self, module: &ModuleSpec) -> Result<ProcessHandle, SupervisorError> {
        let mut state = self.state();
        if state.broken.contains(&module.name) {
            return Err(SupervisorError::Launch {
                module: module.name.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such program"),
            });
        }
        state.next_pid += 1;
        let pid = 1000 + state.next_pid;
        state.alive.insert(pid, module.name.clone());
        state.launches.push((module.name.clone(), pid, Instant::now()));
        Ok(ProcessHandle { pid })
    }

    fn is_alive(&mut self, handle: &ProcessHandle) -> bool {
        self.state().alive.contains_key(&handle.pid)
    }

    fn signal(&mut self, handle: &ProcessHandle, kind: SignalKind) -> Result<(), SupervisorError> {
        let mut state = self.state();
        state.signals.push((handle.pid, kind));
        let exits = match kind {
            SignalKind::Kill => true,
            SignalKind::Interrupt => state
                .alive
                .get(&handle.pid)
                .is_some_and(|name| !state.stubborn.contains(name)),
        };
        if exits {
            state.alive.remove(&handle.pid);
        }
        Ok(())
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn run_dir(test: &str) -> PathBuf {
    std::env::temp_dir().join(format!("mazebeam-supervisor-{}-{test}", std::process::id()))
}

fn config(test: &str, modules: &[&str]) -> SupervisorConfig {
    SupervisorConfig {
        modules: modules.iter().map(|name| ModuleSpec::named(name)).collect(),
        run_dir: run_dir(test),
        ..SupervisorConfig::default()
    }
}

fn supervisor(test: &str, modules: &[&str]) -> (Supervisor<FakeLauncher>, FakeLauncher) {
    let launcher = FakeLauncher::default();
    let sup = Supervisor::new(config(test, modules), launcher.clone()).unwrap();
    (sup, launcher)
}

// =========================================================================
// Construction
// =========================================================================

#[test]
fn test_bus_module_must_be_listed() {
    let err = Supervisor::new(
        config("no-bus", &["engine", "sound"]),
        FakeLauncher::default(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, SupervisorError::UnknownBusModule(name) if name == "bus"));
}

#[test]
fn test_duplicate_modules_are_rejected() {
    let err = Supervisor::new(
        config("dup", &["bus", "engine", "engine"]),
        FakeLauncher::default(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, SupervisorError::DuplicateModule(name) if name == "engine"));
}

// =========================================================================
// Startup
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_bus_launches_first_and_settles() {
    let (mut sup, launcher) = supervisor("startup", &["engine", "bus", "sound"]);
    sup.start_all().await;

    assert_eq!(launcher.launch_order(), ["bus", "engine", "sound"]);
    {
        let state = launcher.state();
        let times: Vec<Instant> = state.launches.iter().map(|(_, _, t)| *t).collect();
        assert_eq!(times[1] - times[0], Duration::from_secs(1));
        assert_eq!(times[2], times[1]);
    }

    for record in sup.records() {
        let pid = record.pid().expect("every module should be running");
        assert_eq!(read_pid(&run_dir("startup"), record.name()), Some(pid));
        assert_eq!(record.restarts, 0);
    }
    sup.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_launch_is_retried() {
    let (mut sup, launcher) = supervisor("retry", &["bus", "engine"]);
    launcher.state().broken.insert("engine".to_owned());

    sup.start_all().await;
    assert_eq!(sup.record("engine").unwrap().pid(), None);
    assert!(sup.record("bus").unwrap().pid().is_some());

    assert!(sup.check_liveness().is_empty());

    launcher.state().broken.clear();
    assert_eq!(sup.check_liveness(), ["engine"]);
    let engine = sup.record("engine").unwrap();
    assert_eq!(engine.pid(), Some(launcher.pids_of("engine")[0]));
    assert_eq!(engine.restarts, 1);
    sup.shutdown().await;
}

// =========================================================================
// Monitoring
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_dead_module_is_relaunched_within_one_interval() {
    let (mut sup, launcher) = supervisor("respawn", &["bus", "engine"]);
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        sup.run(async {
            let _ = stop_rx.await;
        })
        .await;
        sup
    });

    // Startup finishes after the 1s bus settle.
    tokio::time::sleep(Duration::from_millis(1500)).await;
    let first = launcher.pids_of("engine");
    assert_eq!(first.len(), 1);
    launcher.crash(first[0]);

    tokio::time::sleep(Duration::from_secs(1)).await;
    let pids = launcher.pids_of("engine");
    assert_eq!(pids.len(), 2, "engine should be relaunched");
    assert_ne!(pids[1], first[0]);
    assert_eq!(read_pid(&run_dir("respawn"), "engine"), Some(pids[1]));
    assert_eq!(launcher.pids_of("bus").len(), 1, "bus was never restarted");

    stop_tx.send(()).unwrap();
    let sup = task.await.unwrap();
    assert_eq!(sup.record("engine").unwrap().restarts, 1);
    assert_eq!(sup.record("bus").unwrap().restarts, 0);
}

#[tokio::test(start_paused = true)]
async fn test_healthy_modules_are_left_alone() {
    let (mut sup, launcher) = supervisor("healthy", &["bus", "engine"]);
    sup.start_all().await;
    for _ in 0..5 {
        assert!(sup.check_liveness().is_empty());
    }
    assert_eq!(launcher.state().launches.len(), 2);
    sup.shutdown().await;
}

// =========================================================================
// Shutdown
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_graceful_shutdown_interrupts_newest_first() {
    let (mut sup, launcher) = supervisor("graceful", &["bus", "engine"]);
    sup.start_all().await;
    let bus = launcher.pids_of("bus")[0];
    let engine = launcher.pids_of("engine")[0];

    let started = Instant::now();
    let killed = sup.shutdown().await;

    assert!(killed.is_empty());
    assert_eq!(started.elapsed(), Duration::from_millis(100));
    assert_eq!(
        launcher.state().signals,
        [(engine, SignalKind::Interrupt), (bus, SignalKind::Interrupt)]
    );
    assert!(launcher.state().alive.is_empty());
    assert!(sup.records().iter().all(|r| r.pid().is_none()));
    assert_eq!(read_pid(&run_dir("graceful"), "bus"), None);
    assert_eq!(read_pid(&run_dir("graceful"), "engine"), None);
}

#[tokio::test(start_paused = true)]
async fn test_stubborn_module_is_killed_within_bound() {
    let (mut sup, launcher) = supervisor("stubborn", &["bus", "engine"]);
    launcher.state().stubborn.insert("engine".to_owned());
    sup.start_all().await;
    let engine = launcher.pids_of("engine")[0];

    let started = Instant::now();
    let killed = sup.shutdown().await;

    assert_eq!(killed, ["engine"]);
    assert_eq!(started.elapsed(), sup.config().shutdown_bound());
    assert!(launcher.state().signals.contains(&(engine, SignalKind::Kill)));
    assert!(launcher.state().alive.is_empty(), "no orphans");
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_before_startup_launches_nothing() {
    let (mut sup, launcher) = supervisor("early-stop", &["bus", "engine"]);
    sup.run(async {}).await;
    assert!(launcher.state().launches.is_empty());
}
