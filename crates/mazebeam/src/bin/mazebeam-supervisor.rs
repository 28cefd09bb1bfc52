//! Launches every module, restarts the ones that die, and stops them all
//! on Ctrl-C or `SIGTERM`.

use std::path::PathBuf;

use clap::Parser;
use mazebeam::{
    init_logging, shutdown_signal, ConfigArgs, InstallationConfig, MazebeamError, PidFile,
    CONFIG_ENV,
};
use mazebeam_supervisor::{OsLauncher, Supervisor};
use tracing::Instrument;

/// Mazebeam process supervisor.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Directory holding the module executables. Defaults to the
    /// directory this binary lives in.
    #[arg(long, value_name = "DIR")]
    bin_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), MazebeamError> {
    let cli = Cli::parse();
    let config = cli.config.load()?;
    init_logging(&config.log_filter);

    let bin_dir = match cli.bin_dir {
        Some(dir) => Some(dir),
        None => std::env::current_exe()?.parent().map(PathBuf::from),
    };
    let mut launcher = OsLauncher::new();
    if let Some(dir) = bin_dir {
        launcher = launcher.with_bin_dir(dir);
    }
    // Modules read the same config file as the supervisor.
    if let Some(path) = InstallationConfig::resolve_path(cli.config.config.as_deref()) {
        let path = std::fs::canonicalize(&path).unwrap_or(path);
        launcher = launcher.with_env(CONFIG_ENV, path.to_string_lossy());
    }

    async move {
        let _pid = PidFile::create(&config.supervisor.run_dir, "supervisor")?;
        let mut supervisor = Supervisor::new(config.supervisor, launcher)?;
        supervisor.run(shutdown_signal()).await;
        tracing::info!("all modules shut down");
        Ok::<(), MazebeamError>(())
    }
    .instrument(tracing::info_span!("supervisor"))
    .await
}
