//! The maze game engine.

use clap::Parser;
use mazebeam::{init_logging, shutdown_signal, ConfigArgs, MazebeamError, PidFile};
use mazebeam_engine::EngineDriver;
use tracing::Instrument;

/// Mazebeam game engine: turns beam breaks into maze game state.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Cells per side, overriding the config file.
    #[arg(long)]
    grid_size: Option<usize>,

    /// Fixed maze seed, overriding the config file.
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), MazebeamError> {
    let cli = Cli::parse();
    let mut config = cli.config.load()?;
    init_logging(&config.log_filter);

    if let Some(grid_size) = cli.grid_size {
        config.engine.grid_size = grid_size;
    }
    if cli.seed.is_some() {
        config.engine.seed = cli.seed;
    }

    async move {
        let _pid = PidFile::create(&config.supervisor.run_dir, "engine")?;
        let driver = EngineDriver::bind(config.engine, &config.ports).await?;
        let engine = driver.run(shutdown_signal()).await?;
        tracing::info!(state = %engine.state(), "engine stopped");
        Ok::<(), MazebeamError>(())
    }
    .instrument(tracing::info_span!("engine"))
    .await
}
