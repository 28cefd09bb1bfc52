//! The packet reflector: relays every datagram sent to the ingress port
//! to every subscriber port.

use clap::Parser;
use mazebeam::{init_logging, shutdown_signal, ConfigArgs, MazebeamError, PidFile};
use mazebeam_transport::PacketReflector;
use tracing::Instrument;

/// Mazebeam message bus.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,
}

#[tokio::main]
async fn main() -> Result<(), MazebeamError> {
    let cli = Cli::parse();
    let config = cli.config.load()?;
    init_logging(&config.log_filter);

    async move {
        let _pid = PidFile::create(&config.supervisor.run_dir, "bus")?;
        let reflector = PacketReflector::from_ports(&config.ports).await?;
        let reflected = reflector.run(shutdown_signal()).await?;
        tracing::info!(reflected, "bus stopped");
        Ok::<(), MazebeamError>(())
    }
    .instrument(tracing::info_span!("bus"))
    .await
}
