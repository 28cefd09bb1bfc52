//! Stands in for the beam hardware: breaks one beam, then restores it.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use mazebeam::{init_logging, ConfigArgs, MazebeamError};
use mazebeam_protocol::{BeamEvent, Codec, Message, Orientation, TextCodec};
use mazebeam_transport::UdpEndpoint;

#[derive(Clone, Copy, ValueEnum)]
enum Axis {
    /// Horizontal beam.
    H,
    /// Vertical beam.
    V,
}

impl From<Axis> for Orientation {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::H => Orientation::Horizontal,
            Axis::V => Orientation::Vertical,
        }
    }
}

/// Send a beam break followed by a beam make to the bus.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Beam orientation.
    #[arg(value_enum)]
    axis: Axis,

    /// Beam column.
    x: i32,

    /// Beam row.
    y: i32,

    /// How long the beam stays broken, in milliseconds.
    #[arg(long, default_value_t = 500)]
    hold_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), MazebeamError> {
    let cli = Cli::parse();
    let config = cli.config.load()?;
    init_logging(&config.log_filter);

    let orientation = Orientation::from(cli.axis);
    let ingress = config.ports.ingress_addr();
    let endpoint = UdpEndpoint::ephemeral().await?;
    let codec = TextCodec;

    let broken = Message::Beam(BeamEvent::broken(orientation, cli.x, cli.y));
    endpoint.send_to(&codec.encode(&broken), ingress).await?;
    tracing::info!(%ingress, "sent {broken}");

    tokio::time::sleep(Duration::from_millis(cli.hold_ms)).await;

    let made = Message::Beam(BeamEvent::made(orientation, cli.x, cli.y));
    endpoint.send_to(&codec.encode(&made), ingress).await?;
    tracing::info!(%ingress, "sent {made}");
    Ok(())
}
