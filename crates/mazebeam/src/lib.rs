//! # Mazebeam
//!
//! Software for an invisible maze: a grid of light beams forms the walls,
//! players walk through them, and the game reacts with light and sound.
//!
//! Each component is its own process and they talk only through UDP
//! datagrams relayed by a packet reflector. This crate ties the layers
//! together and ships the executables:
//!
//! - `mazebeam-bus` — the packet reflector
//! - `mazebeam-engine` — the maze game engine
//! - `mazebeam-supervisor` — launches and restarts the other modules
//! - `mazebeam-beam-emu` — sends a single beam break by hand
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mazebeam::prelude::*;
//!
//! # async fn run() -> Result<(), MazebeamError> {
//! let config = InstallationConfig::load(None)?;
//! let driver = EngineDriver::bind(config.engine, &config.ports).await?;
//! driver.run(shutdown_signal()).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod logging;
mod pidfile;
mod shutdown;

pub use config::{ConfigArgs, InstallationConfig, CONFIG_ENV};
pub use error::MazebeamError;
pub use logging::init as init_logging;
pub use pidfile::PidFile;
pub use shutdown::shutdown_signal;

/// The types most programs need.
pub mod prelude {
    pub use crate::{init_logging, shutdown_signal, InstallationConfig, MazebeamError, PidFile};
    pub use mazebeam_engine::{EngineConfig, EngineDriver, MazeEngine};
    pub use mazebeam_maze::{Maze, MazeBuilder};
    pub use mazebeam_protocol::{BeamEvent, Codec, GameState, Message, Orientation, TextCodec};
    pub use mazebeam_supervisor::{Supervisor, SupervisorConfig};
    pub use mazebeam_tick::Cadence;
    pub use mazebeam_transport::{PacketReflector, PortMap, UdpEndpoint};
}
