//! Well-known ports shared by every process on the bus.
//!
//! There is no discovery: each component binds a fixed port on localhost
//! and every sender targets the reflector's ingress port.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde::{Deserialize, Serialize};

/// The port table for one installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortMap {
    /// Interface every socket binds to and every datagram is sent to.
    pub host: IpAddr,
    /// The reflector listens here; all components send here.
    pub ingress: u16,
    /// Graphical console.
    pub console: u16,
    /// Maze engine.
    pub engine: u16,
    /// Sound player.
    pub sound: u16,
    /// Lighting controller.
    pub lighting: u16,
}

impl Default for PortMap {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            ingress: 4444,
            console: 4445,
            engine: 4446,
            sound: 4447,
            lighting: 4448,
        }
    }
}

impl PortMap {
    pub fn addr(&self, port: u16) -> SocketAddr {
        SocketAddr::new(self.host, port)
    }

    pub fn ingress_addr(&self) -> SocketAddr {
        self.addr(self.ingress)
    }

    pub fn engine_addr(&self) -> SocketAddr {
        self.addr(self.engine)
    }

    /// Every port the reflector fans out to, in a stable order.
    pub fn subscriber_addrs(&self) -> Vec<SocketAddr> {
        [self.console, self.engine, self.sound, self.lighting]
            .into_iter()
            .map(|port| self.addr(port))
            .collect()
    }
}
