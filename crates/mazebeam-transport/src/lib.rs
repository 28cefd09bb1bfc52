//! Transport layer for mazebeam.
//!
//! Every process talks to every other process through one channel: UDP
//! datagrams on localhost, relayed by the [`PacketReflector`]. This crate
//! owns the byte-level pieces of that:
//!
//! - [`UdpEndpoint`] — a bound socket that sends and receives datagrams
//! - [`PortMap`] — the fixed, well-known port table
//! - [`PacketReflector`] — the single-ingress, multi-egress bus
//!
//! Nothing here interprets the bytes; see `mazebeam-protocol` for that.

mod error;
mod ports;
mod reflector;
mod udp;

pub use error::TransportError;
pub use ports::PortMap;
pub use reflector::PacketReflector;
pub use udp::{Datagram, UdpEndpoint};
