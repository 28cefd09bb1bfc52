//! Wire protocol for mazebeam.
//!
//! This crate defines the "language" every process on the bus speaks:
//!
//! - **Types** ([`Message`], [`WallState`], [`GameState`], etc.) — the
//!   message structures that travel in UDP datagrams.
//! - **Codec** ([`Codec`] trait, [`TextCodec`]) — how those messages are
//!   converted to and from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between the transport (raw datagrams) and the
//! components that act on messages. It knows nothing about sockets or
//! game rules.
//!
//! ```text
//! Transport (bytes) → Protocol (Message) → Engine / peripherals
//! ```

mod codec;
mod error;
mod types;

pub use codec::{tokenize, Codec, TextCodec};
pub use error::ProtocolError;
pub use types::{
    BeamAction, BeamEvent, GameState, LightNode, MazeSnapshot, Message,
    Orientation, WallState, MAX_GRID_SIZE,
};
