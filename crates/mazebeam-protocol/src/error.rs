//! Error types for the protocol layer.
//!
//! Each crate in mazebeam defines its own error enum. A `ProtocolError`
//! always means a datagram could not be turned into a [`Message`].
//! Receive loops log these at debug level and drop the datagram: UDP has
//! no sender to notify, so availability wins over strictness.
//!
//! [`Message`]: crate::Message

/// Errors that can occur while decoding a datagram.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The datagram contained no tokens at all.
    #[error("empty datagram")]
    Empty,

    /// The leading token is not a known message type.
    ///
    /// Newer peers may speak message types we don't know yet, so this
    /// is expected traffic rather than a fault.
    #[error("unknown message type: {0}")]
    UnknownType(String),

    /// The message type is known but a field could not be interpreted
    /// (e.g., a state name that isn't a game state).
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
