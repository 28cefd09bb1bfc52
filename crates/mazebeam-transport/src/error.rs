use std::net::SocketAddr;

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Binding the local socket failed. Fatal at module startup: a module
    /// cannot do its job without its port.
    #[error("bind to {addr} failed: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Sending a datagram failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving a datagram failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),
}

impl TransportError {
    /// Whether the error is a stale ICMP report from an earlier send
    /// rather than a broken socket. Receive loops keep going on these.
    pub fn is_transient(&self) -> bool {
        use std::io::ErrorKind;
        match self {
            Self::SendFailed(e) | Self::ReceiveFailed(e) => matches!(
                e.kind(),
                ErrorKind::ConnectionRefused
                    | ErrorKind::ConnectionReset
                    | ErrorKind::Interrupted
            ),
            Self::BindFailed { .. } => false,
        }
    }
}
