//! UDP endpoint built on `tokio::net::UdpSocket`.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::net::UdpSocket;

use crate::TransportError;

/// Maximum UDP payload size.
const MAX_DATAGRAM: usize = 65_535;

/// One received datagram and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    pub data: Vec<u8>,
    pub from: SocketAddr,
}

/// A bound UDP socket that moves raw datagrams.
///
/// All methods take `&self`, so one endpoint can be shared between a
/// receive loop and whatever sends replies.
#[derive(Debug)]
pub struct UdpEndpoint {
    socket: UdpSocket,
    local_addr: SocketAddr,
}

impl UdpEndpoint {
    /// Binds a new endpoint to `addr`.
    ///
    /// Passing port `0` lets the OS choose an ephemeral port; read it back
    /// with [`local_addr`](Self::local_addr).
    pub async fn bind(addr: SocketAddr) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| TransportError::BindFailed { addr, source })?;
        let local_addr = socket
            .local_addr()
            .map_err(|source| TransportError::BindFailed { addr, source })?;
        tracing::debug!(%local_addr, "udp endpoint bound");
        Ok(Self { socket, local_addr })
    }

    /// Binds a send-only endpoint on an ephemeral localhost port.
    pub async fn ephemeral() -> Result<Self, TransportError> {
        Self::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).await
    }

    /// The address this endpoint is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Sends `data` as a single datagram to `target`.
    pub async fn send_to(
        &self,
        data: &[u8],
        target: SocketAddr,
    ) -> Result<(), TransportError> {
        self.socket
            .send_to(data, target)
            .await
            .map_err(TransportError::SendFailed)?;
        Ok(())
    }

    /// Waits for the next datagram.
    pub async fn recv(&self) -> Result<Datagram, TransportError> {
        let mut buf = vec![0u8; MAX_DATAGRAM];
        let (len, from) = self
            .socket
            .recv_from(&mut buf)
            .await
            .map_err(TransportError::ReceiveFailed)?;
        buf.truncate(len);
        Ok(Datagram { data: buf, from })
    }

    /// Returns the next queued datagram without waiting, or `None` when
    /// the receive queue is empty.
    pub fn try_recv(&self) -> Result<Option<Datagram>, TransportError> {
        let mut buf = vec![0u8; MAX_DATAGRAM];
        match self.socket.try_recv_from(&mut buf) {
            Ok((len, from)) => {
                buf.truncate(len);
                Ok(Some(Datagram { data: buf, from }))
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(TransportError::ReceiveFailed(e)),
        }
    }

    /// Waits up to `timeout` for the next datagram.
    pub async fn recv_timeout(
        &self,
        timeout: Duration,
    ) -> Result<Option<Datagram>, TransportError> {
        match tokio::time::timeout(timeout, self.recv()).await {
            Ok(result) => result.map(Some),
            Err(_elapsed) => Ok(None),
        }
    }
}
