//! The packet reflector: the bus every component shares.
//!
//! Several processes can't reliably listen on one UDP port, so instead
//! every sender targets a single ingress port and the reflector copies each
//! datagram, byte for byte, to a fixed list of subscriber ports. There is
//! no filtering, no rewriting, no deduplication, and no ordering beyond
//! what the kernel delivers.

use std::future::Future;
use std::net::SocketAddr;

use crate::{PortMap, TransportError, UdpEndpoint};

/// Single-ingress, multi-egress datagram relay.
#[derive(Debug)]
pub struct PacketReflector {
    endpoint: UdpEndpoint,
    subscribers: Vec<SocketAddr>,
}

impl PacketReflector {
    /// Binds the ingress port and records the subscriber list.
    ///
    /// A subscriber equal to the ingress address is dropped, since it
    /// would make every datagram circulate forever.
    pub async fn bind(
        ingress: SocketAddr,
        subscribers: Vec<SocketAddr>,
    ) -> Result<Self, TransportError> {
        let endpoint = UdpEndpoint::bind(ingress).await?;
        let local = endpoint.local_addr();

        let subscribers: Vec<SocketAddr> = subscribers
            .into_iter()
            .filter(|addr| {
                if *addr == local {
                    tracing::warn!(%addr, "ignoring subscriber that is the ingress port");
                    false
                } else {
                    true
                }
            })
            .collect();

        tracing::info!(
            ingress = %local,
            subscribers = subscribers.len(),
            "packet reflector listening"
        );
        Ok(Self {
            endpoint,
            subscribers,
        })
    }

    /// Binds using the installation's well-known ports.
    pub async fn from_ports(ports: &PortMap) -> Result<Self, TransportError> {
        Self::bind(ports.ingress_addr(), ports.subscriber_addrs()).await
    }

    /// The bound ingress address.
    pub fn local_addr(&self) -> SocketAddr {
        self.endpoint.local_addr()
    }

    pub fn subscribers(&self) -> &[SocketAddr] {
        &self.subscribers
    }

    /// Copies one datagram to every subscriber. Returns how many sends
    /// succeeded; a failed send to one subscriber never stops the others.
    pub async fn reflect(&self, data: &[u8]) -> usize {
        let mut delivered = 0;
        for &subscriber in &self.subscribers {
            match self.endpoint.send_to(data, subscriber).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::debug!(%subscriber, error = %e, "reflect failed");
                }
            }
        }
        delivered
    }

    /// Runs the receive loop until `shutdown` resolves.
    ///
    /// Returns the number of datagrams reflected. Transient receive errors
    /// (ICMP port-unreachable reports from earlier sends) are skipped; any
    /// other socket error ends the loop.
    pub async fn run<F>(self, shutdown: F) -> Result<u64, TransportError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut reflected: u64 = 0;

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!(reflected, "packet reflector shutting down");
                    return Ok(reflected);
                }
                result = self.endpoint.recv() => match result {
                    Ok(datagram) => {
                        tracing::trace!(
                            from = %datagram.from,
                            len = datagram.data.len(),
                            "reflecting datagram"
                        );
                        self.reflect(&datagram.data).await;
                        reflected += 1;
                    }
                    Err(e) if e.is_transient() => {
                        tracing::debug!(error = %e, "transient receive error");
                    }
                    Err(e) => return Err(e),
                },
            }
        }
    }
}
