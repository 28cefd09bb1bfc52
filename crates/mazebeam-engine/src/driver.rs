//! The engine's receive loop: socket in, state machine, socket out.

use std::future::Future;
use std::net::SocketAddr;
use std::ops::ControlFlow;
use std::pin::Pin;

use mazebeam_protocol::{Codec, Message, TextCodec};
use mazebeam_tick::Cadence;
use mazebeam_transport::{PortMap, UdpEndpoint};
use tracing::{debug, error, info};

use crate::{EngineConfig, EngineError, MazeEngine, Outbound};

/// Runs a [`MazeEngine`] against the bus.
///
/// Each tick drains every queued datagram, decodes it, feeds it to the
/// engine, and sends the engine's output to the bus ingress in order.
/// Holds pause the loop in place; datagrams that arrive meanwhile wait in
/// the socket buffer for the next drain.
pub struct EngineDriver<C: Codec = TextCodec> {
    engine: MazeEngine,
    endpoint: UdpEndpoint,
    ingress: SocketAddr,
    codec: C,
    cadence: Cadence,
}

impl EngineDriver {
    /// Builds the engine from `config` and binds its well-known port.
    pub async fn bind(config: EngineConfig, ports: &PortMap) -> Result<Self, EngineError> {
        let engine = MazeEngine::new(config)?;
        let endpoint = UdpEndpoint::bind(ports.engine_addr()).await?;
        Ok(Self::new(engine, endpoint, ports.ingress_addr()))
    }

    pub fn new(engine: MazeEngine, endpoint: UdpEndpoint, ingress: SocketAddr) -> Self {
        Self::with_codec(engine, endpoint, ingress, TextCodec)
    }
}

impl<C: Codec> EngineDriver<C> {
    pub fn with_codec(
        engine: MazeEngine,
        endpoint: UdpEndpoint,
        ingress: SocketAddr,
        codec: C,
    ) -> Self {
        let cadence = Cadence::new(engine.config().poll_interval());
        Self {
            engine,
            endpoint,
            ingress,
            codec,
            cadence,
        }
    }

    pub fn engine(&self) -> &MazeEngine {
        &self.engine
    }

    /// The address the engine listens on.
    pub fn local_addr(&self) -> SocketAddr {
        self.endpoint.local_addr()
    }

    /// Announces `init` → `attract`, then polls until `shutdown` resolves.
    ///
    /// Cue holds race the shutdown future, so a stop request that lands in
    /// the middle of a round start is honored at once and the rest of the
    /// cue sequence is dropped. Returns the engine so callers can inspect
    /// its final state.
    pub async fn run<F>(mut self, shutdown: F) -> Result<MazeEngine, EngineError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let outbound = self.engine.start()?;
        if self.dispatch(outbound, shutdown.as_mut()).await?.is_break() {
            return Ok(self.stopped());
        }
        info!(
            listen = %self.endpoint.local_addr(),
            ingress = %self.ingress,
            "maze engine running"
        );

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => return Ok(self.stopped()),
                _ = self.cadence.wait() => {
                    if self.poll(shutdown.as_mut()).await?.is_break() {
                        return Ok(self.stopped());
                    }
                }
            }
        }
    }

    fn stopped(self) -> MazeEngine {
        info!(state = %self.engine.state(), "maze engine shutting down");
        self.engine
    }

    /// Drains and handles every datagram currently queued. Breaks if
    /// `shutdown` resolved during a cue hold.
    async fn poll<F>(
        &mut self,
        mut shutdown: Pin<&mut F>,
    ) -> Result<ControlFlow<()>, EngineError>
    where
        F: Future<Output = ()>,
    {
        loop {
            let datagram = match self.endpoint.try_recv() {
                Ok(Some(datagram)) => datagram,
                Ok(None) => return Ok(ControlFlow::Continue(())),
                Err(e) if e.is_transient() => {
                    debug!(error = %e, "transient receive error");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let msg = match self.codec.decode(&datagram.data) {
                Ok(msg) => msg,
                Err(e) => {
                    debug!(from = %datagram.from, error = %e, "dropping datagram");
                    continue;
                }
            };

            match self.engine.handle(&msg) {
                Ok(outbound) => {
                    if self.dispatch(outbound, shutdown.as_mut()).await?.is_break() {
                        return Ok(ControlFlow::Break(()));
                    }
                }
                Err(e) => error!(error = %e, kind = msg.kind(), "engine rejected message"),
            }
        }
    }

    /// Sends `outbound` in order, sleeping through holds. Breaks without
    /// sending the rest if `shutdown` resolves during a hold.
    async fn dispatch<F>(
        &mut self,
        outbound: Vec<Outbound>,
        mut shutdown: Pin<&mut F>,
    ) -> Result<ControlFlow<()>, EngineError>
    where
        F: Future<Output = ()>,
    {
        let mut held = false;
        for step in outbound {
            match step {
                Outbound::Send(msg) => self.send(&msg).await?,
                Outbound::Hold(duration) => {
                    debug!(?duration, "holding for cue");
                    tokio::select! {
                        biased;
                        _ = &mut shutdown => {
                            info!("shutdown during cue hold, dropping the rest of the cues");
                            return Ok(ControlFlow::Break(()));
                        }
                        _ = tokio::time::sleep(duration) => held = true,
                    }
                }
            }
        }
        if held {
            self.cadence.reset();
        }
        Ok(ControlFlow::Continue(()))
    }

    async fn send(&self, msg: &Message) -> Result<(), EngineError> {
        debug!(kind = msg.kind(), "sending {msg}");
        match self.endpoint.send_to(&self.codec.encode(msg), self.ingress).await {
            Ok(()) => Ok(()),
            // Nobody on the bus right now. UDP is lossy anyway and the
            // next full broadcast heals every subscriber.
            Err(e) if e.is_transient() => {
                debug!(error = %e, "bus unreachable, message lost");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
