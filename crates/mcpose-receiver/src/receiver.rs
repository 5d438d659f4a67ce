use std::net::SocketAddr;

use bytes::Bytes;
use mcpose_frame::DecodeConfig;
use mcpose_skeleton::JointStore;
use mcpose_transport::{Datagram, DatagramListener, DatagramQueue, ListenerConfig};
use tracing::{debug, info, warn};

use crate::error::{ReceiverError, Result};
use crate::pipeline::{process_datagram, FrameReport};

/// Receiver configuration.
#[derive(Debug, Clone, Default)]
pub struct ReceiverConfig {
    pub listener: ListenerConfig,
    pub decode: DecodeConfig,
}

/// Totals for one [`MotionReceiver::process_pending`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Datagrams taken off the queue.
    pub datagrams: usize,
    /// Datagrams decoded and applied.
    pub frames: usize,
    /// Datagrams dropped because they failed to decode.
    pub rejected: usize,
    /// Datagrams dropped because a newer listener session superseded theirs.
    pub stale: usize,
    /// Bone transforms written to the store.
    pub bones_applied: usize,
    /// Bone transforms with an unmapped id.
    pub bones_skipped: usize,
}

impl CycleReport {
    fn record(&mut self, frame: &FrameReport) {
        self.frames += 1;
        self.bones_applied += frame.applied;
        self.bones_skipped += frame.skipped;
    }
}

enum ActiveListener {
    Blocking(DatagramListener),
    #[cfg(feature = "async")]
    Async(mcpose_transport::AsyncDatagramListener),
}

impl ActiveListener {
    fn local_addr(&self) -> SocketAddr {
        match self {
            ActiveListener::Blocking(l) => l.local_addr(),
            #[cfg(feature = "async")]
            ActiveListener::Async(l) => l.local_addr(),
        }
    }

    fn is_running(&self) -> bool {
        match self {
            ActiveListener::Blocking(l) => l.is_running(),
            #[cfg(feature = "async")]
            ActiveListener::Async(l) => l.is_running(),
        }
    }

    fn is_async(&self) -> bool {
        match self {
            ActiveListener::Blocking(_) => false,
            #[cfg(feature = "async")]
            ActiveListener::Async(_) => true,
        }
    }
}

/// Owns the datagram queue and the listener feeding it, and drives a joint
/// store from the queued datagrams once per processing cycle.
///
/// Each `listen` starts a new session. Datagrams stamped with an older
/// session are discarded, so a listener being replaced can never leak frames
/// into its successor.
pub struct MotionReceiver {
    config: ReceiverConfig,
    queue: DatagramQueue,
    listener: Option<ActiveListener>,
    session: u64,
}

impl MotionReceiver {
    pub fn new(config: ReceiverConfig) -> Self {
        Self {
            config,
            queue: DatagramQueue::new(),
            listener: None,
            session: 0,
        }
    }

    /// Start listening on the configured port, replacing any running listener.
    ///
    /// The previous listener is fully stopped before the new socket binds. A
    /// bind failure is returned and leaves the receiver stopped.
    ///
    /// An async listener cannot be joined from here, so while one is running
    /// this fails with [`ReceiverError::AsyncListenerActive`] and leaves it in
    /// place; use [`listen_async`](Self::listen_async) or
    /// [`change_port_async`](Self::change_port_async) instead.
    pub fn listen(&mut self) -> Result<SocketAddr> {
        if self.listener.as_ref().is_some_and(ActiveListener::is_async) {
            return Err(ReceiverError::AsyncListenerActive);
        }
        self.stop();
        let session = self.next_session();
        let listener = DatagramListener::spawn(&self.config.listener, self.queue.clone(), session)?;
        let addr = listener.local_addr();
        self.listener = Some(ActiveListener::Blocking(listener));
        info!(%addr, session, "receiver listening");
        Ok(addr)
    }

    /// Like [`listen`](Self::listen), receiving on a tokio task.
    #[cfg(feature = "async")]
    pub async fn listen_async(&mut self) -> Result<SocketAddr> {
        self.stop_async().await;
        let session = self.next_session();
        let listener = mcpose_transport::AsyncDatagramListener::spawn(
            &self.config.listener,
            self.queue.clone(),
            session,
        )
        .await?;
        let addr = listener.local_addr();
        self.listener = Some(ActiveListener::Async(listener));
        info!(%addr, session, "receiver listening (async)");
        Ok(addr)
    }

    /// Switch to a new port and restart listening.
    pub fn change_port(&mut self, port: u16) -> Result<SocketAddr> {
        if self.listener.as_ref().is_some_and(ActiveListener::is_async) {
            return Err(ReceiverError::AsyncListenerActive);
        }
        self.config.listener.port = port;
        self.listen()
    }

    /// Like [`change_port`](Self::change_port); the old receive task is
    /// awaited, and its socket closed, before the new port binds.
    #[cfg(feature = "async")]
    pub async fn change_port_async(&mut self, port: u16) -> Result<SocketAddr> {
        self.config.listener.port = port;
        self.listen_async().await
    }

    /// Stop the running listener, if any.
    ///
    /// An async listener is cancelled without waiting for its task; use
    /// [`stop_async`](Self::stop_async) when the port must be free on return.
    pub fn stop(&mut self) {
        match self.listener.take() {
            Some(ActiveListener::Blocking(listener)) => listener.stop(),
            #[cfg(feature = "async")]
            Some(ActiveListener::Async(listener)) => drop(listener),
            None => {}
        }
    }

    /// Stop the running listener and wait for an async receive task to finish.
    #[cfg(feature = "async")]
    pub async fn stop_async(&mut self) {
        match self.listener.take() {
            Some(ActiveListener::Async(listener)) => listener.stop().await,
            Some(ActiveListener::Blocking(listener)) => listener.stop(),
            None => {}
        }
    }

    /// Returns true while a listener is installed and its receive loop is
    /// still running. A loop that died on a socket error reports false.
    pub fn is_listening(&self) -> bool {
        self.listener.as_ref().is_some_and(ActiveListener::is_running)
    }

    /// Bound address of the running listener.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().map(ActiveListener::local_addr)
    }

    /// Current session number; 0 until the first `listen`.
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Producer handle for the inbound queue.
    pub fn queue(&self) -> &DatagramQueue {
        &self.queue
    }

    /// Queue a datagram from an external transport under the current session.
    pub fn submit(&self, payload: impl Into<Bytes>, source: SocketAddr) {
        self.queue.push(Datagram {
            payload: payload.into(),
            source,
            session: self.session,
        });
    }

    /// Drain every queued datagram and run decode, apply and mirror for each,
    /// in arrival order.
    ///
    /// Datagrams that fail to decode are logged and dropped; later datagrams
    /// are still processed.
    pub fn process_pending<S: JointStore + ?Sized>(&self, store: &mut S) -> CycleReport {
        let mut report = CycleReport::default();

        for datagram in self.queue.drain() {
            report.datagrams += 1;

            if datagram.session != self.session {
                debug!(
                    session = datagram.session,
                    current = self.session,
                    "discarding datagram from superseded session"
                );
                report.stale += 1;
                continue;
            }

            match process_datagram(store, &datagram.payload, &self.config.decode) {
                Ok(frame) => report.record(&frame),
                Err(err) => {
                    warn!(
                        error = %err,
                        source = %datagram.source,
                        len = datagram.payload.len(),
                        "dropping malformed datagram"
                    );
                    report.rejected += 1;
                }
            }
        }

        report
    }

    fn next_session(&mut self) -> u64 {
        self.session += 1;
        self.session
    }
}

impl Default for MotionReceiver {
    fn default() -> Self {
        Self::new(ReceiverConfig::default())
    }
}

impl Drop for MotionReceiver {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for MotionReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionReceiver")
            .field("session", &self.session)
            .field("local_addr", &self.local_addr())
            .field("queued", &self.queue.len())
            .finish()
    }
}
