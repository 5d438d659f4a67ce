use std::io::ErrorKind;
use std::net::SocketAddr;

use bytes::Bytes;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{Result, TransportError};
use crate::queue::{Datagram, DatagramQueue};
use crate::udp::ListenerConfig;

/// Tokio counterpart of [`crate::DatagramListener`].
///
/// Must be spawned from within a tokio runtime.
#[derive(Debug)]
pub struct AsyncDatagramListener {
    local_addr: SocketAddr,
    session: u64,
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl AsyncDatagramListener {
    /// Bind and start receiving on a runtime task.
    pub async fn spawn(config: &ListenerConfig, queue: DatagramQueue, session: u64) -> Result<Self> {
        let addr = config.socket_addr();
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| TransportError::Bind { addr, source })?;
        let local_addr = socket.local_addr()?;

        let token = CancellationToken::new();
        let task = tokio::spawn(receive_loop(
            socket,
            queue,
            session,
            token.clone(),
            config.max_datagram_size,
        ));

        info!(%local_addr, session, "listening for datagrams (async)");

        Ok(Self {
            local_addr,
            session,
            token,
            task: Some(task),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    /// Returns false once the receive task has exited.
    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled() && self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancel the receive task and wait for it to finish.
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(error = %err, "receive task failed");
            }
        }
        debug!(local_addr = %self.local_addr, session = self.session, "async listener stopped");
    }
}

impl Drop for AsyncDatagramListener {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn receive_loop(
    socket: UdpSocket,
    queue: DatagramQueue,
    session: u64,
    token: CancellationToken,
    max_datagram_size: usize,
) {
    let mut buf = vec![0u8; max_datagram_size];
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            received = socket.recv_from(&mut buf) => match received {
                Ok((len, source)) => queue.push(Datagram {
                    payload: Bytes::copy_from_slice(&buf[..len]),
                    source,
                    session,
                }),
                Err(err) if matches!(err.kind(), ErrorKind::Interrupted | ErrorKind::ConnectionReset) => {}
                Err(err) => {
                    warn!(error = %err, session, "datagram receive failed");
                    break;
                }
            },
        }
    }
}
