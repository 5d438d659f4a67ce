use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::error::{Result, TransportError};
use crate::queue::{Datagram, DatagramQueue};

/// Default mocopi sender port.
pub const DEFAULT_PORT: u16 = 12351;

/// Largest payload a UDP datagram can carry.
pub const MAX_DATAGRAM_SIZE: usize = 65535;

/// Default interval at which a blocked receive re-checks the stop flag.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for a datagram listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    /// Local address to bind. Default: `0.0.0.0`.
    pub bind_addr: IpAddr,
    /// Local port. Default: 12351. Port 0 picks an ephemeral port.
    pub port: u16,
    /// How long a receive blocks before checking for shutdown.
    pub poll_interval: Duration,
    /// Receive buffer per datagram; longer datagrams are truncated by the OS.
    pub max_datagram_size: usize,
    /// Kernel receive buffer size (`SO_RCVBUF`), if it should be changed.
    pub recv_buffer_size: Option<usize>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_datagram_size: MAX_DATAGRAM_SIZE,
            recv_buffer_size: None,
        }
    }
}

impl ListenerConfig {
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_bind_addr(mut self, bind_addr: IpAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    pub fn with_recv_buffer_size(mut self, bytes: usize) -> Self {
        self.recv_buffer_size = Some(bytes);
        self
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

/// Bind a UDP socket according to `config`.
pub(crate) fn bind_socket(config: &ListenerConfig) -> Result<UdpSocket> {
    let addr = config.socket_addr();
    let socket = UdpSocket::bind(addr).map_err(|source| TransportError::Bind { addr, source })?;
    if let Some(size) = config.recv_buffer_size {
        set_recv_buffer_size(&socket, size)?;
    }
    Ok(socket)
}

/// Receives datagrams on a background thread and pushes them onto a queue.
///
/// Dropping the listener stops the thread and waits for it, so a stopped
/// listener never delivers another datagram.
pub struct DatagramListener {
    local_addr: SocketAddr,
    session: u64,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl DatagramListener {
    /// Bind and start receiving. Every pushed datagram carries `session`.
    pub fn spawn(config: &ListenerConfig, queue: DatagramQueue, session: u64) -> Result<Self> {
        let socket = bind_socket(config)?;
        socket.set_read_timeout(Some(config.poll_interval))?;
        let local_addr = socket.local_addr()?;

        let running = Arc::new(AtomicBool::new(true));
        let worker = ReceiveLoop {
            socket,
            queue,
            session,
            running: Arc::clone(&running),
            buf: vec![0u8; config.max_datagram_size],
        };
        let handle = std::thread::Builder::new()
            .name(format!("mcpose-udp-{}", local_addr.port()))
            .spawn(move || worker.run())?;

        info!(%local_addr, session, "listening for datagrams");

        Ok(Self {
            local_addr,
            session,
            running,
            handle: Some(handle),
        })
    }

    /// The address the socket is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Session number stamped on datagrams from this listener.
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Returns false once the receive thread has exited.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
            && self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the receive thread and wait for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!(local_addr = %self.local_addr, "receive thread panicked");
            }
            debug!(local_addr = %self.local_addr, session = self.session, "listener stopped");
        }
    }
}

impl Drop for DatagramListener {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for DatagramListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatagramListener")
            .field("local_addr", &self.local_addr)
            .field("session", &self.session)
            .finish()
    }
}

struct ReceiveLoop {
    socket: UdpSocket,
    queue: DatagramQueue,
    session: u64,
    running: Arc<AtomicBool>,
    buf: Vec<u8>,
}

impl ReceiveLoop {
    fn run(mut self) {
        while self.running.load(Ordering::SeqCst) {
            match self.socket.recv_from(&mut self.buf) {
                Ok((len, source)) => {
                    // A stop issued while blocked must not deliver.
                    if !self.running.load(Ordering::SeqCst) {
                        break;
                    }
                    self.queue.push(Datagram {
                        payload: Bytes::copy_from_slice(&self.buf[..len]),
                        source,
                        session: self.session,
                    });
                }
                Err(err)
                    if matches!(
                        err.kind(),
                        ErrorKind::WouldBlock
                            | ErrorKind::TimedOut
                            | ErrorKind::Interrupted
                            | ErrorKind::ConnectionReset
                    ) =>
                {
                    continue
                }
                Err(err) => {
                    warn!(error = %err, session = self.session, "datagram receive failed");
                    break;
                }
            }
        }
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Set `SO_RCVBUF` on the socket.
#[cfg(unix)]
fn set_recv_buffer_size(socket: &UdpSocket, bytes: usize) -> Result<()> {
    use std::os::fd::AsRawFd;

    let size = libc::c_int::try_from(bytes).unwrap_or(libc::c_int::MAX);

    // SAFETY: `size` is a valid readable c_int for the given length, and the
    // descriptor is an open UDP socket owned by `socket`.
    let rc = unsafe {
        libc::setsockopt(
            socket.as_raw_fd(),
            libc::SOL_SOCKET,
            libc::SO_RCVBUF,
            (&size as *const libc::c_int).cast::<libc::c_void>(),
            std::mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    };

    if rc == 0 {
        debug!(bytes = size, "receive buffer size set");
        Ok(())
    } else {
        Err(TransportError::Io(std::io::Error::last_os_error()))
    }
}

/// Set `SO_RCVBUF` on the socket.
///
/// Not supported on this platform; the OS default is kept.
#[cfg(not(unix))]
fn set_recv_buffer_size(_socket: &UdpSocket, bytes: usize) -> Result<()> {
    debug!(bytes, "receive buffer sizing unsupported on this platform");
    Ok(())
}
