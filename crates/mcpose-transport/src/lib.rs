//! Datagram transport for mcpose.
//!
//! A listener receives UDP datagrams on its own thread (or tokio task with the
//! `async` feature) and appends them to a [`DatagramQueue`]. The queue is the
//! only state shared with the consumer; the skeleton is never touched here.

#[cfg(feature = "async")]
pub mod async_udp;
pub mod error;
pub mod queue;
pub mod udp;

#[cfg(feature = "async")]
pub use async_udp::AsyncDatagramListener;
pub use error::{Result, TransportError};
pub use queue::{Datagram, DatagramQueue};
pub use udp::{
    DatagramListener, ListenerConfig, DEFAULT_POLL_INTERVAL, DEFAULT_PORT, MAX_DATAGRAM_SIZE,
};
