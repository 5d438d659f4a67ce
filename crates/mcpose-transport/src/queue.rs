use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;

/// One received datagram, stamped with the listener session that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    pub payload: Bytes,
    pub source: SocketAddr,
    pub session: u64,
}

/// Unbounded FIFO hand-off between a listener and the processing cycle.
///
/// Cloning shares the same queue. The producer only appends; the consumer
/// takes everything queued at once.
#[derive(Debug, Clone, Default)]
pub struct DatagramQueue {
    inner: Arc<Mutex<VecDeque<Datagram>>>,
}

impl DatagramQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a datagram.
    pub fn push(&self, datagram: Datagram) {
        self.lock().push_back(datagram);
    }

    /// Take every queued datagram, oldest first.
    pub fn drain(&self) -> Vec<Datagram> {
        let taken = std::mem::take(&mut *self.lock());
        taken.into()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panicking producer must not wedge the consumer.
    fn lock(&self) -> MutexGuard<'_, VecDeque<Datagram>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
