/// Errors that can occur while running the receiver.
#[derive(Debug, thiserror::Error)]
pub enum ReceiverError {
    /// Transport-level error (bind, socket I/O).
    #[error("transport error: {0}")]
    Transport(#[from] mcpose_transport::TransportError),

    /// A datagram could not be decoded.
    #[error("frame error: {0}")]
    Frame(#[from] mcpose_frame::FrameError),

    /// A blocking rebind was requested while an async listener holds the port.
    #[error("async listener is running; rebind with the async methods")]
    AsyncListenerActive,
}

pub type Result<T> = std::result::Result<T, ReceiverError>;
