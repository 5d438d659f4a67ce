//! Drives a humanoid skeleton from a mocopi datagram stream.
//!
//! Datagrams are queued by a listener and drained once per processing cycle;
//! each one is decoded, mapped onto canonical joints, applied to the
//! caller's [`JointStore`](mcpose_skeleton::JointStore) and mirrored, fully,
//! before the next one starts.

pub mod error;
pub mod pipeline;
pub mod receiver;

pub use error::{ReceiverError, Result};
pub use pipeline::{process_datagram, FrameReport};
pub use receiver::{CycleReport, MotionReceiver, ReceiverConfig};
