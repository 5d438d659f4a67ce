//! Drive a humanoid skeleton from a mocopi motion-capture UDP stream.
//!
//! mcpose decodes the SMF box format, maps sender bone ids onto canonical
//! humanoid joints, writes the pose onto any joint store and mirrors it
//! left/right, once per received datagram.
//!
//! # Crate Structure
//!
//! - [`frame`] - Box decoder, encoder and bone-stream parser
//! - [`skeleton`] - Joint mapping, pose application and mirroring
//! - [`transport`] - UDP listener and datagram queue
//! - [`receiver`] - The per-cycle pipeline (behind `receiver` feature)

/// Re-export frame types.
pub mod frame {
    pub use mcpose_frame::*;
}

/// Re-export skeleton types.
pub mod skeleton {
    pub use mcpose_skeleton::*;
}

/// Re-export transport types.
pub mod transport {
    pub use mcpose_transport::*;
}

/// Re-export receiver types (requires `receiver` feature).
#[cfg(feature = "receiver")]
pub mod receiver {
    pub use mcpose_receiver::*;
}
