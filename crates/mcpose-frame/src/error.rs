use crate::tag::Tag;

/// Errors that can occur while decoding or encoding a datagram.
///
/// Every decode variant abandons the datagram being decoded; none of them are
/// fatal to the receiver as a whole.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Fewer than 8 bytes remain where a box header was expected.
    #[error("truncated box header at offset {offset} ({remaining} bytes remaining, need 8)")]
    TruncatedHeader { offset: usize, remaining: usize },

    /// A box declares a payload that runs past the end of the datagram.
    #[error("box '{tag}' at offset {offset} declares {size} payload bytes, only {available} available")]
    BoxOverrun {
        tag: Tag,
        offset: usize,
        size: u32,
        available: usize,
    },

    /// A recognized box carries less payload than its field layout needs.
    #[error("box '{tag}' payload too short ({actual} bytes, need {expected})")]
    PayloadTooShort {
        tag: Tag,
        expected: usize,
        actual: usize,
    },

    /// A box being encoded is larger than its 32-bit size field can declare.
    #[error("box '{tag}' of {size} bytes exceeds the maximum of {max}")]
    BoxTooLarge { tag: Tag, size: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
