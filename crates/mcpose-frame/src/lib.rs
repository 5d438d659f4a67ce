//! Box decoding and bone-stream parsing for the mocopi SMF wire format.
//!
//! A datagram is a flat sequence of self-describing boxes:
//! - A 4-byte little-endian payload size
//! - A 4-byte ASCII tag
//! - `size` bytes of payload
//!
//! Container boxes (`fram`, `btrs`, `btdt`) are entered rather than skipped,
//! so their children are read in the same pass. Everything that is not part
//! of a bone transform is stepped over by its declared size.

pub mod codec;
pub mod error;
pub mod parser;
pub mod tag;
pub mod writer;

pub use codec::{decode_box, encode_box, encode_container, BoxRef, HEADER_SIZE};
pub use error::{FrameError, Result};
pub use parser::{
    parse_message, parse_message_with_config, BoneTransform, DecodeConfig, ParsedMessage,
    DEFAULT_MAX_ITERATIONS, UNSET_BONE_ID,
};
pub use tag::{Tag, BNID, BTDT, BTRS, FRAM, TRAN};
pub use writer::{encode_bone, MessageBuilder};
