use mcpose_frame::{parse_message_with_config, DecodeConfig};
use mcpose_skeleton::{apply_pose, mirror_pose, JointStore};

use crate::error::Result;

/// What one datagram did to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Bone transforms decoded.
    pub bones: usize,
    /// Transforms written to the store.
    pub applied: usize,
    /// Transforms with an unmapped bone id.
    pub skipped: usize,
    /// The iteration limit cut the datagram short.
    pub truncated: bool,
}

/// Decode one datagram, apply it to `store`, then run the mirror pass.
///
/// On a decode error the store is left exactly as it was.
pub fn process_datagram<S: JointStore + ?Sized>(
    store: &mut S,
    payload: &[u8],
    config: &DecodeConfig,
) -> Result<FrameReport> {
    let parsed = parse_message_with_config(payload, config)?;
    let applied = apply_pose(store, &parsed.bones);
    mirror_pose(store);

    Ok(FrameReport {
        bones: parsed.bones.len(),
        applied: applied.applied,
        skipped: applied.skipped,
        truncated: parsed.truncated,
    })
}
