use glam::{Quat, Vec3};
use tracing::{trace, warn};

use crate::codec::{decode_box, read_f32s, read_i16, BoxRef, HEADER_SIZE};
use crate::error::Result;
use crate::tag::{BNID, BTDT, TRAN};

/// Bone id carried by a transform whose `bnid` box never arrived.
pub const UNSET_BONE_ID: i16 = -1;

/// Default cap on boxes visited per datagram.
pub const DEFAULT_MAX_ITERATIONS: usize = 4096;

/// One joint's transform as sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneTransform {
    /// Protocol bone id, or [`UNSET_BONE_ID`].
    pub bone_id: i16,
    pub rotation: Quat,
    pub position: Vec3,
}

/// Configuration for the bone-stream parser.
#[derive(Debug, Clone)]
pub struct DecodeConfig {
    /// Maximum number of boxes visited in a single datagram. Default: 4096.
    pub max_iterations: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Result of parsing one datagram.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedMessage {
    /// Bone transforms in arrival order.
    pub bones: Vec<BoneTransform>,
    /// Number of boxes visited.
    pub boxes_visited: usize,
    /// Set when the iteration ceiling stopped parsing early.
    pub truncated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Outside,
    InBoneScope,
}

#[derive(Debug, Clone, Copy)]
struct PendingBone {
    id: i16,
}

impl Default for PendingBone {
    fn default() -> Self {
        Self { id: UNSET_BONE_ID }
    }
}

/// Parse a datagram with default configuration.
pub fn parse_message(buf: &[u8]) -> Result<ParsedMessage> {
    parse_message_with_config(buf, &DecodeConfig::default())
}

/// Walk the box sequence of one datagram and collect its bone transforms.
///
/// `fram`, `btrs` and `btdt` are entered (cursor advances by the header only);
/// every other box is stepped over by header + payload. `bnid` and `tran` are
/// only interpreted once a `btdt` has been seen. A decode error abandons the
/// whole datagram.
pub fn parse_message_with_config(buf: &[u8], config: &DecodeConfig) -> Result<ParsedMessage> {
    let mut state = ParseState::Outside;
    let mut pending = PendingBone::default();
    let mut out = ParsedMessage::default();
    let mut cursor = 0usize;

    while cursor < buf.len() {
        if out.boxes_visited >= config.max_iterations {
            warn!(
                max_iterations = config.max_iterations,
                cursor,
                len = buf.len(),
                "iteration limit reached, abandoning rest of datagram"
            );
            out.truncated = true;
            break;
        }
        out.boxes_visited += 1;

        let bx = decode_box(buf, cursor)?;
        let (next_state, next_pending, advance) = step(state, pending, &bx, &mut out.bones)?;
        state = next_state;
        pending = next_pending;
        cursor += advance;
    }

    Ok(out)
}

fn step(
    state: ParseState,
    pending: PendingBone,
    bx: &BoxRef<'_>,
    bones: &mut Vec<BoneTransform>,
) -> Result<(ParseState, PendingBone, usize)> {
    let skip = bx.wire_size();
    match (bx.tag, state) {
        (BTDT, _) => Ok((ParseState::InBoneScope, pending, HEADER_SIZE)),
        (tag, _) if tag.is_container() => Ok((state, pending, HEADER_SIZE)),
        (BNID, ParseState::InBoneScope) => {
            let id = read_i16(bx.tag, bx.payload)?;
            Ok((state, PendingBone { id }, skip))
        }
        (TRAN, ParseState::InBoneScope) => {
            let [qx, qy, qz, qw, px, py, pz] = read_f32s::<7>(bx.tag, bx.payload)?;
            let bone = BoneTransform {
                bone_id: pending.id,
                rotation: Quat::from_xyzw(qx, qy, qz, qw),
                position: Vec3::new(px, py, pz),
            };
            trace!(bone_id = bone.bone_id, "bone transform");
            bones.push(bone);
            Ok((state, PendingBone::default(), skip))
        }
        (tag, _) if tag.is_recognized() => {
            trace!(%tag, "bone field outside bone scope");
            Ok((state, pending, skip))
        }
        (tag, _) => {
            trace!(%tag, size = bx.size, "skipping box");
            Ok((state, pending, skip))
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::{BufMut, BytesMut};

    use super::*;
    use crate::codec::encode_box;
    use crate::error::FrameError;
    use crate::tag::Tag;
    use crate::writer::MessageBuilder;

    fn tran_payload(values: [f32; 7]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        for v in values {
            buf.put_f32_le(v);
        }
        buf.to_vec()
    }

    /// `btdt` / `bnid` / `tran` without enclosing containers.
    fn flat_bone(id: i16, values: [f32; 7]) -> BytesMut {
        let mut buf = BytesMut::new();
        encode_box(BTDT, &[], &mut buf).unwrap();
        encode_box(BNID, &id.to_le_bytes(), &mut buf).unwrap();
        encode_box(TRAN, &tran_payload(values), &mut buf).unwrap();
        buf
    }

    #[test]
    fn parses_single_bone() {
        let buf = flat_bone(3, [0.1, 0.2, 0.3, 0.9, 1.0, 2.0, 3.0]);
        let parsed = parse_message(&buf).unwrap();

        assert_eq!(parsed.bones.len(), 1);
        let bone = parsed.bones[0];
        assert_eq!(bone.bone_id, 3);
        assert_eq!(bone.rotation, Quat::from_xyzw(0.1, 0.2, 0.3, 0.9));
        assert_eq!(bone.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(parsed.boxes_visited, 3);
        assert!(!parsed.truncated);
    }

    #[test]
    fn parses_nested_frame_in_arrival_order() {
        let buf = MessageBuilder::new()
            .bone(10, Quat::IDENTITY, Vec3::ZERO)
            .bone(0, Quat::from_xyzw(0.0, 1.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 3.0))
            .bone(5, Quat::IDENTITY, Vec3::ZERO)
            .build()
            .unwrap();

        let parsed = parse_message(&buf).unwrap();
        let ids: Vec<i16> = parsed.bones.iter().map(|b| b.bone_id).collect();
        assert_eq!(ids, vec![10, 0, 5]);
        assert_eq!(parsed.bones[1].position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn tran_without_bnid_carries_unset_id() {
        let mut buf = BytesMut::new();
        encode_box(BTDT, &[], &mut buf).unwrap();
        encode_box(TRAN, &tran_payload([0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]), &mut buf).unwrap();

        let parsed = parse_message(&buf).unwrap();
        assert_eq!(parsed.bones.len(), 1);
        assert_eq!(parsed.bones[0].bone_id, UNSET_BONE_ID);
    }

    #[test]
    fn pending_id_resets_after_each_tran() {
        let mut buf = flat_bone(8, [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
        encode_box(TRAN, &tran_payload([0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]), &mut buf).unwrap();

        let parsed = parse_message(&buf).unwrap();
        assert_eq!(parsed.bones[0].bone_id, 8);
        assert_eq!(parsed.bones[1].bone_id, UNSET_BONE_ID);
    }

    #[test]
    fn bnid_and_tran_outside_bone_scope_are_ignored() {
        let mut buf = BytesMut::new();
        encode_box(BNID, &4i16.to_le_bytes(), &mut buf).unwrap();
        encode_box(TRAN, &tran_payload([0.0; 7]), &mut buf).unwrap();
        encode_box(BTDT, &[], &mut buf).unwrap();
        encode_box(TRAN, &tran_payload([0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]), &mut buf).unwrap();

        let parsed = parse_message(&buf).unwrap();
        assert_eq!(parsed.bones.len(), 1);
        // The `bnid` before `btdt` must not leak into the scoped transform.
        assert_eq!(parsed.bones[0].bone_id, UNSET_BONE_ID);
    }

    #[test]
    fn short_payloads_outside_scope_are_skipped() {
        let mut buf = BytesMut::new();
        encode_box(BNID, &[], &mut buf).unwrap();
        encode_box(TRAN, &[1, 2, 3], &mut buf).unwrap();

        let parsed = parse_message(&buf).unwrap();
        assert!(parsed.bones.is_empty());
        assert_eq!(parsed.boxes_visited, 2);
    }

    #[test]
    fn unknown_leading_box_does_not_shift_cursor() {
        let mut buf = BytesMut::new();
        encode_box(Tag(*b"head"), b"version-2.0\0", &mut buf).unwrap();
        encode_box(Tag(*b"sndf"), &[0xAA; 17], &mut buf).unwrap();
        buf.extend_from_slice(
            &MessageBuilder::new()
                .bone(12, Quat::from_xyzw(0.5, 0.5, 0.5, 0.5), Vec3::ZERO)
                .build()
                .unwrap(),
        );

        let parsed = parse_message(&buf).unwrap();
        assert_eq!(parsed.bones.len(), 1);
        assert_eq!(parsed.bones[0].bone_id, 12);
        assert_eq!(parsed.bones[0].rotation, Quat::from_xyzw(0.5, 0.5, 0.5, 0.5));
    }

    #[test]
    fn overrun_box_rejects_datagram() {
        let mut buf = flat_bone(0, [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
        buf.put_u32_le(1000);
        buf.put_slice(b"tran");
        buf.put_slice(&[0u8; 4]);

        let err = parse_message(&buf).unwrap_err();
        assert!(matches!(err, FrameError::BoxOverrun { size: 1000, .. }));
    }

    #[test]
    fn trailing_garbage_is_truncated_header() {
        let mut buf = flat_bone(0, [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
        buf.put_slice(&[1, 2, 3]);

        let err = parse_message(&buf).unwrap_err();
        assert!(matches!(err, FrameError::TruncatedHeader { remaining: 3, .. }));
    }

    #[test]
    fn short_tran_in_scope_is_error() {
        let mut buf = BytesMut::new();
        encode_box(BTDT, &[], &mut buf).unwrap();
        encode_box(TRAN, &[0u8; 20], &mut buf).unwrap();

        let err = parse_message(&buf).unwrap_err();
        assert_eq!(
            err,
            FrameError::PayloadTooShort {
                tag: TRAN,
                expected: 28,
                actual: 20
            }
        );
    }

    #[test]
    fn iteration_limit_keeps_partial_result() {
        let mut buf = flat_bone(0, [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
        for _ in 0..10 {
            encode_box(Tag(*b"pad "), &[], &mut buf).unwrap();
        }

        let config = DecodeConfig { max_iterations: 5 };
        let parsed = parse_message_with_config(&buf, &config).unwrap();
        assert!(parsed.truncated);
        assert_eq!(parsed.boxes_visited, 5);
        assert_eq!(parsed.bones.len(), 1);
    }

    #[test]
    fn empty_datagram_yields_nothing() {
        let parsed = parse_message(&[]).unwrap();
        assert_eq!(parsed, ParsedMessage::default());
    }
}
