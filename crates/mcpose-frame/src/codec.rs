use bytes::{Buf, BufMut, BytesMut};

use crate::error::{FrameError, Result};
use crate::tag::Tag;

/// Box header: size (4) + tag (4) = 8 bytes.
pub const HEADER_SIZE: usize = 8;

/// A decoded box borrowing its payload from the datagram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxRef<'a> {
    /// Declared payload size.
    pub size: u32,
    /// Box tag.
    pub tag: Tag,
    /// Payload bytes; always exactly `size` long.
    pub payload: &'a [u8],
}

impl BoxRef<'_> {
    /// The total wire size of this box (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

/// Decode one box header at `offset`.
///
/// Wire format:
/// ```text
/// ┌──────────────┬──────────────┬──────────────────┐
/// │ Size (4B LE) │ Tag (4B)     │ Payload          │
/// │              │ "fram" etc.  │ (Size bytes)     │
/// └──────────────┴──────────────┴──────────────────┘
/// ```
///
/// Only the box at `offset` is decoded. The caller decides how far to advance,
/// because container boxes are entered rather than skipped.
pub fn decode_box(buf: &[u8], offset: usize) -> Result<BoxRef<'_>> {
    let remaining = buf.len().saturating_sub(offset);
    if remaining < HEADER_SIZE {
        return Err(FrameError::TruncatedHeader { offset, remaining });
    }

    let mut header = &buf[offset..offset + HEADER_SIZE];
    let size = header.get_u32_le();
    let tag = Tag::from_slice(header).ok_or(FrameError::TruncatedHeader { offset, remaining })?;

    let available = remaining - HEADER_SIZE;
    let payload_start = offset + HEADER_SIZE;
    let payload = usize::try_from(size)
        .ok()
        .filter(|&len| len <= available)
        .map(|len| &buf[payload_start..payload_start + len])
        .ok_or(FrameError::BoxOverrun {
            tag,
            offset,
            size,
            available,
        })?;

    Ok(BoxRef { size, tag, payload })
}

/// Append a box with the given payload.
///
/// Nothing is written when the payload does not fit the 32-bit size field.
pub fn encode_box(tag: Tag, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let size = declared_size(tag, payload.len())?;
    dst.reserve(HEADER_SIZE + payload.len());
    put_header(tag, size, dst);
    dst.put_slice(payload);
    Ok(())
}

/// Append a container header whose declared size covers `children_len` bytes.
///
/// The children themselves are appended by the caller right after.
pub fn encode_container(tag: Tag, children_len: usize, dst: &mut BytesMut) -> Result<()> {
    let size = declared_size(tag, children_len)?;
    put_header(tag, size, dst);
    Ok(())
}

pub(crate) fn put_header(tag: Tag, size: u32, dst: &mut BytesMut) {
    dst.reserve(HEADER_SIZE);
    dst.put_u32_le(size);
    dst.put_slice(tag.as_bytes());
}

fn declared_size(tag: Tag, len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| FrameError::BoxTooLarge {
        tag,
        size: len,
        max: u32::MAX as usize,
    })
}

/// Read a little-endian `i16` from the start of a payload.
pub(crate) fn read_i16(tag: Tag, payload: &[u8]) -> Result<i16> {
    let mut buf = payload;
    if buf.remaining() < 2 {
        return Err(FrameError::PayloadTooShort {
            tag,
            expected: 2,
            actual: payload.len(),
        });
    }
    Ok(buf.get_i16_le())
}

/// Read `N` little-endian `f32` values from the start of a payload.
pub(crate) fn read_f32s<const N: usize>(tag: Tag, payload: &[u8]) -> Result<[f32; N]> {
    let mut buf = payload;
    if buf.remaining() < N * 4 {
        return Err(FrameError::PayloadTooShort {
            tag,
            expected: N * 4,
            actual: payload.len(),
        });
    }
    let mut out = [0f32; N];
    for value in &mut out {
        *value = buf.get_f32_le();
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::{BNID, FRAM, TRAN};

    #[test]
    fn decode_single_box() {
        let mut buf = BytesMut::new();
        encode_box(BNID, &7i16.to_le_bytes(), &mut buf).unwrap();

        let decoded = decode_box(&buf, 0).unwrap();
        assert_eq!(decoded.size, 2);
        assert_eq!(decoded.tag, BNID);
        assert_eq!(decoded.payload, &[7, 0]);
        assert_eq!(decoded.wire_size(), HEADER_SIZE + 2);
    }

    #[test]
    fn decode_at_offset() {
        let mut buf = BytesMut::new();
        encode_box(Tag(*b"head"), b"abc", &mut buf).unwrap();
        encode_box(BNID, &3i16.to_le_bytes(), &mut buf).unwrap();

        let decoded = decode_box(&buf, HEADER_SIZE + 3).unwrap();
        assert_eq!(decoded.tag, BNID);
        assert_eq!(decoded.payload, &[3, 0]);
    }

    #[test]
    fn container_header_reports_children_size() {
        let mut buf = BytesMut::new();
        encode_container(FRAM, 10, &mut buf).unwrap();
        encode_box(BNID, &1i16.to_le_bytes(), &mut buf).unwrap();

        let decoded = decode_box(&buf, 0).unwrap();
        assert_eq!(decoded.tag, FRAM);
        assert_eq!(decoded.size, 10);
        assert_eq!(decoded.payload.len(), 10);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn oversized_container_is_rejected_without_writing() {
        let mut buf = BytesMut::new();
        let err = encode_container(FRAM, u32::MAX as usize + 1, &mut buf).unwrap_err();
        assert_eq!(
            err,
            FrameError::BoxTooLarge {
                tag: FRAM,
                size: u32::MAX as usize + 1,
                max: u32::MAX as usize
            }
        );
        assert!(buf.is_empty());

        encode_container(FRAM, u32::MAX as usize, &mut buf).unwrap();
        let header = decode_box(&buf, 0).unwrap_err();
        assert!(matches!(
            header,
            FrameError::BoxOverrun { size: u32::MAX, available: 0, .. }
        ));
    }

    #[test]
    fn decode_truncated_header() {
        let buf = [0x02, 0x00, 0x00, 0x00, b'b', b'n'];
        let err = decode_box(&buf, 0).unwrap_err();
        assert_eq!(
            err,
            FrameError::TruncatedHeader {
                offset: 0,
                remaining: 6
            }
        );
    }

    #[test]
    fn decode_offset_past_end() {
        let buf = [0u8; 4];
        let err = decode_box(&buf, 10).unwrap_err();
        assert!(matches!(
            err,
            FrameError::TruncatedHeader { remaining: 0, .. }
        ));
    }

    #[test]
    fn decode_overrun_is_rejected() {
        let mut buf = BytesMut::new();
        buf.put_u32_le(28);
        buf.put_slice(b"tran");
        buf.put_slice(&[0u8; 12]);

        let err = decode_box(&buf, 0).unwrap_err();
        assert_eq!(
            err,
            FrameError::BoxOverrun {
                tag: TRAN,
                offset: 0,
                size: 28,
                available: 12
            }
        );
    }

    #[test]
    fn decode_huge_declared_size() {
        let mut buf = BytesMut::new();
        buf.put_u32_le(u32::MAX);
        buf.put_slice(b"fram");

        let err = decode_box(&buf, 0).unwrap_err();
        assert!(matches!(err, FrameError::BoxOverrun { size: u32::MAX, .. }));
    }

    #[test]
    fn read_i16_little_endian() {
        assert_eq!(read_i16(BNID, &[0xFE, 0xFF]).unwrap(), -2);
        assert!(matches!(
            read_i16(BNID, &[0x01]),
            Err(FrameError::PayloadTooShort {
                expected: 2,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn read_f32s_little_endian() {
        let mut payload = BytesMut::new();
        payload.put_f32_le(1.5);
        payload.put_f32_le(-2.0);

        let values: [f32; 2] = read_f32s(TRAN, &payload).unwrap();
        assert_eq!(values, [1.5, -2.0]);

        let err = read_f32s::<7>(TRAN, &payload).unwrap_err();
        assert_eq!(
            err,
            FrameError::PayloadTooShort {
                tag: TRAN,
                expected: 28,
                actual: 8
            }
        );
    }
}
