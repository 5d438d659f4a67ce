//! Box tags.
//!
//! Every box carries a 4-character ASCII tag. Only the bone-transform path is
//! interpreted; every other tag is skipped by its declared size.

use std::fmt;

/// A 4-byte box tag, kept as raw bytes so non-ASCII input never fails to decode.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(pub [u8; 4]);

/// Frame container.
pub const FRAM: Tag = Tag(*b"fram");

/// Bone transform array container.
pub const BTRS: Tag = Tag(*b"btrs");

/// Bone data; enters bone scope.
pub const BTDT: Tag = Tag(*b"btdt");

/// Bone id (`i16`, 2 bytes).
pub const BNID: Tag = Tag(*b"bnid");

/// Bone transform (7 × `f32`, 28 bytes).
pub const TRAN: Tag = Tag(*b"tran");

impl Tag {
    /// Build a tag from the first four bytes of `bytes`.
    ///
    /// Returns `None` when fewer than four bytes are given.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        bytes.get(..4)?.try_into().ok().map(Tag)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Returns true for the container tags whose payload holds child boxes.
    pub fn is_container(&self) -> bool {
        matches!(*self, FRAM | BTRS | BTDT)
    }

    /// Returns true if this tag takes part in bone-transform reconstruction.
    pub fn is_recognized(&self) -> bool {
        matches!(*self, FRAM | BTRS | BTDT | BNID | TRAN)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '?'
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag(\"{self}\")")
    }
}

impl From<[u8; 4]> for Tag {
    fn from(bytes: [u8; 4]) -> Self {
        Tag(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_ascii_tag() {
        assert_eq!(TRAN.to_string(), "tran");
        assert_eq!(format!("{:?}", BNID), "Tag(\"bnid\")");
    }

    #[test]
    fn display_replaces_non_graphic_bytes() {
        let tag = Tag([b'a', 0x00, 0xFF, b'z']);
        assert_eq!(tag.to_string(), "a??z");
    }

    #[test]
    fn from_slice_needs_four_bytes() {
        assert_eq!(Tag::from_slice(b"btdtXX"), Some(BTDT));
        assert_eq!(Tag::from_slice(b"btd"), None);
    }

    #[test]
    fn container_and_recognized_sets() {
        assert!(FRAM.is_container());
        assert!(BTRS.is_container());
        assert!(BTDT.is_container());
        assert!(!TRAN.is_container());

        assert!(BNID.is_recognized());
        assert!(!Tag(*b"head").is_recognized());
        assert!(!Tag(*b"skdf").is_recognized());
    }
}
