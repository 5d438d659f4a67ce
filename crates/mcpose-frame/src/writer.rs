use bytes::{BufMut, Bytes, BytesMut};
use glam::{Quat, Vec3};

use crate::codec::{encode_box, encode_container, put_header, HEADER_SIZE};
use crate::error::Result;
use crate::tag::{Tag, BNID, BTDT, BTRS, FRAM, TRAN};

/// Frame number box. Not interpreted by the parser.
const FNUM: Tag = Tag(*b"fnum");

const BNID_PAYLOAD_SIZE: usize = 2;
const TRAN_PAYLOAD_SIZE: usize = 28;
const BNID_BOX_SIZE: usize = HEADER_SIZE + BNID_PAYLOAD_SIZE;
const TRAN_BOX_SIZE: usize = HEADER_SIZE + TRAN_PAYLOAD_SIZE;
const BTDT_BOX_SIZE: usize = HEADER_SIZE + BNID_BOX_SIZE + TRAN_BOX_SIZE;

/// Builds a complete datagram: `fram { fnum?, btrs { btdt { bnid, tran }* } }`.
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    frame_number: Option<u32>,
    bones: BytesMut,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit an `fnum` box ahead of the bone array.
    pub fn frame_number(mut self, frame_number: u32) -> Self {
        self.frame_number = Some(frame_number);
        self
    }

    /// Append one `btdt` bone entry.
    pub fn bone(mut self, bone_id: i16, rotation: Quat, position: Vec3) -> Self {
        encode_bone(bone_id, rotation, position, &mut self.bones);
        self
    }

    /// Encode the finished datagram.
    ///
    /// Fails only when the bone array outgrows a 32-bit box size.
    pub fn build(self) -> Result<Bytes> {
        let fnum_len = if self.frame_number.is_some() {
            HEADER_SIZE + 4
        } else {
            0
        };
        let btrs_len = HEADER_SIZE + self.bones.len();

        let mut dst = BytesMut::with_capacity(HEADER_SIZE + fnum_len + btrs_len);
        encode_container(FRAM, fnum_len + btrs_len, &mut dst)?;
        if let Some(n) = self.frame_number {
            encode_box(FNUM, &n.to_le_bytes(), &mut dst)?;
        }
        encode_container(BTRS, self.bones.len(), &mut dst)?;
        dst.extend_from_slice(&self.bones);
        Ok(dst.freeze())
    }
}

/// Append `btdt { bnid, tran }` for one bone.
pub fn encode_bone(bone_id: i16, rotation: Quat, position: Vec3, dst: &mut BytesMut) {
    let mut tran = [0u8; TRAN_PAYLOAD_SIZE];
    let mut fields = &mut tran[..];
    for v in [
        rotation.x, rotation.y, rotation.z, rotation.w, position.x, position.y, position.z,
    ] {
        fields.put_f32_le(v);
    }

    dst.reserve(BTDT_BOX_SIZE);
    put_header(BTDT, (BNID_BOX_SIZE + TRAN_BOX_SIZE) as u32, dst);
    put_header(BNID, BNID_PAYLOAD_SIZE as u32, dst);
    dst.put_slice(&bone_id.to_le_bytes());
    put_header(TRAN, TRAN_PAYLOAD_SIZE as u32, dst);
    dst.put_slice(&tran);
}
