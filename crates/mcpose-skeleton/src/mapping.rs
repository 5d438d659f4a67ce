//! Protocol bone id ↔ canonical joint table.
//!
//! The sender's left-side arm and leg ids (11-14, 19-22) land on this
//! skeleton's right-side joints and vice versa, ahead of the mirror pass.
//! Id 26 has no entry; left toes arrive as 27.

use crate::joint::Joint;

/// Table entries in the order the mirror pass visits them.
pub const BONE_TABLE: [(i16, Joint); Joint::COUNT] = [
    (0, Joint::Hips),
    (3, Joint::Spine),
    (5, Joint::Chest),
    (8, Joint::Neck),
    (10, Joint::Head),
    (11, Joint::RightShoulder),
    (12, Joint::RightUpperArm),
    (13, Joint::RightLowerArm),
    (14, Joint::RightHand),
    (15, Joint::LeftShoulder),
    (16, Joint::LeftUpperArm),
    (17, Joint::LeftLowerArm),
    (18, Joint::LeftHand),
    (19, Joint::RightUpperLeg),
    (20, Joint::RightLowerLeg),
    (21, Joint::RightFoot),
    (22, Joint::RightToes),
    (23, Joint::LeftUpperLeg),
    (24, Joint::LeftLowerLeg),
    (25, Joint::LeftFoot),
    (27, Joint::LeftToes),
];

/// Resolve a protocol bone id. Unknown ids, including the unset sentinel, give `None`.
pub const fn joint_for_bone(bone_id: i16) -> Option<Joint> {
    let joint = match bone_id {
        0 => Joint::Hips,
        3 => Joint::Spine,
        5 => Joint::Chest,
        8 => Joint::Neck,
        10 => Joint::Head,
        11 => Joint::RightShoulder,
        12 => Joint::RightUpperArm,
        13 => Joint::RightLowerArm,
        14 => Joint::RightHand,
        15 => Joint::LeftShoulder,
        16 => Joint::LeftUpperArm,
        17 => Joint::LeftLowerArm,
        18 => Joint::LeftHand,
        19 => Joint::RightUpperLeg,
        20 => Joint::RightLowerLeg,
        21 => Joint::RightFoot,
        22 => Joint::RightToes,
        23 => Joint::LeftUpperLeg,
        24 => Joint::LeftLowerLeg,
        25 => Joint::LeftFoot,
        27 => Joint::LeftToes,
        _ => return None,
    };
    Some(joint)
}

/// Protocol bone id that resolves to `joint`.
pub const fn bone_for_joint(joint: Joint) -> i16 {
    match joint {
        Joint::Hips => 0,
        Joint::Spine => 3,
        Joint::Chest => 5,
        Joint::Neck => 8,
        Joint::Head => 10,
        Joint::RightShoulder => 11,
        Joint::RightUpperArm => 12,
        Joint::RightLowerArm => 13,
        Joint::RightHand => 14,
        Joint::LeftShoulder => 15,
        Joint::LeftUpperArm => 16,
        Joint::LeftLowerArm => 17,
        Joint::LeftHand => 18,
        Joint::RightUpperLeg => 19,
        Joint::RightLowerLeg => 20,
        Joint::RightFoot => 21,
        Joint::RightToes => 22,
        Joint::LeftUpperLeg => 23,
        Joint::LeftLowerLeg => 24,
        Joint::LeftFoot => 25,
        Joint::LeftToes => 27,
    }
}
