//! Canonical humanoid joints.

use std::fmt;

use serde::Serialize;

/// Canonical joint identifier, independent of any protocol's bone numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Hips,
    Spine,
    Chest,
    Neck,
    Head,
    LeftShoulder,
    LeftUpperArm,
    LeftLowerArm,
    LeftHand,
    RightShoulder,
    RightUpperArm,
    RightLowerArm,
    RightHand,
    LeftUpperLeg,
    LeftLowerLeg,
    LeftFoot,
    LeftToes,
    RightUpperLeg,
    RightLowerLeg,
    RightFoot,
    RightToes,
}

impl Joint {
    /// Number of canonical joints.
    pub const COUNT: usize = 21;

    /// The root joint; the only one that receives a position.
    pub const ROOT: Joint = Joint::Hips;

    /// All joints in declaration order.
    pub const ALL: [Joint; Self::COUNT] = [
        Joint::Hips,
        Joint::Spine,
        Joint::Chest,
        Joint::Neck,
        Joint::Head,
        Joint::LeftShoulder,
        Joint::LeftUpperArm,
        Joint::LeftLowerArm,
        Joint::LeftHand,
        Joint::RightShoulder,
        Joint::RightUpperArm,
        Joint::RightLowerArm,
        Joint::RightHand,
        Joint::LeftUpperLeg,
        Joint::LeftLowerLeg,
        Joint::LeftFoot,
        Joint::LeftToes,
        Joint::RightUpperLeg,
        Joint::RightLowerLeg,
        Joint::RightFoot,
        Joint::RightToes,
    ];

    /// Dense index in `0..COUNT`, usable for array-backed stores.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Joint::Hips => "hips",
            Joint::Spine => "spine",
            Joint::Chest => "chest",
            Joint::Neck => "neck",
            Joint::Head => "head",
            Joint::LeftShoulder => "left_shoulder",
            Joint::LeftUpperArm => "left_upper_arm",
            Joint::LeftLowerArm => "left_lower_arm",
            Joint::LeftHand => "left_hand",
            Joint::RightShoulder => "right_shoulder",
            Joint::RightUpperArm => "right_upper_arm",
            Joint::RightLowerArm => "right_lower_arm",
            Joint::RightHand => "right_hand",
            Joint::LeftUpperLeg => "left_upper_leg",
            Joint::LeftLowerLeg => "left_lower_leg",
            Joint::LeftFoot => "left_foot",
            Joint::LeftToes => "left_toes",
            Joint::RightUpperLeg => "right_upper_leg",
            Joint::RightLowerLeg => "right_lower_leg",
            Joint::RightFoot => "right_foot",
            Joint::RightToes => "right_toes",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_all_order() {
        for (i, joint) in Joint::ALL.iter().enumerate() {
            assert_eq!(joint.index(), i);
        }
    }

    #[test]
    fn serde_name_matches_display() {
        for joint in Joint::ALL {
            let json = serde_json::to_string(&joint).unwrap();
            assert_eq!(json, format!("\"{joint}\""));
        }
    }
}
