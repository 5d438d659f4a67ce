//! Humanoid joint mapping, pose application and mirroring.
//!
//! Parsed bone transforms are resolved to canonical [`Joint`]s through a
//! fixed table, written onto any [`JointStore`], then mirrored left/right in
//! the same frame.

pub mod joint;
pub mod mapping;
pub mod mirror;
pub mod pose;
pub mod store;

pub use joint::Joint;
pub use mapping::{bone_for_joint, joint_for_bone, BONE_TABLE};
pub use mirror::{mirror_pair, mirror_pose, mirror_rotation, MIRROR_PAIRS};
pub use pose::{apply_pose, root_position, ApplyReport};
pub use store::{JointPose, JointStore, Skeleton};
