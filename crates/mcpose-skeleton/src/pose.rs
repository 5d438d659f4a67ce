use glam::Vec3;
use mcpose_frame::BoneTransform;
use tracing::trace;

use crate::joint::Joint;
use crate::mapping::joint_for_bone;
use crate::store::JointStore;

/// Outcome of one [`apply_pose`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Transforms written to the store.
    pub applied: usize,
    /// Transforms whose bone id did not resolve.
    pub skipped: usize,
}

/// Write parsed transforms onto `store` in arrival order.
///
/// Rotations are copied verbatim. The root joint additionally receives its
/// position with the X axis negated; no other joint gets a position.
pub fn apply_pose<S: JointStore + ?Sized>(store: &mut S, bones: &[BoneTransform]) -> ApplyReport {
    let mut report = ApplyReport::default();

    for bone in bones {
        let Some(joint) = joint_for_bone(bone.bone_id) else {
            trace!(bone_id = bone.bone_id, "unmapped bone id");
            report.skipped += 1;
            continue;
        };

        store.set_local_rotation(joint, bone.rotation);
        if joint == Joint::ROOT {
            store.set_local_position(joint, root_position(bone.position));
        }
        report.applied += 1;
    }

    report
}

/// Capture-space root position to rig space: `(-x, y, z)`.
pub fn root_position(position: Vec3) -> Vec3 {
    Vec3::new(-position.x, position.y, position.z)
}
