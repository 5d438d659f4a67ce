use glam::{Quat, Vec3};
use serde::Serialize;

use crate::joint::Joint;

/// A rig addressable by canonical joint.
///
/// The receiver only mutates the store; ownership stays with the host.
pub trait JointStore {
    fn local_rotation(&self, joint: Joint) -> Quat;
    fn set_local_rotation(&mut self, joint: Joint, rotation: Quat);
    fn local_position(&self, joint: Joint) -> Vec3;
    fn set_local_position(&mut self, joint: Joint, position: Vec3);
}

impl<S: JointStore + ?Sized> JointStore for &mut S {
    fn local_rotation(&self, joint: Joint) -> Quat {
        (**self).local_rotation(joint)
    }

    fn set_local_rotation(&mut self, joint: Joint, rotation: Quat) {
        (**self).set_local_rotation(joint, rotation);
    }

    fn local_position(&self, joint: Joint) -> Vec3 {
        (**self).local_position(joint)
    }

    fn set_local_position(&mut self, joint: Joint, position: Vec3) {
        (**self).set_local_position(joint, position);
    }
}

/// Local transform of a single joint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JointPose {
    pub rotation: Quat,
    pub position: Vec3,
}

impl Default for JointPose {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            position: Vec3::ZERO,
        }
    }
}

/// In-memory joint store: identity rotations and zero positions until written.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    poses: [JointPose; Joint::COUNT],
}

impl Default for Skeleton {
    fn default() -> Self {
        Self {
            poses: [JointPose::default(); Joint::COUNT],
        }
    }
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate joints with their poses in [`Joint::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Joint, &JointPose)> + '_ {
        Joint::ALL.into_iter().zip(self.poses.iter())
    }
}

impl JointStore for Skeleton {
    fn local_rotation(&self, joint: Joint) -> Quat {
        self.poses[joint.index()].rotation
    }

    fn set_local_rotation(&mut self, joint: Joint, rotation: Quat) {
        self.poses[joint.index()].rotation = rotation;
    }

    fn local_position(&self, joint: Joint) -> Vec3 {
        self.poses[joint.index()].position
    }

    fn set_local_position(&mut self, joint: Joint, position: Vec3) {
        self.poses[joint.index()].position = position;
    }
}

impl Serialize for Skeleton {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(Joint::COUNT))?;
        for (joint, pose) in self.iter() {
            map.serialize_entry(&joint, pose)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_rest_pose() {
        let skeleton = Skeleton::new();
        for (_, pose) in skeleton.iter() {
            assert_eq!(pose.rotation, Quat::IDENTITY);
            assert_eq!(pose.position, Vec3::ZERO);
        }
    }

    #[test]
    fn writes_are_per_joint() {
        let mut skeleton = Skeleton::new();
        let rot = Quat::from_xyzw(0.0, 1.0, 0.0, 0.0);
        skeleton.set_local_rotation(Joint::LeftHand, rot);
        skeleton.set_local_position(Joint::Hips, Vec3::new(1.0, 2.0, 3.0));

        assert_eq!(skeleton.local_rotation(Joint::LeftHand), rot);
        assert_eq!(skeleton.local_rotation(Joint::RightHand), Quat::IDENTITY);
        assert_eq!(skeleton.local_position(Joint::Hips), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(skeleton.local_position(Joint::Spine), Vec3::ZERO);
    }

    #[test]
    fn mutable_reference_is_a_store() {
        fn touch(mut store: impl JointStore) {
            store.set_local_rotation(Joint::Head, Quat::from_xyzw(1.0, 0.0, 0.0, 0.0));
        }

        let mut skeleton = Skeleton::new();
        touch(&mut skeleton);
        assert_eq!(
            skeleton.local_rotation(Joint::Head),
            Quat::from_xyzw(1.0, 0.0, 0.0, 0.0)
        );
    }

    #[test]
    fn serializes_as_joint_keyed_map() {
        let skeleton = Skeleton::new();
        let value = serde_json::to_value(&skeleton).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), Joint::COUNT);
        assert!(map.contains_key("hips"));
        assert!(map.contains_key("left_toes"));
        assert_eq!(map["hips"]["rotation"], serde_json::json!([0.0, 0.0, 0.0, 1.0]));
    }
}
