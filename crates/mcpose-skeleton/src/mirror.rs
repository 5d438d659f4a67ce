use glam::Quat;

use crate::joint::Joint;
use crate::mapping::BONE_TABLE;
use crate::store::JointStore;

/// Left/right joint pairs swapped by [`mirror_pose`].
pub const MIRROR_PAIRS: [(Joint, Joint); 8] = [
    (Joint::LeftShoulder, Joint::RightShoulder),
    (Joint::LeftUpperArm, Joint::RightUpperArm),
    (Joint::LeftLowerArm, Joint::RightLowerArm),
    (Joint::LeftHand, Joint::RightHand),
    (Joint::LeftUpperLeg, Joint::RightUpperLeg),
    (Joint::LeftLowerLeg, Joint::RightLowerLeg),
    (Joint::LeftFoot, Joint::RightFoot),
    (Joint::LeftToes, Joint::RightToes),
];

/// Reflect a rotation across the sagittal plane: `(x, -y, -z, w)`.
pub fn mirror_rotation(q: Quat) -> Quat {
    Quat::from_xyzw(q.x, -q.y, -q.z, q.w)
}

/// The pair `joint` belongs to, if any.
pub fn mirror_pair(joint: Joint) -> Option<(Joint, Joint)> {
    MIRROR_PAIRS
        .iter()
        .copied()
        .find(|&(left, right)| left == joint || right == joint)
}

/// Mirror every mapped joint's rotation in place.
///
/// Paired joints swap rotations, each reflected; each pair is handled once,
/// when the walk reaches its left member. Unpaired joints are reflected in
/// place. Positions are untouched.
pub fn mirror_pose<S: JointStore + ?Sized>(store: &mut S) {
    for (_, joint) in BONE_TABLE {
        match mirror_pair(joint) {
            Some((left, right)) if left == joint => {
                let left_rot = store.local_rotation(left);
                let right_rot = store.local_rotation(right);
                store.set_local_rotation(left, mirror_rotation(right_rot));
                store.set_local_rotation(right, mirror_rotation(left_rot));
            }
            Some(_) => {}
            None => {
                let rot = store.local_rotation(joint);
                store.set_local_rotation(joint, mirror_rotation(rot));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::store::Skeleton;

    const UNPAIRED: [Joint; 5] = [
        Joint::Hips,
        Joint::Spine,
        Joint::Chest,
        Joint::Neck,
        Joint::Head,
    ];

    #[test]
    fn reflection_negates_y_and_z() {
        let q = Quat::from_xyzw(0.1, 0.2, 0.3, 0.4);
        assert_eq!(mirror_rotation(q), Quat::from_xyzw(0.1, -0.2, -0.3, 0.4));
        assert_eq!(mirror_rotation(mirror_rotation(q)), q);
    }

    #[test]
    fn pairs_cover_every_limb_joint_once() {
        let paired: Vec<Joint> = MIRROR_PAIRS
            .iter()
            .flat_map(|&(l, r)| [l, r])
            .collect();
        assert_eq!(paired.len(), 16);
        for joint in Joint::ALL {
            let expected = !UNPAIRED.contains(&joint);
            assert_eq!(paired.contains(&joint), expected, "{joint}");
        }
    }

    #[test]
    fn pair_swaps_with_reflection() {
        let mut skeleton = Skeleton::new();
        skeleton.set_local_rotation(Joint::LeftHand, Quat::from_xyzw(0.0, 0.0, 0.0, 1.0));
        skeleton.set_local_rotation(Joint::RightHand, Quat::from_xyzw(0.0, 1.0, 0.0, 0.0));

        mirror_pose(&mut skeleton);

        assert_eq!(
            skeleton.local_rotation(Joint::LeftHand),
            Quat::from_xyzw(0.0, -1.0, 0.0, 0.0)
        );
        assert_eq!(
            skeleton.local_rotation(Joint::RightHand),
            Quat::from_xyzw(0.0, 0.0, 0.0, 1.0)
        );
    }

    #[test]
    fn every_pair_is_swapped_exactly_once() {
        let mut skeleton = Skeleton::new();
        for (i, &(left, right)) in MIRROR_PAIRS.iter().enumerate() {
            let i = i as f32;
            skeleton.set_local_rotation(left, Quat::from_xyzw(i, 1.0, 2.0, 3.0));
            skeleton.set_local_rotation(right, Quat::from_xyzw(-i, 4.0, 5.0, 6.0));
        }

        mirror_pose(&mut skeleton);

        for (i, &(left, right)) in MIRROR_PAIRS.iter().enumerate() {
            let i = i as f32;
            assert_eq!(
                skeleton.local_rotation(left),
                Quat::from_xyzw(-i, -4.0, -5.0, 6.0),
                "{left}"
            );
            assert_eq!(
                skeleton.local_rotation(right),
                Quat::from_xyzw(i, -1.0, -2.0, 3.0),
                "{right}"
            );
        }
    }

    #[test]
    fn unpaired_joints_reflect_in_place_and_twice_is_identity() {
        let q = Quat::from_xyzw(0.1, 0.2, 0.3, 0.9);
        let mut skeleton = Skeleton::new();
        for joint in UNPAIRED {
            skeleton.set_local_rotation(joint, q);
        }

        mirror_pose(&mut skeleton);
        for joint in UNPAIRED {
            assert_eq!(skeleton.local_rotation(joint), mirror_rotation(q), "{joint}");
        }

        mirror_pose(&mut skeleton);
        for joint in UNPAIRED {
            assert_eq!(skeleton.local_rotation(joint), q, "{joint}");
        }
    }

    #[test]
    fn positions_are_untouched() {
        let mut skeleton = Skeleton::new();
        skeleton.set_local_position(Joint::Hips, Vec3::new(-1.0, 2.0, 3.0));
        skeleton.set_local_position(Joint::LeftFoot, Vec3::new(7.0, 8.0, 9.0));

        mirror_pose(&mut skeleton);

        assert_eq!(skeleton.local_position(Joint::Hips), Vec3::new(-1.0, 2.0, 3.0));
        assert_eq!(skeleton.local_position(Joint::LeftFoot), Vec3::new(7.0, 8.0, 9.0));
        assert_eq!(skeleton.local_position(Joint::RightFoot), Vec3::ZERO);
    }
}
