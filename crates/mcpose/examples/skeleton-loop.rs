//! Receive on an ephemeral loopback port, feed it a few generated frames and
//! print the mirrored pose after each processing cycle.
//!
//! Run with: cargo run -p mcpose --example skeleton-loop

use std::net::{Ipv4Addr, UdpSocket};
use std::thread;
use std::time::Duration;

use glam::{Quat, Vec3};
use mcpose::frame::MessageBuilder;
use mcpose::receiver::{MotionReceiver, ReceiverConfig};
use mcpose::skeleton::{bone_for_joint, Joint, JointStore, Skeleton};
use mcpose::transport::ListenerConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut receiver = MotionReceiver::new(ReceiverConfig {
        listener: ListenerConfig::default()
            .with_bind_addr(Ipv4Addr::LOCALHOST.into())
            .with_port(0),
        ..ReceiverConfig::default()
    });
    let addr = receiver.listen()?;
    println!("listening on {addr}");

    let sender = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0))?;
    let mut skeleton = Skeleton::new();

    for step in 0..5u32 {
        let angle = step as f32 * 0.2;
        let frame = MessageBuilder::new()
            .frame_number(step)
            .bone(
                bone_for_joint(Joint::Hips),
                Quat::IDENTITY,
                Vec3::new(0.1 * step as f32, 0.9, 0.0),
            )
            .bone(
                bone_for_joint(Joint::LeftUpperArm),
                Quat::from_rotation_z(angle),
                Vec3::ZERO,
            )
            .build()?;
        sender.send_to(&frame, addr)?;

        thread::sleep(Duration::from_millis(50));
        let report = receiver.process_pending(&mut skeleton);
        println!(
            "cycle {step}: frames={} applied={} hips={:?} right_upper_arm={:?}",
            report.frames,
            report.bones_applied,
            skeleton.local_position(Joint::Hips),
            skeleton.local_rotation(Joint::RightUpperArm),
        );
    }

    receiver.stop();
    Ok(())
}
