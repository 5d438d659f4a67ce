use std::fs;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::thread;

use bytes::Bytes;
use glam::{Quat, Vec3};
use mcpose_frame::MessageBuilder;
use tracing::debug;

use crate::cmd::{parse_duration, SendArgs};
use crate::exit::{frame_error, io_error, CliError, CliResult, SUCCESS, USAGE};

pub fn run(args: SendArgs) -> CliResult<i32> {
    let payload = resolve_payload(&args)?;
    let interval = parse_duration(&args.interval)?;
    if args.repeat == 0 {
        return Err(CliError::new(USAGE, "--repeat must be greater than zero"));
    }

    let local: SocketAddr = if args.to.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };
    let socket = UdpSocket::bind(local).map_err(|err| io_error("bind failed", err))?;

    for n in 0..args.repeat {
        if n > 0 {
            thread::sleep(interval);
        }
        let sent = socket
            .send_to(&payload, args.to)
            .map_err(|err| io_error("send failed", err))?;
        debug!(to = %args.to, bytes = sent, "datagram sent");
    }

    Ok(SUCCESS)
}

fn resolve_payload(args: &SendArgs) -> CliResult<Bytes> {
    if let Some(path) = &args.file {
        return fs::read(path)
            .map(Bytes::from)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }

    let Some(bone) = args.bone else {
        return Err(CliError::new(USAGE, "either --file or --bone is required"));
    };
    let rotation = quat_from_args(&args.rotation)?;
    let position = vec3_from_args(&args.position)?;

    MessageBuilder::new()
        .bone(bone, rotation, position)
        .build()
        .map_err(|err| frame_error("encode failed", err))
}

fn quat_from_args(values: &[f32]) -> CliResult<Quat> {
    match values {
        [x, y, z, w] => Ok(Quat::from_xyzw(*x, *y, *z, *w)),
        _ => Err(CliError::new(
            USAGE,
            format!("--rotation takes 4 values (x,y,z,w), got {}", values.len()),
        )),
    }
}

fn vec3_from_args(values: &[f32]) -> CliResult<Vec3> {
    match values {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(CliError::new(
            USAGE,
            format!("--position takes 3 values (x,y,z), got {}", values.len()),
        )),
    }
}
