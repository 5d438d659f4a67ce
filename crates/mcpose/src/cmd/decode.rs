use std::fs;
use std::io::{self, Read};
use std::path::Path;

use mcpose_frame::{parse_message, DecodeConfig};
use mcpose_receiver::{process_datagram, CycleReport};
use mcpose_skeleton::Skeleton;
use tracing::warn;

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, receiver_error, CliResult, SUCCESS};
use crate::output::{print_bones, print_pose, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = read_input(&args.file)?;

    if args.apply {
        let mut skeleton = Skeleton::new();
        let frame = process_datagram(&mut skeleton, &payload, &DecodeConfig::default())
            .map_err(|err| receiver_error("decode failed", err))?;
        if frame.truncated {
            warn!("datagram truncated at iteration limit");
        }
        let report = CycleReport {
            datagrams: 1,
            frames: 1,
            bones_applied: frame.applied,
            bones_skipped: frame.skipped,
            ..CycleReport::default()
        };
        print_pose(&skeleton, Some(&report), format);
    } else {
        let parsed = parse_message(&payload).map_err(|err| frame_error("decode failed", err))?;
        if parsed.truncated {
            warn!(
                boxes = parsed.boxes_visited,
                "datagram truncated at iteration limit"
            );
        }
        print_bones(&parsed, format);
    }

    Ok(SUCCESS)
}

fn read_input(path: &Path) -> CliResult<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .map_err(|err| io_error("failed reading stdin", err))?;
        return Ok(buf);
    }
    fs::read(path).map_err(|err| io_error(&format!("failed reading {}", path.display()), err))
}
