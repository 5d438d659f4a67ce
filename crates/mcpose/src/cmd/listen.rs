use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use mcpose_receiver::{MotionReceiver, ReceiverConfig};
use mcpose_skeleton::Skeleton;
use mcpose_transport::ListenerConfig;
use tracing::{debug, info};

use crate::cmd::{parse_duration, ListenArgs};
use crate::exit::{receiver_error, CliError, CliResult, INTERNAL, SUCCESS, TRANSPORT_ERROR};
use crate::output::{print_pose, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let interval = parse_duration(&args.interval)?;

    let mut listener = ListenerConfig::default()
        .with_bind_addr(args.bind)
        .with_port(args.port);
    if let Some(bytes) = args.recv_buffer {
        listener = listener.with_recv_buffer_size(bytes);
    }

    let mut receiver = MotionReceiver::new(ReceiverConfig {
        listener,
        ..ReceiverConfig::default()
    });
    let addr = receiver
        .listen()
        .map_err(|err| receiver_error("bind failed", err))?;
    info!(%addr, "listening for motion datagrams");

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut skeleton = Skeleton::new();
    let mut processed = 0usize;

    while running.load(Ordering::SeqCst) {
        thread::sleep(interval);

        let report = receiver.process_pending(&mut skeleton);
        if report.datagrams > 0 {
            debug!(?report, "cycle complete");
            if report.frames > 0 {
                print_pose(&skeleton, Some(&report), format);
            }

            processed = processed.saturating_add(report.datagrams);
            if args.count.is_some_and(|count| processed >= count) {
                break;
            }
        }
        ensure_listening(&receiver)?;
    }

    receiver.stop();
    Ok(SUCCESS)
}

fn ensure_listening(receiver: &MotionReceiver) -> CliResult<()> {
    if receiver.is_listening() {
        return Ok(());
    }
    let addr = receiver
        .local_addr()
        .map_or_else(|| "-".to_string(), |a| a.to_string());
    Err(CliError::new(
        TRANSPORT_ERROR,
        format!("receive loop on {addr} stopped; see log for the socket error"),
    ))
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
