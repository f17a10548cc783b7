use std::sync::atomic::{AtomicBool, Ordering};

use ledboard_core::scheduler::ShutdownOutcome;
use log::{debug, info, warn};

use super::{
    host_io::{self, CONTROL},
    runtime::Board,
};

static SHUTDOWN_STARTED: AtomicBool = AtomicBool::new(false);

/// Stops apps, blanks the panel and hands the terminal back. Safe to call
/// more than once; only the first call does anything.
pub(super) fn shut_down(board: &mut Board) {
    if SHUTDOWN_STARTED.swap(true, Ordering::AcqRel) {
        debug!("shutdown: already in progress");
        return;
    }

    CONTROL.detach();
    host_io::request_stop();

    match board.scheduler.request_quit() {
        ShutdownOutcome::Completed { failures: 0 } => info!("shutdown: apps stopped"),
        ShutdownOutcome::Completed { failures } => {
            warn!("shutdown: apps stopped with {} exit failures", failures)
        }
        ShutdownOutcome::AlreadyStopped => debug!("shutdown: apps already stopped"),
    }

    if let Err(err) = board.frames.blank() {
        warn!("shutdown: panel blank failed err={:?}", err);
    }
    if let Some(mut terminal) = board.terminal.take() {
        terminal.restore();
    }

    info!(
        "shutdown: complete frames_pushed={}",
        board.frames.stats().pushed
    );
}
