use std::ops::ControlFlow;

use embassy_futures::{
    select::{Either3, select3},
    yield_now,
};
use embassy_time::{Instant, Timer};
use ledboard_core::{
    frame::FrameLoop,
    gesture::{Gesture, GestureDecoder},
    scheduler::{DispatchOutcome, Scheduler},
};
use ledboard_hal_linux::platform::{display::HostPanel, terminal::TerminalSession};
use log::{debug, info};

use super::{
    host_io::{CONTROL, HOST_EVENTS, HostEvent},
    now_ms, shutdown,
};

pub(super) struct Board {
    pub(super) scheduler: Scheduler,
    pub(super) decoder: GestureDecoder,
    pub(super) frames: FrameLoop<HostPanel>,
    pub(super) frame_interval_ms: u64,
    pub(super) frame_limit: Option<u64>,
    pub(super) terminal: Option<TerminalSession>,
}

fn dispatch(scheduler: &mut Scheduler, gesture: Gesture, now_ms: u64) {
    match scheduler.dispatch(gesture, now_ms) {
        DispatchOutcome::SwitchedApp { .. } | DispatchOutcome::Handled => {}
        outcome => debug!("runtime: {} outcome={:?}", gesture, outcome),
    }
}

fn handle_host_event(board: &mut Board, event: HostEvent) -> ControlFlow<()> {
    match event {
        HostEvent::Quit => {
            info!("runtime: quit requested");
            ControlFlow::Break(())
        }
        HostEvent::Input(event) => {
            if let Some(gesture) = board.decoder.on_event(event) {
                dispatch(&mut board.scheduler, gesture, event.at_ms);
            }
            ControlFlow::Continue(())
        }
    }
}

fn drain_host_events(board: &mut Board) -> ControlFlow<()> {
    while let Ok(event) = HOST_EVENTS.try_receive() {
        handle_host_event(board, event)?;
    }
    ControlFlow::Continue(())
}

/// Drives the board until quit: input, control triggers, timers and frames
/// all funnel through this one loop.
pub(super) async fn run(mut board: Board) {
    let started_ms = now_ms();
    board.scheduler.initialize_all(started_ms);
    let mut published = board.scheduler.current_app_info();
    CONTROL.attach(published.clone());

    let frame_interval_ms = board.frame_interval_ms.max(1);
    let mut next_frame_ms = started_ms;
    let mut frame_ticks = 0u64;

    loop {
        let wake_at_ms = [
            board.decoder.next_deadline(),
            board.scheduler.next_background_deadline(),
            Some(next_frame_ms),
        ]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(next_frame_ms);

        match select3(
            HOST_EVENTS.receive(),
            CONTROL.next_trigger(),
            Timer::at(Instant::from_millis(wake_at_ms)),
        )
        .await
        {
            Either3::First(event) => {
                if handle_host_event(&mut board, event).is_break() {
                    break;
                }
            }
            Either3::Second(gesture) => {
                info!("runtime: control trigger {}", gesture);
                dispatch(&mut board.scheduler, gesture, now_ms());
            }
            Either3::Third(()) => {}
        }

        // Edges are stamped on the reader thread; feed every queued one before
        // sampling `now` so timers never run ahead of an earlier edge.
        if drain_host_events(&mut board).is_break() {
            break;
        }
        let now = now_ms();
        while let Some(gesture) = board.decoder.poll(now) {
            dispatch(&mut board.scheduler, gesture, now);
        }
        board.scheduler.run_background(now);

        if now >= next_frame_ms {
            board.frames.tick(&mut board.scheduler, now);
            frame_ticks = frame_ticks.saturating_add(1);
            next_frame_ms = now.saturating_add(frame_interval_ms);

            if board.frame_limit.is_some_and(|limit| frame_ticks >= limit) {
                info!("runtime: frame limit reached frames={}", frame_ticks);
                break;
            }
        }

        let info = board.scheduler.current_app_info();
        if info != published {
            CONTROL.publish(info.clone());
            published = info;
        }

        yield_now().await;
    }

    shutdown::shut_down(&mut board);
}
