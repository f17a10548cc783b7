use std::{
    io::{self, BufRead, Write},
    sync::atomic::{AtomicBool, Ordering},
    thread,
};

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};
use ledboard_core::{
    control::ControlHandle,
    input::{Edge, InputEvent, InputProvider, KeyId},
};
use ledboard_hal_linux::{
    control::{HELP, HostCommand, ParseError},
    input::keyboard::{KeyboardConfig, KeyboardInput},
};
use log::{debug, warn};

use super::now_ms;

const HOST_EVENT_QUEUE: usize = 32;

pub(super) enum HostEvent {
    Input(InputEvent),
    Quit,
}

pub(super) static HOST_EVENTS: Channel<CriticalSectionRawMutex, HostEvent, HOST_EVENT_QUEUE> =
    Channel::new();
pub(super) static CONTROL: ControlHandle = ControlHandle::new();
static STOP: AtomicBool = AtomicBool::new(false);

pub(super) fn request_stop() {
    STOP.store(true, Ordering::Release);
}

fn send(event: HostEvent) {
    embassy_futures::block_on(HOST_EVENTS.send(event));
}

/// Reads the terminal keyboard on its own thread and forwards raw edges.
pub(super) fn spawn_keyboard(config: KeyboardConfig) -> io::Result<()> {
    thread::Builder::new()
        .name("keyboard".into())
        .spawn(move || {
            let mut keyboard = KeyboardInput::new(config, now_ms);
            while !STOP.load(Ordering::Acquire) {
                match keyboard.poll_event() {
                    Ok(Some(event)) if event.key == KeyId::Quit => {
                        if event.edge == Edge::Down {
                            send(HostEvent::Quit);
                        }
                    }
                    Ok(Some(event)) => send(HostEvent::Input(event)),
                    Ok(None) => {}
                    Err(err) => {
                        warn!("keyboard: read failed err={:?}", err);
                        send(HostEvent::Quit);
                        break;
                    }
                }
            }
            debug!("keyboard: reader stopped");
        })?;
    Ok(())
}

/// Serves line commands from stdin for headless runs.
pub(super) fn spawn_stdin_commands() -> io::Result<()> {
    thread::Builder::new()
        .name("control".into())
        .spawn(|| {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if !respond(&line) {
                    break;
                }
            }
            debug!("control: stdin closed");
        })?;
    Ok(())
}

/// Handles one command line. Returns false once the reader should stop.
fn respond(line: &str) -> bool {
    let mut out = io::stdout().lock();
    let _ = match HostCommand::parse(line) {
        Ok(HostCommand::Trigger(gesture)) => {
            let outcome = CONTROL.trigger(gesture);
            let status = if outcome.success { "ok" } else { "error" };
            writeln!(out, "{status}: {}", outcome.message)
        }
        Ok(HostCommand::Info) => {
            let info = CONTROL.current_app_info();
            writeln!(
                out,
                "app {}/{}: {}",
                info.current_index + 1,
                info.app_count,
                info.app_name
            )
        }
        Ok(HostCommand::Quit) => {
            send(HostEvent::Quit);
            return false;
        }
        Ok(HostCommand::Help) => writeln!(out, "{HELP}"),
        Err(ParseError::Empty) => Ok(()),
        Err(ParseError::Unknown(word)) => writeln!(out, "error: unknown command {word:?}, {HELP}"),
    };
    true
}
