//! Out-of-band gesture injection and foreground-app introspection.
//!
//! A [`ControlHandle`] is a `static` shared between the runtime and any
//! control surface (headless stdin, tests). Triggers are queued and delivered
//! through the same dispatch path as decoded gestures.

use core::{
    cell::RefCell,
    sync::atomic::{AtomicBool, Ordering},
};

use embassy_sync::{
    blocking_mutex::{Mutex, raw::CriticalSectionRawMutex},
    channel::Channel,
};
use log::debug;

use crate::{gesture::Gesture, scheduler::AppInfo};

pub const CONTROL_QUEUE_DEPTH: usize = 8;

/// Result of a trigger request, reported back to the control surface.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ControlOutcome {
    pub success: bool,
    pub message: &'static str,
}

impl ControlOutcome {
    const fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }

    const fn failed(message: &'static str) -> Self {
        Self {
            success: false,
            message,
        }
    }
}

pub struct ControlHandle {
    triggers: Channel<CriticalSectionRawMutex, Gesture, CONTROL_QUEUE_DEPTH>,
    attached: AtomicBool,
    info: Mutex<CriticalSectionRawMutex, RefCell<AppInfo>>,
}

impl Default for ControlHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlHandle {
    pub const fn new() -> Self {
        Self {
            triggers: Channel::new(),
            attached: AtomicBool::new(false),
            info: Mutex::new(RefCell::new(AppInfo::empty())),
        }
    }

    /// Marks a running scheduler as the trigger consumer.
    pub fn attach(&self, info: AppInfo) {
        self.publish(info);
        self.attached.store(true, Ordering::Release);
    }

    /// Stops accepting triggers and drops anything still queued.
    pub fn detach(&self) {
        self.attached.store(false, Ordering::Release);
        self.triggers.clear();
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    pub fn trigger(&self, gesture: Gesture) -> ControlOutcome {
        if !self.is_attached() {
            return ControlOutcome::failed("scheduler not running");
        }
        if self.triggers.try_send(gesture).is_err() {
            return ControlOutcome::failed("control queue full");
        }
        debug!("control: queued {}", gesture);
        ControlOutcome::ok(match gesture {
            Gesture::SinglePress => "single press triggered",
            Gesture::DoublePress => "double press triggered",
            Gesture::TriplePress => "triple press triggered",
            Gesture::LongPress => "long press triggered",
            Gesture::RotateLeft => "rotate left triggered",
            Gesture::RotateRight => "rotate right triggered",
        })
    }

    pub fn trigger_single_press(&self) -> ControlOutcome {
        self.trigger(Gesture::SinglePress)
    }

    pub fn trigger_double_press(&self) -> ControlOutcome {
        self.trigger(Gesture::DoublePress)
    }

    pub fn trigger_triple_press(&self) -> ControlOutcome {
        self.trigger(Gesture::TriplePress)
    }

    pub fn trigger_long_press(&self) -> ControlOutcome {
        self.trigger(Gesture::LongPress)
    }

    pub fn trigger_rotate_left(&self) -> ControlOutcome {
        self.trigger(Gesture::RotateLeft)
    }

    pub fn trigger_rotate_right(&self) -> ControlOutcome {
        self.trigger(Gesture::RotateRight)
    }

    /// Waits for the next queued trigger.
    pub async fn next_trigger(&self) -> Gesture {
        self.triggers.receive().await
    }

    pub fn try_next_trigger(&self) -> Option<Gesture> {
        self.triggers.try_receive().ok()
    }

    pub fn publish(&self, info: AppInfo) {
        self.info.lock(|cell| *cell.borrow_mut() = info);
    }

    pub fn current_app_info(&self) -> AppInfo {
        self.info.lock(|cell| cell.borrow().clone())
    }
}
