//! Cooperative scheduler: one foreground app, per-app background timers.

use alloc::{boxed::Box, vec::Vec};
use core::fmt;

use log::{debug, info, warn};

use crate::{
    app::{App, AppContext, AppResult, BackgroundRequest},
    display::Canvas,
    gesture::Gesture,
};


pub const APP_NAME_BYTES: usize = 32;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SchedulerConfig {
    /// How long the capture badge stays visible after a capture change.
    pub capture_indicator_ms: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            capture_indicator_ms: 2_500,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SchedulerError {
    NoApps,
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerError::NoApps => f.write_str("scheduler needs at least one app"),
        }
    }
}

impl core::error::Error for SchedulerError {}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Lifecycle {
    Created,
    Running,
    Stopped,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DispatchOutcome {
    Handled,
    SwitchedApp { from: usize, to: usize },
    /// The active app has no handler for the gesture.
    Ignored,
    /// The handler ran and reported an error.
    Failed,
    NotRunning,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShutdownOutcome {
    Completed { failures: usize },
    AlreadyStopped,
}

/// Which app is in the foreground.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AppInfo {
    pub current_index: usize,
    pub app_count: usize,
    pub app_name: heapless::String<APP_NAME_BYTES>,
}

impl AppInfo {
    pub const fn empty() -> Self {
        Self {
            current_index: 0,
            app_count: 0,
            app_name: heapless::String::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct BackgroundTimer {
    interval_ms: u32,
    next_due_ms: Option<u64>,
}

impl BackgroundTimer {
    fn arm(&mut self, interval_ms: u32, now_ms: u64) {
        let interval_ms = interval_ms.max(1);
        self.interval_ms = interval_ms;
        self.next_due_ms = Some(now_ms.saturating_add(interval_ms as u64));
    }

    fn cancel(&mut self) {
        self.next_due_ms = None;
    }

    fn is_due(&self, now_ms: u64) -> bool {
        self.next_due_ms.is_some_and(|due| now_ms >= due)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct CaptureIndicator {
    capture: bool,
    start_ms: u64,
    duration_ms: u32,
}

impl CaptureIndicator {
    fn visible(self, now_ms: u64) -> Option<bool> {
        let elapsed = now_ms.saturating_sub(self.start_ms);
        (elapsed < self.duration_ms as u64).then_some(self.capture)
    }
}

struct AppSlot {
    app: Box<dyn App>,
    capture: bool,
    background: BackgroundTimer,
}

/// Owns every app, tracks the foreground one and routes gestures.
pub struct Scheduler {
    slots: Vec<AppSlot>,
    current: usize,
    lifecycle: Lifecycle,
    config: SchedulerConfig,
    indicator: Option<CaptureIndicator>,
}

impl Scheduler {
    pub fn new(apps: Vec<Box<dyn App>>, config: SchedulerConfig) -> Result<Self, SchedulerError> {
        if apps.is_empty() {
            return Err(SchedulerError::NoApps);
        }

        let slots = apps
            .into_iter()
            .map(|app| AppSlot {
                app,
                capture: false,
                background: BackgroundTimer::default(),
            })
            .collect();

        Ok(Self {
            slots,
            current: 0,
            lifecycle: Lifecycle::Created,
            config,
            indicator: None,
        })
    }

    pub fn app_count(&self) -> usize {
        self.slots.len()
    }

    pub const fn current_index(&self) -> usize {
        self.current
    }

    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn current_app_name(&self) -> &str {
        self.slots[self.current].app.name()
    }

    pub fn current_captures_press(&self) -> bool {
        self.slots[self.current].capture
    }

    /// Next background tick instant for the app at `index`, if armed.
    pub fn background_due_at(&self, index: usize) -> Option<u64> {
        self.slots.get(index).and_then(|slot| slot.background.next_due_ms)
    }

    pub fn current_app_info(&self) -> AppInfo {
        let mut app_name = heapless::String::new();
        for ch in self.current_app_name().chars() {
            if app_name.push(ch).is_err() {
                break;
            }
        }
        AppInfo {
            current_index: self.current,
            app_count: self.slots.len(),
            app_name,
        }
    }

    /// Initializes every app in order, arms background timers and activates
    /// the first app.
    pub fn initialize_all(&mut self, now_ms: u64) {
        if self.lifecycle != Lifecycle::Created {
            warn!("scheduler: initialize ignored lifecycle={:?}", self.lifecycle);
            return;
        }

        for index in 0..self.slots.len() {
            if let Some(interval_ms) = self.slots[index].app.background_interval_ms() {
                self.slots[index].background.arm(interval_ms, now_ms);
            }
            let _ = self.run_hook(index, now_ms, "initialize", |app, ctx| app.initialize(ctx));
        }

        self.lifecycle = Lifecycle::Running;
        self.current = 0;
        let _ = self.run_hook(0, now_ms, "activate", |app, ctx| app.on_activate(ctx));
        info!(
            "scheduler: running apps={} current={}",
            self.slots.len(),
            self.current_app_name()
        );
    }

    /// Deactivates the foreground app and activates the next one, wrapping.
    pub fn switch_to_next(&mut self, now_ms: u64) -> Option<(usize, usize)> {
        if self.lifecycle != Lifecycle::Running {
            return None;
        }

        let from = self.current;
        let to = (from + 1) % self.slots.len();
        let _ = self.run_hook(from, now_ms, "deactivate", |app, ctx| app.on_deactivate(ctx));
        self.current = to;
        self.indicator = None;
        let _ = self.run_hook(to, now_ms, "activate", |app, ctx| app.on_activate(ctx));
        info!(
            "scheduler: switched {} -> {} app={}",
            from,
            to,
            self.current_app_name()
        );
        Some((from, to))
    }

    /// Routes one gesture to the foreground app.
    pub fn dispatch(&mut self, gesture: Gesture, now_ms: u64) -> DispatchOutcome {
        if self.lifecycle != Lifecycle::Running {
            debug!("scheduler: {} dropped, not running", gesture);
            return DispatchOutcome::NotRunning;
        }

        let slot = &self.slots[self.current];
        if gesture == Gesture::SinglePress && !slot.capture {
            return match self.switch_to_next(now_ms) {
                Some((from, to)) => DispatchOutcome::SwitchedApp { from, to },
                None => DispatchOutcome::NotRunning,
            };
        }

        if !slot.app.gestures().contains(gesture) {
            debug!("scheduler: {} ignored by app={}", gesture, slot.app.name());
            return DispatchOutcome::Ignored;
        }

        match self.run_hook(self.current, now_ms, "gesture", |app, ctx| {
            app.on_gesture(gesture, ctx)
        }) {
            Ok(()) => DispatchOutcome::Handled,
            Err(_) => DispatchOutcome::Failed,
        }
    }

    /// Fires every background timer that is due. Returns how many fired.
    pub fn run_background(&mut self, now_ms: u64) -> usize {
        if self.lifecycle != Lifecycle::Running {
            return 0;
        }

        let mut fired = 0;
        for index in 0..self.slots.len() {
            let timer = &mut self.slots[index].background;
            if !timer.is_due(now_ms) {
                continue;
            }
            let interval_ms = timer.interval_ms;
            timer.arm(interval_ms, now_ms);
            let _ = self.run_hook(index, now_ms, "background", |app, ctx| {
                app.on_background_tick(ctx)
            });
            fired += 1;
        }
        fired
    }

    /// Earliest armed background tick across all apps.
    pub fn next_background_deadline(&self) -> Option<u64> {
        if self.lifecycle != Lifecycle::Running {
            return None;
        }
        self.slots
            .iter()
            .filter_map(|slot| slot.background.next_due_ms)
            .min()
    }

    /// Renders the foreground app. Draws nothing unless running.
    pub fn render(&mut self, canvas: &mut Canvas, now_ms: u64) -> AppResult {
        if self.lifecycle != Lifecycle::Running {
            return Ok(());
        }
        self.slots[self.current].app.render(canvas, now_ms)
    }

    /// Capture badge state to overlay, while the indicator is still showing.
    pub fn capture_indicator(&self, now_ms: u64) -> Option<bool> {
        self.indicator.and_then(|indicator| indicator.visible(now_ms))
    }

    /// Cancels every background timer and runs every exit hook once.
    pub fn request_quit(&mut self) -> ShutdownOutcome {
        if self.lifecycle == Lifecycle::Stopped {
            return ShutdownOutcome::AlreadyStopped;
        }

        let mut failures = 0;
        for slot in &mut self.slots {
            slot.background.cancel();
            if let Err(err) = slot.app.on_exit() {
                warn!("scheduler: exit failed app={} err={}", slot.app.name(), err);
                failures += 1;
            }
        }

        self.lifecycle = Lifecycle::Stopped;
        self.indicator = None;
        info!(
            "scheduler: shutdown complete apps={} failures={}",
            self.slots.len(),
            failures
        );
        ShutdownOutcome::Completed { failures }
    }

    fn run_hook<F>(&mut self, index: usize, now_ms: u64, hook: &'static str, f: F) -> AppResult
    where
        F: FnOnce(&mut dyn App, &mut AppContext) -> AppResult,
    {
        let slot = &mut self.slots[index];
        let mut ctx = AppContext::new(now_ms, slot.capture);
        let result = f(slot.app.as_mut(), &mut ctx);
        if let Err(err) = &result {
            warn!(
                "scheduler: {} failed app={} err={}",
                hook,
                slot.app.name(),
                err
            );
        }
        self.apply_context(index, &ctx, now_ms);
        result
    }

    fn apply_context(&mut self, index: usize, ctx: &AppContext, now_ms: u64) {
        let slot = &mut self.slots[index];

        if let Some(capture) = ctx.requested_capture() {
            if capture != slot.capture {
                slot.capture = capture;
                info!(
                    "scheduler: capture {} app={}",
                    if capture { "on" } else { "off" },
                    slot.app.name()
                );
                if index == self.current {
                    self.indicator = Some(CaptureIndicator {
                        capture,
                        start_ms: now_ms,
                        duration_ms: self.config.capture_indicator_ms,
                    });
                }
            }
        }

        match ctx.background_request() {
            BackgroundRequest::Keep => {}
            BackgroundRequest::Rearm(interval_ms) => slot.background.arm(interval_ms, now_ms),
            BackgroundRequest::Pause => slot.background.cancel(),
        }
    }
}
