//! App contract: one full-screen program driven by the scheduler.

use alloc::string::String;
use core::fmt;

use crate::{
    display::Canvas,
    gesture::{Gesture, GestureSet},
};

pub type AppResult = Result<(), AppError>;

/// Failure reported by an app hook. The scheduler logs it and keeps running.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AppError {
    /// A resource the app depends on cannot be reached right now.
    Unavailable,
    InvalidState(&'static str),
    /// Error text from an underlying source (file, parser, clock).
    Source(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Unavailable => f.write_str("resource unavailable"),
            AppError::InvalidState(what) => write!(f, "invalid state: {what}"),
            AppError::Source(message) => write!(f, "source error: {message}"),
        }
    }
}

impl core::error::Error for AppError {}

/// Background timer change requested by a hook.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum BackgroundRequest {
    #[default]
    Keep,
    /// Re-arm with a new interval starting now.
    Rearm(u32),
    Pause,
}

/// Scheduler services available to a hook while it runs.
///
/// Requests are applied by the scheduler after the hook returns.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AppContext {
    now_ms: u64,
    capture: bool,
    requested_capture: Option<bool>,
    background: BackgroundRequest,
}

impl AppContext {
    pub const fn new(now_ms: u64, capture: bool) -> Self {
        Self {
            now_ms,
            capture,
            requested_capture: None,
            background: BackgroundRequest::Keep,
        }
    }

    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Whether the app currently receives single presses itself.
    pub fn capture_default_press(&self) -> bool {
        self.requested_capture.unwrap_or(self.capture)
    }

    pub fn set_capture_default_press(&mut self, enabled: bool) {
        self.requested_capture = Some(enabled);
    }

    pub fn toggle_capture_default_press(&mut self) -> bool {
        let enabled = !self.capture_default_press();
        self.set_capture_default_press(enabled);
        enabled
    }

    pub fn rearm_background(&mut self, interval_ms: u32) {
        self.background = BackgroundRequest::Rearm(interval_ms);
    }

    pub fn pause_background(&mut self) {
        self.background = BackgroundRequest::Pause;
    }

    pub const fn requested_capture(&self) -> Option<bool> {
        self.requested_capture
    }

    pub const fn background_request(&self) -> BackgroundRequest {
        self.background
    }
}

/// A full-screen program. Every hook except `render` and `name` is optional.
///
/// Hooks run to completion on the scheduler's thread and must not block.
pub trait App {
    fn name(&self) -> &str;

    /// Draws the whole frame. `canvas` arrives cleared.
    fn render(&mut self, canvas: &mut Canvas, now_ms: u64) -> AppResult;

    /// Gestures this app has handlers for.
    fn gestures(&self) -> GestureSet {
        GestureSet::EMPTY
    }

    fn on_gesture(&mut self, _gesture: Gesture, _ctx: &mut AppContext) -> AppResult {
        Ok(())
    }

    fn initialize(&mut self, _ctx: &mut AppContext) -> AppResult {
        Ok(())
    }

    fn on_activate(&mut self, _ctx: &mut AppContext) -> AppResult {
        Ok(())
    }

    fn on_deactivate(&mut self, _ctx: &mut AppContext) -> AppResult {
        Ok(())
    }

    /// Background tick period armed at initialization. `None` disables it.
    fn background_interval_ms(&self) -> Option<u32> {
        None
    }

    fn on_background_tick(&mut self, _ctx: &mut AppContext) -> AppResult {
        Ok(())
    }

    fn on_exit(&mut self) -> AppResult {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_reports_pending_capture_request() {
        let mut ctx = AppContext::new(10, false);
        assert!(!ctx.capture_default_press());
        assert!(ctx.toggle_capture_default_press());
        assert!(ctx.capture_default_press());
        assert_eq!(ctx.requested_capture(), Some(true));
    }

    #[test]
    fn last_background_request_wins() {
        let mut ctx = AppContext::new(0, false);
        ctx.rearm_background(1_000);
        ctx.pause_background();
        assert_eq!(ctx.background_request(), BackgroundRequest::Pause);
    }
}
