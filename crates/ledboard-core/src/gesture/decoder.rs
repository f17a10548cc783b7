use heapless::Deque;
use log::{debug, trace, warn};

use super::{DecoderConfig, Gesture, LongPressTiming};
use crate::input::{Edge, InputEvent, KeyId};

const PENDING_GESTURES: usize = 4;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum PressPhase {
    Idle,
    /// Activate key down; long-press sampling is live.
    Held { down_at: u64 },
    /// Long press already fired for this hold.
    LongHeld { down_at: u64 },
    /// Key up observed, waiting out the bounce window.
    Releasing { down_at: u64, released_at: u64 },
    /// Key confirmed up, more taps may still join the session.
    AwaitingFinalize,
}

/// Snapshot of the current multi-tap session.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PressSession {
    pub tap_count: u8,
    pub first_tap_at: u64,
    pub last_tap_at: u64,
    pub key_down_at: Option<u64>,
    pub long_press_fired: bool,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct RotationState {
    last_left_at: Option<u64>,
    last_right_at: Option<u64>,
}

/// Turns raw key edges into gestures.
///
/// The decoder never reads a clock. Every edge carries its own timestamp and
/// time-driven transitions (long-press sampling, release debounce, multi-tap
/// finalization) happen in [`GestureDecoder::poll`] at the instant reported by
/// [`GestureDecoder::next_deadline`].
#[derive(Debug)]
pub struct GestureDecoder {
    config: DecoderConfig,
    phase: PressPhase,
    tap_count: u8,
    first_tap_at: u64,
    last_tap_at: u64,
    finalize_at: Option<u64>,
    long_press_fired: bool,
    rotation: RotationState,
    pending: Deque<Gesture, PENDING_GESTURES>,
}

impl GestureDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            phase: PressPhase::Idle,
            tap_count: 0,
            first_tap_at: 0,
            last_tap_at: 0,
            finalize_at: None,
            long_press_fired: false,
            rotation: RotationState::default(),
            pending: Deque::new(),
        }
    }

    pub const fn config(&self) -> DecoderConfig {
        self.config
    }

    pub fn session(&self) -> PressSession {
        let key_down_at = match self.phase {
            PressPhase::Held { down_at } | PressPhase::LongHeld { down_at } => Some(down_at),
            _ => None,
        };
        PressSession {
            tap_count: self.tap_count,
            first_tap_at: self.first_tap_at,
            last_tap_at: self.last_tap_at,
            key_down_at,
            long_press_fired: self.long_press_fired,
        }
    }

    /// True while the activate key is (or may still be) physically down.
    pub fn is_key_held(&self) -> bool {
        !matches!(self.phase, PressPhase::Idle | PressPhase::AwaitingFinalize)
    }

    /// Feeds one raw edge. Returns the oldest gesture ready for delivery.
    pub fn on_event(&mut self, event: InputEvent) -> Option<Gesture> {
        let now_ms = event.at_ms;
        self.advance(now_ms);

        let gesture = match (event.key, event.edge) {
            (KeyId::Activate, Edge::Down) => {
                self.activate_down(now_ms);
                None
            }
            (KeyId::Activate, Edge::Up) => {
                self.activate_up(now_ms);
                None
            }
            (KeyId::RotateLeft, Edge::Down) => self.rotate(Gesture::RotateLeft, now_ms),
            (KeyId::RotateRight, Edge::Down) => self.rotate(Gesture::RotateRight, now_ms),
            _ => None,
        };
        if let Some(gesture) = gesture {
            self.enqueue(gesture);
        }

        self.advance(now_ms);
        self.pending.pop_front()
    }

    /// Runs time-driven transitions up to `now_ms` and returns the oldest
    /// gesture ready for delivery. Call repeatedly until it yields `None`.
    pub fn poll(&mut self, now_ms: u64) -> Option<Gesture> {
        self.advance(now_ms);
        self.pending.pop_front()
    }

    /// Earliest instant at which [`GestureDecoder::poll`] has work to do.
    pub fn next_deadline(&self) -> Option<u64> {
        if !self.pending.is_empty() {
            return Some(0);
        }
        match self.phase {
            PressPhase::Idle | PressPhase::LongHeld { .. } => None,
            PressPhase::Held { down_at } => {
                Some(down_at.saturating_add(self.config.long_press_due_ms()))
            }
            PressPhase::Releasing { released_at, .. } => {
                Some(released_at.saturating_add(self.config.release_debounce_ms as u64))
            }
            PressPhase::AwaitingFinalize => self.finalize_at,
        }
    }

    fn activate_down(&mut self, now_ms: u64) {
        match self.phase {
            PressPhase::Held { .. } | PressPhase::LongHeld { .. } => {
                trace!("gesture: activate repeat ignored at={}", now_ms);
            }
            PressPhase::Releasing { down_at, .. } => {
                trace!("gesture: release bounce at={}", now_ms);
                self.phase = if self.long_press_fired {
                    PressPhase::LongHeld { down_at }
                } else {
                    PressPhase::Held { down_at }
                };
            }
            PressPhase::Idle | PressPhase::AwaitingFinalize => {
                let window = self.config.multi_press_window_ms as u64;
                if self.tap_count > 0 && now_ms.saturating_sub(self.last_tap_at) <= window {
                    self.tap_count = self.tap_count.saturating_add(1);
                } else {
                    self.tap_count = 1;
                    self.first_tap_at = now_ms;
                }
                self.last_tap_at = now_ms;
                self.long_press_fired = false;
                self.finalize_at = Some(now_ms.saturating_add(window));
                self.phase = PressPhase::Held { down_at: now_ms };
            }
        }
    }

    fn activate_up(&mut self, now_ms: u64) {
        match self.phase {
            PressPhase::Held { down_at } | PressPhase::LongHeld { down_at } => {
                self.phase = PressPhase::Releasing {
                    down_at,
                    released_at: now_ms,
                };
            }
            _ => trace!("gesture: unmatched activate release at={}", now_ms),
        }
    }

    fn rotate(&mut self, gesture: Gesture, now_ms: u64) -> Option<Gesture> {
        let throttle = self.config.rotate_throttle_ms as u64;
        let last = match gesture {
            Gesture::RotateLeft => &mut self.rotation.last_left_at,
            _ => &mut self.rotation.last_right_at,
        };
        if last.is_some_and(|at| now_ms.saturating_sub(at) < throttle) {
            trace!("gesture: {} throttled at={}", gesture, now_ms);
            return None;
        }
        *last = Some(now_ms);
        debug!("gesture: emit {} at={}", gesture, now_ms);
        Some(gesture)
    }

    fn advance(&mut self, now_ms: u64) {
        loop {
            match self.phase {
                PressPhase::Held { down_at } => {
                    let due = down_at.saturating_add(self.config.long_press_due_ms());
                    if now_ms < due {
                        return;
                    }
                    self.fire_long_press(down_at, due);
                }
                PressPhase::Releasing { released_at, .. } => {
                    let confirmed_at =
                        released_at.saturating_add(self.config.release_debounce_ms as u64);
                    if now_ms < confirmed_at {
                        return;
                    }
                    self.confirm_release(confirmed_at);
                }
                PressPhase::AwaitingFinalize => match self.finalize_at {
                    Some(at) if now_ms >= at => self.finalize(at),
                    Some(_) => return,
                    None => self.phase = PressPhase::Idle,
                },
                PressPhase::Idle | PressPhase::LongHeld { .. } => return,
            }
        }
    }

    fn fire_long_press(&mut self, down_at: u64, at_ms: u64) {
        if self.tap_count > 1 {
            debug!(
                "gesture: long press discards pending taps count={}",
                self.tap_count
            );
        }
        self.long_press_fired = true;
        self.finalize_at = None;
        self.tap_count = 0;
        self.phase = PressPhase::LongHeld { down_at };
        if self.config.long_press_timing == LongPressTiming::OnThreshold {
            debug!("gesture: emit long_press at={}", at_ms);
            self.enqueue(Gesture::LongPress);
        }
    }

    fn confirm_release(&mut self, confirmed_at: u64) {
        if self.long_press_fired {
            if self.config.long_press_timing == LongPressTiming::OnRelease {
                debug!("gesture: emit long_press at={}", confirmed_at);
                self.enqueue(Gesture::LongPress);
            }
            self.reset_session();
            return;
        }

        // A window that lapsed while the key was held finalizes on release.
        let finalize_at = self
            .finalize_at
            .map_or(confirmed_at, |at| at.max(confirmed_at));
        self.finalize_at = Some(finalize_at);
        self.phase = PressPhase::AwaitingFinalize;
    }

    fn finalize(&mut self, at_ms: u64) {
        if let Some(gesture) = Gesture::from_tap_count(self.tap_count) {
            debug!(
                "gesture: emit {} taps={} at={}",
                gesture, self.tap_count, at_ms
            );
            self.enqueue(gesture);
        }
        self.reset_session();
    }

    fn reset_session(&mut self) {
        self.phase = PressPhase::Idle;
        self.tap_count = 0;
        self.finalize_at = None;
        self.long_press_fired = false;
    }

    fn enqueue(&mut self, gesture: Gesture) {
        if self.pending.push_back(gesture).is_err() {
            warn!("gesture: pending queue full, dropping {}", gesture);
        }
    }
}
