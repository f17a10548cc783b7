//! Gesture vocabulary and the decoder that produces it from raw key edges.

mod decoder;

#[cfg(test)]
mod tests;

pub use decoder::{GestureDecoder, PressSession};

/// Discrete user intent delivered to apps.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Gesture {
    SinglePress,
    DoublePress,
    TriplePress,
    LongPress,
    RotateLeft,
    RotateRight,
}

impl Gesture {
    pub const ALL: [Gesture; 6] = [
        Gesture::SinglePress,
        Gesture::DoublePress,
        Gesture::TriplePress,
        Gesture::LongPress,
        Gesture::RotateLeft,
        Gesture::RotateRight,
    ];

    /// Maps a finalized tap count to its press gesture. Counts above three saturate.
    pub const fn from_tap_count(count: u8) -> Option<Self> {
        match count {
            0 => None,
            1 => Some(Gesture::SinglePress),
            2 => Some(Gesture::DoublePress),
            _ => Some(Gesture::TriplePress),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Gesture::SinglePress => "single_press",
            Gesture::DoublePress => "double_press",
            Gesture::TriplePress => "triple_press",
            Gesture::LongPress => "long_press",
            Gesture::RotateLeft => "rotate_left",
            Gesture::RotateRight => "rotate_right",
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl core::fmt::Display for Gesture {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of gestures an app declares handlers for.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct GestureSet(u8);

impl GestureSet {
    pub const EMPTY: Self = Self(0);
    pub const ALL: Self = Self::of(&Gesture::ALL);

    pub const fn of(gestures: &[Gesture]) -> Self {
        let mut bits = 0u8;
        let mut idx = 0;
        while idx < gestures.len() {
            bits |= gestures[idx].bit();
            idx += 1;
        }
        Self(bits)
    }

    pub const fn with(self, gesture: Gesture) -> Self {
        Self(self.0 | gesture.bit())
    }

    pub const fn contains(self, gesture: Gesture) -> bool {
        self.0 & gesture.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// When a long press is reported relative to the key release.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LongPressTiming {
    /// Emit once the held key is released.
    #[default]
    OnRelease,
    /// Emit as soon as the hold crosses the threshold.
    OnThreshold,
}

/// Decoder tuning. All durations are milliseconds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecoderConfig {
    pub multi_press_window_ms: u32,
    pub long_press_threshold_ms: u32,
    pub long_press_poll_interval_ms: u32,
    pub rotate_throttle_ms: u32,
    pub release_debounce_ms: u32,
    pub long_press_timing: LongPressTiming,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            multi_press_window_ms: 300,
            long_press_threshold_ms: 500,
            long_press_poll_interval_ms: 50,
            rotate_throttle_ms: 150,
            release_debounce_ms: 50,
            long_press_timing: LongPressTiming::OnRelease,
        }
    }
}

impl DecoderConfig {
    pub const fn with_multi_press_window_ms(mut self, value: u32) -> Self {
        self.multi_press_window_ms = value;
        self
    }

    pub const fn with_long_press_threshold_ms(mut self, value: u32) -> Self {
        self.long_press_threshold_ms = value;
        self
    }

    pub const fn with_rotate_throttle_ms(mut self, value: u32) -> Self {
        self.rotate_throttle_ms = value;
        self
    }

    pub const fn with_release_debounce_ms(mut self, value: u32) -> Self {
        self.release_debounce_ms = value;
        self
    }

    pub const fn with_long_press_timing(mut self, timing: LongPressTiming) -> Self {
        self.long_press_timing = timing;
        self
    }

    /// First poll instant at or after the threshold, measured from key-down.
    pub(crate) const fn long_press_due_ms(&self) -> u64 {
        let interval = if self.long_press_poll_interval_ms == 0 {
            1
        } else {
            self.long_press_poll_interval_ms as u64
        };
        let threshold = self.long_press_threshold_ms as u64;
        threshold.div_ceil(interval) * interval
    }
}
