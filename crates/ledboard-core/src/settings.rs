//! Persisted board settings abstraction.

use alloc::{string::String, vec::Vec};

use crate::{gesture::DecoderConfig, scheduler::SchedulerConfig};

/// Panel pacing and appearance.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplaySettings {
    pub frame_interval_ms: u32,
    pub capture_indicator_ms: u32,
    /// Scales every channel at panel sync, 0..=100.
    pub brightness_pct: u8,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            capture_indicator_ms: 2_500,
            brightness_pct: 100,
        }
    }
}

/// One configured app slot, in rotation order.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppEntry {
    pub name: String,
    /// Catalog key used to construct the app.
    pub class_name: String,
    #[cfg_attr(feature = "serde", serde(default = "enabled_default"))]
    pub enabled: bool,
}

#[cfg(feature = "serde")]
fn enabled_default() -> bool {
    true
}

impl AppEntry {
    pub fn new(name: &str, class_name: &str, enabled: bool) -> Self {
        Self {
            name: String::from(name),
            class_name: String::from(class_name),
            enabled,
        }
    }
}

/// Settings that survive restarts.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeckSettings {
    pub decoder: DecoderConfig,
    pub display: DisplaySettings,
    pub apps: Vec<AppEntry>,
}

impl DeckSettings {
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            capture_indicator_ms: self.display.capture_indicator_ms,
        }
    }

    pub fn enabled_apps(&self) -> impl Iterator<Item = &AppEntry> {
        self.apps.iter().filter(|entry| entry.enabled)
    }
}

/// Abstract settings persistence backend.
pub trait SettingsStore {
    type Error;

    fn load(&mut self) -> Result<Option<DeckSettings>, Self::Error>;
    fn save(&mut self, settings: &DeckSettings) -> Result<(), Self::Error>;
}
