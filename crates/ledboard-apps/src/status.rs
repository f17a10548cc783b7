//! Uptime and system load, refreshed from a background timer.
//!
//! The refresh rate follows visibility: fast while on screen, slow while
//! another app is in the foreground.

use std::{fmt::Write as _, fs, io};

use embedded_graphics::{
    mono_font::ascii::{FONT_4X6, FONT_5X8},
    pixelcolor::Rgb888,
};
use ledboard_core::{
    app::{App, AppContext, AppError, AppResult},
    display::Canvas,
    gesture::{Gesture, GestureSet},
};
use log::{debug, warn};

use crate::text::draw_text;

pub const VISIBLE_REFRESH_MS: u32 = 5_000;
pub const HIDDEN_REFRESH_MS: u32 = 30_000;

const LOADAVG_PATH: &str = "/proc/loadavg";
const LABEL_COLOR: Rgb888 = Rgb888::new(0x80, 0x80, 0x80);
const VALUE_COLOR: Rgb888 = Rgb888::new(0x30, 0xFF, 0x60);
const STALE_COLOR: Rgb888 = Rgb888::new(0xFF, 0x40, 0x30);

type LoadSource = Box<dyn FnMut() -> io::Result<String>>;

/// Load averages in hundredths.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LoadAverage {
    pub one_x100: u32,
    pub five_x100: u32,
}

impl LoadAverage {
    /// Parses the leading fields of a `/proc/loadavg` line.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut fields = raw.split_whitespace();
        Some(Self {
            one_x100: parse_hundredths(fields.next()?)?,
            five_x100: parse_hundredths(fields.next()?)?,
        })
    }
}

fn parse_hundredths(field: &str) -> Option<u32> {
    let (whole, frac) = field.split_once('.').unwrap_or((field, "0"));
    let whole: u32 = whole.parse().ok()?;
    let frac_digits: String = frac.chars().chain("00".chars()).take(2).collect();
    let frac: u32 = frac_digits.parse().ok()?;
    whole.checked_mul(100)?.checked_add(frac)
}

pub struct StatusApp {
    started_at_ms: u64,
    last_refresh_ms: Option<u64>,
    load: Option<LoadAverage>,
    refresh_failed: bool,
    refreshes: u32,
    source: LoadSource,
}

impl Default for StatusApp {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusApp {
    pub fn new() -> Self {
        Self::with_source(|| fs::read_to_string(LOADAVG_PATH))
    }

    pub fn with_source<F>(source: F) -> Self
    where
        F: FnMut() -> io::Result<String> + 'static,
    {
        Self {
            started_at_ms: 0,
            last_refresh_ms: None,
            load: None,
            refresh_failed: false,
            refreshes: 0,
            source: Box::new(source),
        }
    }

    pub const fn load(&self) -> Option<LoadAverage> {
        self.load
    }

    pub const fn refreshes(&self) -> u32 {
        self.refreshes
    }

    fn refresh(&mut self, now_ms: u64) -> AppResult {
        self.refreshes = self.refreshes.saturating_add(1);
        self.last_refresh_ms = Some(now_ms);

        let raw = (self.source)().map_err(|err| {
            self.refresh_failed = true;
            AppError::Source(err.to_string())
        })?;
        let Some(load) = LoadAverage::parse(&raw) else {
            self.refresh_failed = true;
            return Err(AppError::Source(format!("unparsable load average: {raw:?}")));
        };

        debug!("status: load1={} load5={}", load.one_x100, load.five_x100);
        self.load = Some(load);
        self.refresh_failed = false;
        Ok(())
    }
}

fn uptime_label(elapsed_ms: u64) -> String {
    let secs = elapsed_ms / 1_000;
    let mut label = String::new();
    let _ = write!(
        label,
        "{:02}:{:02}:{:02}",
        secs / 3_600,
        (secs / 60) % 60,
        secs % 60
    );
    label
}

impl App for StatusApp {
    fn name(&self) -> &str {
        "Status"
    }

    fn render(&mut self, canvas: &mut Canvas, now_ms: u64) -> AppResult {
        let uptime = uptime_label(now_ms.saturating_sub(self.started_at_ms));
        draw_text(canvas, &FONT_4X6, "UPTIME", 2, 2, LABEL_COLOR);
        draw_text(canvas, &FONT_5X8, &uptime, 2, 9, VALUE_COLOR);

        draw_text(canvas, &FONT_4X6, "LOAD", 2, 19, LABEL_COLOR);
        let (value, color) = match self.load {
            Some(load) => (
                format!("{}.{:02}", load.one_x100 / 100, load.one_x100 % 100),
                if self.refresh_failed { STALE_COLOR } else { VALUE_COLOR },
            ),
            None => (String::from("--"), STALE_COLOR),
        };
        draw_text(canvas, &FONT_5X8, &value, 22, 18, color);
        Ok(())
    }

    fn gestures(&self) -> GestureSet {
        GestureSet::of(&[Gesture::DoublePress])
    }

    fn on_gesture(&mut self, _gesture: Gesture, ctx: &mut AppContext) -> AppResult {
        self.refresh(ctx.now_ms())
    }

    fn initialize(&mut self, ctx: &mut AppContext) -> AppResult {
        self.started_at_ms = ctx.now_ms();
        if let Err(err) = self.refresh(ctx.now_ms()) {
            warn!("status: initial refresh failed err={}", err);
        }
        Ok(())
    }

    fn on_activate(&mut self, ctx: &mut AppContext) -> AppResult {
        ctx.rearm_background(VISIBLE_REFRESH_MS);
        if let Err(err) = self.refresh(ctx.now_ms()) {
            warn!("status: activation refresh failed err={}", err);
        }
        Ok(())
    }

    fn on_deactivate(&mut self, ctx: &mut AppContext) -> AppResult {
        ctx.rearm_background(HIDDEN_REFRESH_MS);
        Ok(())
    }

    fn background_interval_ms(&self) -> Option<u32> {
        Some(HIDDEN_REFRESH_MS)
    }

    fn on_background_tick(&mut self, ctx: &mut AppContext) -> AppResult {
        self.refresh(ctx.now_ms())
    }
}
