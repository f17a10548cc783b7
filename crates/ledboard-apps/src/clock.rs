//! Wall clock with a 12h/24h toggle on rotation.

use chrono::{Local, NaiveDateTime};
use embedded_graphics::{
    mono_font::ascii::{FONT_4X6, FONT_6X10},
    pixelcolor::Rgb888,
};
use ledboard_core::{
    app::{App, AppContext, AppResult},
    display::Canvas,
    gesture::{Gesture, GestureSet},
};
use log::info;

use crate::text::draw_centered;

const TIME_COLOR: Rgb888 = Rgb888::new(0xFF, 0xB0, 0x20);
const DATE_COLOR: Rgb888 = Rgb888::new(0x40, 0x80, 0xFF);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HourFormat {
    TwentyFour,
    Twelve,
}

impl HourFormat {
    const fn toggled(self) -> Self {
        match self {
            HourFormat::TwentyFour => HourFormat::Twelve,
            HourFormat::Twelve => HourFormat::TwentyFour,
        }
    }
}

pub struct ClockApp {
    format: HourFormat,
    wall_clock: fn() -> NaiveDateTime,
}

impl Default for ClockApp {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockApp {
    pub fn new() -> Self {
        Self::with_wall_clock(|| Local::now().naive_local())
    }

    pub fn with_wall_clock(wall_clock: fn() -> NaiveDateTime) -> Self {
        Self {
            format: HourFormat::TwentyFour,
            wall_clock,
        }
    }

    pub const fn format(&self) -> HourFormat {
        self.format
    }
}

impl App for ClockApp {
    fn name(&self) -> &str {
        "Clock"
    }

    fn render(&mut self, canvas: &mut Canvas, _now_ms: u64) -> AppResult {
        let now = (self.wall_clock)();
        let (time, suffix) = match self.format {
            HourFormat::TwentyFour => (now.format("%H:%M:%S"), now.format("%a %d %b")),
            HourFormat::Twelve => (now.format("%I:%M:%S"), now.format("%p %d %b")),
        };

        draw_centered(canvas, &FONT_6X10, &time.to_string(), 7, TIME_COLOR);
        draw_centered(canvas, &FONT_4X6, &suffix.to_string(), 20, DATE_COLOR);
        Ok(())
    }

    fn gestures(&self) -> GestureSet {
        GestureSet::of(&[Gesture::RotateLeft, Gesture::RotateRight])
    }

    fn on_gesture(&mut self, _gesture: Gesture, _ctx: &mut AppContext) -> AppResult {
        self.format = self.format.toggled();
        info!("clock: format={:?}", self.format);
        Ok(())
    }
}
