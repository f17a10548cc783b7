//! Counter that takes over the press key while captured.

use embedded_graphics::{
    mono_font::ascii::{FONT_4X6, FONT_10X20},
    pixelcolor::Rgb888,
};
use ledboard_core::{
    app::{App, AppContext, AppResult},
    display::Canvas,
    gesture::{Gesture, GestureSet},
};
use log::{debug, info};

use crate::text::draw_centered;

const COUNT_COLOR: Rgb888 = Rgb888::new(0xFF, 0xFF, 0xFF);
const HINT_COLOR: Rgb888 = Rgb888::new(0x60, 0x60, 0x60);

#[derive(Debug, Default)]
pub struct TallyApp {
    count: i32,
    capturing: bool,
}

impl TallyApp {
    pub const fn new() -> Self {
        Self {
            count: 0,
            capturing: false,
        }
    }

    pub const fn count(&self) -> i32 {
        self.count
    }
}

impl App for TallyApp {
    fn name(&self) -> &str {
        "Tally"
    }

    fn render(&mut self, canvas: &mut Canvas, _now_ms: u64) -> AppResult {
        draw_centered(canvas, &FONT_10X20, &self.count.to_string(), 2, COUNT_COLOR);
        let hint = if self.capturing {
            "HOLD TO RELEASE"
        } else {
            "HOLD TO COUNT"
        };
        draw_centered(canvas, &FONT_4X6, hint, 25, HINT_COLOR);
        Ok(())
    }

    fn gestures(&self) -> GestureSet {
        GestureSet::ALL
    }

    fn on_gesture(&mut self, gesture: Gesture, ctx: &mut AppContext) -> AppResult {
        match gesture {
            Gesture::LongPress => {
                self.capturing = ctx.toggle_capture_default_press();
                info!("tally: capture={}", self.capturing);
            }
            Gesture::SinglePress | Gesture::RotateRight => {
                self.count = self.count.saturating_add(1);
            }
            Gesture::DoublePress | Gesture::RotateLeft => {
                self.count = self.count.saturating_sub(1);
            }
            Gesture::TriplePress => self.count = 0,
        }
        debug!("tally: count={}", self.count);
        Ok(())
    }

    fn on_deactivate(&mut self, ctx: &mut AppContext) -> AppResult {
        self.capturing = ctx.capture_default_press();
        Ok(())
    }

    fn on_exit(&mut self) -> AppResult {
        info!("tally: final count={}", self.count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gestures_adjust_count() {
        let mut tally = TallyApp::new();
        let mut ctx = AppContext::new(0, true);
        for gesture in [
            Gesture::SinglePress,
            Gesture::SinglePress,
            Gesture::RotateRight,
            Gesture::DoublePress,
        ] {
            tally.on_gesture(gesture, &mut ctx).unwrap();
        }
        assert_eq!(tally.count(), 2);

        tally.on_gesture(Gesture::TriplePress, &mut ctx).unwrap();
        assert_eq!(tally.count(), 0);
        tally.on_gesture(Gesture::RotateLeft, &mut ctx).unwrap();
        assert_eq!(tally.count(), -1);
    }

    #[test]
    fn long_press_toggles_capture() {
        let mut tally = TallyApp::new();

        let mut ctx = AppContext::new(0, false);
        tally.on_gesture(Gesture::LongPress, &mut ctx).unwrap();
        assert_eq!(ctx.requested_capture(), Some(true));

        let mut ctx = AppContext::new(10, true);
        tally.on_gesture(Gesture::LongPress, &mut ctx).unwrap();
        assert_eq!(ctx.requested_capture(), Some(false));
    }

    #[test]
    fn render_shows_count() {
        let mut tally = TallyApp::new();
        let mut canvas = Canvas::new();
        tally.render(&mut canvas, 0).unwrap();
        assert!(canvas.lit_pixels() > 0);
    }
}
