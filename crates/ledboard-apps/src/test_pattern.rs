//! Solid fill with contrasting corner pixels for checking panel wiring,
//! color order and the outermost rows and columns.

use hub75_fb::{HEIGHT, Rgb, WIDTH};
use ledboard_core::{
    app::{App, AppContext, AppResult},
    display::Canvas,
    gesture::{Gesture, GestureSet},
};
use log::info;

struct Palette {
    name: &'static str,
    fill: Rgb,
    corner: Rgb,
}

const PALETTES: [Palette; 4] = [
    Palette {
        name: "yellow",
        fill: Rgb::YELLOW,
        corner: Rgb::GREEN,
    },
    Palette {
        name: "red",
        fill: Rgb::RED,
        corner: Rgb::BLUE,
    },
    Palette {
        name: "blue",
        fill: Rgb::BLUE,
        corner: Rgb::WHITE,
    },
    Palette {
        name: "white",
        fill: Rgb::WHITE,
        corner: Rgb::RED,
    },
];

const CORNERS: [(usize, usize); 4] = [
    (0, 0),
    (WIDTH - 1, 0),
    (0, HEIGHT - 1),
    (WIDTH - 1, HEIGHT - 1),
];

#[derive(Default)]
pub struct TestPatternApp {
    palette: usize,
}

impl TestPatternApp {
    pub const fn new() -> Self {
        Self { palette: 0 }
    }

    pub fn palette_name(&self) -> &'static str {
        PALETTES[self.palette].name
    }
}

impl App for TestPatternApp {
    fn name(&self) -> &str {
        "Test Pattern"
    }

    fn render(&mut self, canvas: &mut Canvas, _now_ms: u64) -> AppResult {
        let palette = &PALETTES[self.palette];
        canvas.fill(palette.fill);
        for (x, y) in CORNERS {
            canvas.set_pixel(x, y, palette.corner);
        }
        Ok(())
    }

    fn gestures(&self) -> GestureSet {
        GestureSet::of(&[Gesture::TriplePress])
    }

    fn on_gesture(&mut self, gesture: Gesture, _ctx: &mut AppContext) -> AppResult {
        if gesture == Gesture::TriplePress {
            self.palette = (self.palette + 1) % PALETTES.len();
            info!("test-pattern: palette={}", self.palette_name());
        }
        Ok(())
    }
}
