use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    text::{Baseline, Text},
};
use hub75_fb::WIDTH;
use ledboard_core::display::Canvas;

pub(crate) fn text_width(font: &MonoFont<'_>, text: &str) -> i32 {
    let advance = font.character_size.width + font.character_spacing;
    (text.chars().count() as u32 * advance).saturating_sub(font.character_spacing) as i32
}

/// Draws `text` with its top-left corner at (`x`, `y`).
pub(crate) fn draw_text(
    canvas: &mut Canvas,
    font: &MonoFont<'_>,
    text: &str,
    x: i32,
    y: i32,
    color: Rgb888,
) {
    let style = MonoTextStyle::new(font, color);
    let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(canvas);
}

/// Draws `text` horizontally centered on the panel.
pub(crate) fn draw_centered(
    canvas: &mut Canvas,
    font: &MonoFont<'_>,
    text: &str,
    y: i32,
    color: Rgb888,
) {
    let x = (WIDTH as i32 - text_width(font, text)) / 2;
    draw_text(canvas, font, text, x.max(0), y, color);
}

#[cfg(test)]
mod tests {
    use embedded_graphics::mono_font::ascii::FONT_5X8;

    use super::*;

    #[test]
    fn width_excludes_trailing_spacing() {
        assert_eq!(text_width(&FONT_5X8, ""), 0);
        assert_eq!(text_width(&FONT_5X8, "12"), 10);
    }

    #[test]
    fn centered_text_lights_pixels() {
        let mut canvas = Canvas::new();
        draw_centered(&mut canvas, &FONT_5X8, "88", 0, Rgb888::WHITE);
        assert!(canvas.lit_pixels() > 0);
        assert_eq!(canvas.pixel(0, 0).map(|c| c.is_black()), Some(true));
    }
}
