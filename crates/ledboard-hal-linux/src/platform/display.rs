use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use hub75_fb::{FrameBuffer, HEIGHT, Rgb, WIDTH};
use ledboard_core::display::Panel;
use log::trace;

const HALF_BLOCK: char = '\u{2580}';

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PanelError {
    Io(io::ErrorKind),
}

impl From<io::Error> for PanelError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.kind())
    }
}

/// Emulates the panel in a terminal, two pixel rows per text row.
///
/// Each cell is an upper half block: foreground is the top pixel, background
/// the bottom one. Only row pairs that changed since the last sync are
/// redrawn.
pub struct TerminalPanel<W: Write> {
    out: W,
    brightness_pct: u8,
    last: Option<FrameBuffer>,
}

impl<W: Write> TerminalPanel<W> {
    pub fn new(out: W, brightness_pct: u8) -> Self {
        Self {
            out,
            brightness_pct: brightness_pct.min(100),
            last: None,
        }
    }

    pub fn set_brightness(&mut self, brightness_pct: u8) {
        self.brightness_pct = brightness_pct.min(100);
        self.last = None;
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn row_pair_changed(&self, frame: &FrameBuffer, pair: usize) -> bool {
        let Some(last) = self.last.as_ref() else {
            return true;
        };
        let top = pair * 2;
        last.row(top) != frame.row(top) || last.row(top + 1) != frame.row(top + 1)
    }

    fn draw_row_pair(&mut self, frame: &FrameBuffer, pair: usize) -> io::Result<()> {
        let top = pair * 2;
        queue!(self.out, MoveTo(0, pair as u16))?;
        for x in 0..WIDTH {
            let upper = frame.pixel(x, top).unwrap_or_default();
            let lower = frame.pixel(x, top + 1).unwrap_or_default();
            let fg = self.terminal_color(upper);
            let bg = self.terminal_color(lower);
            queue!(
                self.out,
                SetForegroundColor(fg),
                SetBackgroundColor(bg),
                Print(HALF_BLOCK)
            )?;
        }
        queue!(self.out, ResetColor)
    }

    fn terminal_color(&self, color: Rgb) -> Color {
        let color = color.scaled(self.brightness_pct);
        Color::Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        }
    }
}

impl<W: Write> Panel for TerminalPanel<W> {
    type Error = PanelError;

    fn sync(&mut self, frame: &FrameBuffer) -> Result<(), Self::Error> {
        let mut drawn = 0;
        for pair in 0..HEIGHT / 2 {
            if self.row_pair_changed(frame, pair) {
                self.draw_row_pair(frame, pair)?;
                drawn += 1;
            }
        }
        if drawn > 0 {
            self.out.flush()?;
        }
        trace!("panel: synced row_pairs={}", drawn);

        match self.last.as_mut() {
            Some(last) => last.bytes_mut().copy_from_slice(frame.bytes()),
            None => self.last = Some(frame.clone()),
        }
        Ok(())
    }
}

/// Panel stand-in with no output. Keeps the last frame for inspection.
#[derive(Default)]
pub struct HeadlessPanel {
    last: FrameBuffer,
    synced: u64,
}

impl HeadlessPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn frames_synced(&self) -> u64 {
        self.synced
    }

    pub const fn last_frame(&self) -> &FrameBuffer {
        &self.last
    }
}

impl Panel for HeadlessPanel {
    type Error = PanelError;

    fn sync(&mut self, frame: &FrameBuffer) -> Result<(), Self::Error> {
        self.last.bytes_mut().copy_from_slice(frame.bytes());
        self.synced = self.synced.saturating_add(1);
        Ok(())
    }
}

/// Panel chosen at startup.
pub enum HostPanel {
    Terminal(TerminalPanel<io::Stdout>),
    Headless(HeadlessPanel),
}

impl Panel for HostPanel {
    type Error = PanelError;

    fn sync(&mut self, frame: &FrameBuffer) -> Result<(), Self::Error> {
        match self {
            HostPanel::Terminal(panel) => panel.sync(frame),
            HostPanel::Headless(panel) => panel.sync(frame),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sync_draws_every_row_pair() {
        let mut panel = TerminalPanel::new(Vec::new(), 100);
        panel.sync(&FrameBuffer::new()).unwrap();

        let text = String::from_utf8(panel.into_inner()).unwrap();
        assert_eq!(text.matches(HALF_BLOCK).count(), WIDTH * HEIGHT / 2);
    }

    #[test]
    fn unchanged_rows_are_skipped() {
        let mut frame = FrameBuffer::new();
        let mut panel = TerminalPanel::new(Vec::new(), 100);
        panel.sync(&frame).unwrap();
        let before = panel.out.len();

        panel.sync(&frame).unwrap();
        assert_eq!(panel.out.len(), before);

        frame.set_pixel(5, 9, Rgb::RED);
        panel.sync(&frame).unwrap();
        let text = String::from_utf8(panel.into_inner()).unwrap();
        assert_eq!(text[before..].matches(HALF_BLOCK).count(), WIDTH);
    }

    #[test]
    fn brightness_scales_emitted_colors() {
        let mut frame = FrameBuffer::new();
        frame.set_pixel(0, 0, Rgb::RED);
        let mut panel = TerminalPanel::new(Vec::new(), 50);
        panel.sync(&frame).unwrap();

        let text = String::from_utf8(panel.into_inner()).unwrap();
        assert!(text.contains("38;2;127;0;0"));
        assert!(!text.contains("38;2;255;0;0"));
    }

    #[test]
    fn headless_panel_keeps_last_frame() {
        let mut frame = FrameBuffer::new();
        frame.set_pixel(63, 31, Rgb::BLUE);
        let mut panel = HeadlessPanel::new();
        panel.sync(&frame).unwrap();
        panel.blank().unwrap();

        assert_eq!(panel.frames_synced(), 2);
        assert_eq!(panel.last_frame().lit_pixels(), 0);
    }
}
