use core::convert::Infallible;

use embedded_graphics_core::{
    Pixel,
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::{Rgb888, RgbColor},
};

use crate::{FrameBuffer, HEIGHT, Rgb, WIDTH};

impl From<Rgb888> for Rgb {
    fn from(color: Rgb888) -> Self {
        Rgb::new(color.r(), color.g(), color.b())
    }
}

impl From<Rgb> for Rgb888 {
    fn from(color: Rgb) -> Self {
        Rgb888::new(color.r, color.g, color.b)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }

            let x = point.x as usize;
            let y = point.y as usize;
            let _ = self.set_pixel(x, y, color.into());
        }

        Ok(())
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}
