/// 24-bit color as stored in the framebuffer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(0xFF, 0xFF, 0xFF);
    pub const RED: Self = Self::new(0xFF, 0, 0);
    pub const GREEN: Self = Self::new(0, 0xFF, 0);
    pub const BLUE: Self = Self::new(0, 0, 0xFF);
    pub const YELLOW: Self = Self::new(0xFF, 0xFF, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: (hex >> 16) as u8,
            g: (hex >> 8) as u8,
            b: hex as u8,
        }
    }

    /// Scales every channel by `pct` (0..=100).
    pub const fn scaled(self, pct: u8) -> Self {
        let pct = if pct > 100 { 100u16 } else { pct as u16 };
        Self {
            r: ((self.r as u16 * pct) / 100) as u8,
            g: ((self.g as u16 * pct) / 100) as u8,
            b: ((self.b as u16 * pct) / 100) as u8,
        }
    }

    pub const fn is_black(self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_literal_splits_channels() {
        assert_eq!(Rgb::from_hex(0xFDB813), Rgb::new(0xFD, 0xB8, 0x13));
    }

    #[test]
    fn scaling_clamps_to_full_brightness() {
        let c = Rgb::new(200, 100, 10);
        assert_eq!(c.scaled(50), Rgb::new(100, 50, 5));
        assert_eq!(c.scaled(250), c);
        assert!(c.scaled(0).is_black());
    }
}
