//! RGB565 colour codec
//!
//! The controller is configured for 16 bpp (`PixelFormatSet = 0x55`), so every
//! pixel is two bytes on the wire, most significant byte first:
//!
//! ```text
//! byte0: R7 R6 R5 R4 R3 G7 G6 G5
//! byte1: G4 G3 G2 B7 B6 B5 B4 B3
//! ```
//!
//! Packing truncates (no rounding): the low 3 bits of red and blue and the low
//! 2 bits of green are dropped. Unpacking returns the truncated channel value,
//! not the original 8-bit input.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

/// 8-bit-per-channel colour value. No alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    /// Red intensity.
    pub r: u8,
    /// Green intensity.
    pub g: u8,
    /// Blue intensity.
    pub b: u8,
}

impl Rgb {
    /// Black (all channels 0).
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (all channels 255).
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Pure red.
    pub const RED: Self = Self::new(255, 0, 0);
    /// Pure green.
    pub const GREEN: Self = Self::new(0, 255, 0);
    /// Pure blue.
    pub const BLUE: Self = Self::new(0, 0, 255);

    /// Construct from three channel intensities.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Wire encoding of this colour. See [`pack_rgb565`].
    #[inline]
    pub const fn to_rgb565_bytes(self) -> [u8; 2] {
        pack_rgb565(self.r, self.g, self.b)
    }

    /// Packed 16-bit value (`byte0 << 8 | byte1`).
    #[inline]
    pub const fn to_rgb565_u16(self) -> u16 {
        u16::from_be_bytes(self.to_rgb565_bytes())
    }
}

/// Pack 8-bit channels into the controller's big-endian RGB565 format.
///
/// `byte0 = (r & 0xF8) | (g >> 5)`, `byte1 = ((g << 3) & 0xE0) | (b >> 3)`.
#[inline]
pub const fn pack_rgb565(r: u8, g: u8, b: u8) -> [u8; 2] {
    [(r & 0xF8) | (g >> 5), ((g << 3) & 0xE0) | (b >> 3)]
}

/// Inverse of [`pack_rgb565`] up to truncation.
///
/// Returns `r & 0xF8`, `g & 0xFC`, `b & 0xF8` for whatever channels were packed.
#[inline]
pub const fn unpack_rgb565(bytes: [u8; 2]) -> Rgb {
    let [hi, lo] = bytes;
    Rgb {
        r: hi & 0xF8,
        g: ((hi & 0x07) << 5) | ((lo & 0xE0) >> 3),
        b: (lo & 0x1F) << 3,
    }
}

impl From<Rgb> for Rgb565 {
    fn from(c: Rgb) -> Self {
        Rgb565::new(c.r >> 3, c.g >> 2, c.b >> 3)
    }
}

impl From<Rgb565> for Rgb {
    fn from(c: Rgb565) -> Self {
        Rgb {
            r: c.r() << 3,
            g: c.g() << 2,
            b: c.b() << 3,
        }
    }
}
