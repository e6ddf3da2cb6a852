use clap::ValueEnum;

use crate::png::constants::BYTES_PER_PIXEL;
use crate::png::error::{checked_size, reserve, EncodeError, Result};

// https://www.w3.org/TR/png-3/#6Colour-values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorType {
    Grayscale = 0,
    Truecolor = 2,
    IndexedColor = 3,
    GrayscaleAlpha = 4,
    TruecolorAlpha = 6,
}

impl ColorType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompressionLevel {
    Fast,
    Balanced,
    #[default]
    Maximum,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompressorKind {
    #[default]
    Zlib,
    Zopfli,
}

/// Byte order of the four channels inside one stored pixel.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelOrder {
    #[default]
    Rgba,
    Bgra,
    Argb,
    Abgr,
}

impl ChannelOrder {
    /// Reorders a stored pixel into the red, green, blue, alpha sequence PNG wants.
    pub fn to_rgba(self, px: [u8; 4]) -> [u8; 4] {
        match self {
            ChannelOrder::Rgba => px,
            ChannelOrder::Bgra => [px[2], px[1], px[0], px[3]],
            ChannelOrder::Argb => [px[1], px[2], px[3], px[0]],
            ChannelOrder::Abgr => [px[3], px[2], px[1], px[0]],
        }
    }

    pub fn from_rgba(self, px: [u8; 4]) -> [u8; 4] {
        match self {
            ChannelOrder::Rgba => px,
            ChannelOrder::Bgra => [px[2], px[1], px[0], px[3]],
            ChannelOrder::Argb => [px[3], px[0], px[1], px[2]],
            ChannelOrder::Abgr => [px[3], px[2], px[1], px[0]],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Pixel {
    pub fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Pixel { red, green, blue, alpha }
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }
}

impl From<[u8; 4]> for Pixel {
    fn from(rgba: [u8; 4]) -> Self {
        Pixel::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }
}

/// Read-only view of a 32-bit-per-pixel raster.
///
/// `scanline(y)` must return exactly `width()` pixels for every `y < height()`.
/// The encoder checks this and fails rather than reading out of bounds.
pub trait PixelBuffer {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn channel_order(&self) -> ChannelOrder {
        ChannelOrder::Rgba
    }

    fn scanline(&self, y: u32) -> &[[u8; 4]];
}

/// Owned raster, row-major, pixels stored in `order`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    order: ChannelOrder,
    pixels: Vec<[u8; 4]>,
}

impl Bitmap {
    /// A fully transparent black bitmap.
    pub fn new(width: u32, height: u32, order: ChannelOrder) -> Result<Bitmap> {
        let count = checked_size(width as usize, height as usize)?;
        let mut pixels = Vec::new();
        reserve(&mut pixels, count)?;
        pixels.resize(count, [0u8; 4]);

        Ok(Bitmap { width, height, order, pixels })
    }

    /// Wraps an interleaved byte dump, four bytes per pixel in `order`.
    pub fn from_bytes(width: u32, height: u32, order: ChannelOrder, bytes: &[u8]) -> Result<Bitmap> {
        let count = checked_size(width as usize, height as usize)?;
        let expected = checked_size(count, BYTES_PER_PIXEL)?;
        if bytes.len() != expected {
            return Err(EncodeError::DimensionMismatch { expected, actual: bytes.len() });
        }

        let mut pixels = Vec::new();
        reserve(&mut pixels, count)?;
        pixels.extend(
            bytes
                .chunks_exact(BYTES_PER_PIXEL)
                .map(|px| [px[0], px[1], px[2], px[3]]),
        );

        Ok(Bitmap { width, height, order, pixels })
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Pixel {
        Pixel::from(self.order.to_rgba(self.pixels[self.index(x, y)]))
    }

    pub fn set(&mut self, x: u32, y: u32, pixel: Pixel) {
        let i = self.index(x, y);
        self.pixels[i] = self.order.from_rgba(pixel.to_rgba());
    }

    pub fn fill(&mut self, pixel: Pixel) {
        let stored = self.order.from_rgba(pixel.to_rgba());
        self.pixels.fill(stored);
    }

    pub fn size_in_bytes(&self) -> usize {
        self.pixels.len() * BYTES_PER_PIXEL
    }
}

impl PixelBuffer for Bitmap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn channel_order(&self) -> ChannelOrder {
        self.order
    }

    fn scanline(&self, y: u32) -> &[[u8; 4]] {
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDERS: [ChannelOrder; 4] = [
        ChannelOrder::Rgba,
        ChannelOrder::Bgra,
        ChannelOrder::Argb,
        ChannelOrder::Abgr,
    ];

    #[test]
    fn channel_orders_invert() {
        let px = [1, 2, 3, 4];
        for order in ORDERS {
            assert_eq!(order.to_rgba(order.from_rgba(px)), px, "{order:?}");
            assert_eq!(order.from_rgba(order.to_rgba(px)), px, "{order:?}");
        }
    }

    #[test]
    fn bgra_swaps_red_and_blue() {
        assert_eq!(ChannelOrder::Bgra.to_rgba([10, 20, 30, 40]), [30, 20, 10, 40]);
        assert_eq!(ChannelOrder::Argb.to_rgba([40, 10, 20, 30]), [10, 20, 30, 40]);
    }

    #[test]
    fn bitmap_set_get_stores_in_native_order() {
        let mut bitmap = Bitmap::new(2, 1, ChannelOrder::Bgra).unwrap();
        bitmap.set(1, 0, Pixel::new(255, 128, 0, 200));

        assert_eq!(bitmap.get(1, 0), Pixel::new(255, 128, 0, 200));
        assert_eq!(bitmap.scanline(0)[1], [0, 128, 255, 200]);
        assert_eq!(bitmap.get(0, 0), Pixel::default());
    }

    #[test]
    fn from_bytes_checks_length() {
        let err = Bitmap::from_bytes(2, 2, ChannelOrder::Rgba, &[0u8; 15]).unwrap_err();
        assert!(matches!(err, EncodeError::DimensionMismatch { expected: 16, actual: 15 }));

        let bitmap = Bitmap::from_bytes(1, 2, ChannelOrder::Rgba, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(bitmap.scanline(1), &[[5, 6, 7, 8]]);
        assert_eq!(bitmap.size_in_bytes(), 8);
    }

    #[test]
    fn zero_sized_bitmaps_are_allowed() {
        let bitmap = Bitmap::new(0, 3, ChannelOrder::Rgba).unwrap();
        assert_eq!(bitmap.height(), 3);
        assert!(bitmap.scanline(2).is_empty());
    }

    #[test]
    fn truecolor_alpha_code() {
        assert_eq!(ColorType::TruecolorAlpha.code(), 6);
    }
}
