use indicatif::ProgressBar;
use log::debug;

use crate::png::chunk::ChunkBuilder;
use crate::png::compress::Compressor;
use crate::png::constants::*;
use crate::png::error::{checked_size, reserve, EncodeError, Result};
use crate::png::filter::filter_image;
use crate::png::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderOptions {
    pub compressor: CompressorKind,
    pub level: CompressionLevel,
    /// Filter rows on the rayon pool. Output is identical either way.
    pub parallel: bool,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        EncoderOptions {
            compressor: CompressorKind::Zlib,
            level: CompressionLevel::Maximum,
            parallel: true,
        }
    }
}

pub struct PngEncoder {
    level: CompressionLevel,
    parallel: bool,
    compressor: Box<dyn Compressor>,
    pb: ProgressBar,
}

impl Default for PngEncoder {
    fn default() -> Self {
        PngEncoder::new(EncoderOptions::default())
    }
}

impl PngEncoder {
    pub fn new(options: EncoderOptions) -> PngEncoder {
        PngEncoder {
            level: options.level,
            parallel: options.parallel,
            compressor: options.compressor.compressor(),
            pb: ProgressBar::hidden(),
        }
    }

    /// Swaps in a custom zlib backend.
    pub fn with_compressor(mut self, compressor: impl Compressor + 'static) -> PngEncoder {
        self.compressor = Box::new(compressor);
        self
    }

    /// Reports each encoding stage on `pb`, three ticks per image.
    pub fn with_progress(mut self, pb: ProgressBar) -> PngEncoder {
        self.pb = pb;
        self
    }

    /// Encodes `image` as an 8-bit RGBA PNG: signature, IHDR, IDAT, IEND.
    pub fn encode<B: PixelBuffer + ?Sized>(&self, image: &B) -> Result<Vec<u8>> {
        let (width, height) = (image.width(), image.height());

        self.pb.set_message("Filtering scanlines...");
        let pixels = normalized_pixels(image)?;
        let row_bytes = checked_size(width as usize, BYTES_PER_PIXEL)?;
        let filtered = filter_image(&pixels, row_bytes, height as usize, self.parallel)?;
        drop(pixels);
        self.pb.inc(1);

        self.pb.set_message("Compressing image data...");
        let compressed = self
            .compressor
            .compress(&filtered, self.level)
            .map_err(EncodeError::CompressionFailure)?;
        debug!(
            "compressed {} filtered bytes to {} ({:?})",
            filtered.len(),
            compressed.len(),
            self.level
        );
        self.pb.inc(1);

        self.pb.set_message("Writing chunks...");
        let ihdr = ihdr_chunk(width, height)?;
        let idat = idat_chunk(&compressed)?;
        let iend = ChunkBuilder::new(&IEND)?.finalize()?;

        let mut out = Vec::new();
        reserve(&mut out, PNG_SIG.len() + ihdr.len() + idat.len() + iend.len())?;
        out.extend_from_slice(&PNG_SIG);
        out.extend_from_slice(&ihdr);
        out.extend_from_slice(&idat);
        out.extend_from_slice(&iend);
        self.pb.inc(1);

        debug!("encoded {}x{} image into {} bytes", width, height, out.len());
        Ok(out)
    }
}

/// Encodes with the default options: zlib at maximum effort.
pub fn encode<B: PixelBuffer + ?Sized>(image: &B) -> Result<Vec<u8>> {
    PngEncoder::default().encode(image)
}

fn ihdr_chunk(width: u32, height: u32) -> Result<Vec<u8>> {
    let mut chunk = ChunkBuilder::new(&IHDR)?;
    chunk.reserve(IHDR_LEN)?;
    chunk.append_big_endian(width)?;
    chunk.append_big_endian(height)?;
    chunk.append_u8(BIT_DEPTH)?;
    chunk.append_u8(ColorType::TruecolorAlpha.code())?;
    chunk.append_u8(0)?; // compression
    chunk.append_u8(0)?; // filter
    chunk.append_u8(0)?; // interlace
    chunk.finalize()
}

fn idat_chunk(compressed: &[u8]) -> Result<Vec<u8>> {
    let mut chunk = ChunkBuilder::new(&IDAT)?;
    chunk.append_bytes(compressed)?;
    chunk.finalize()
}

/// Copies every scanline into one RGBA buffer, fixing up the channel order.
fn normalized_pixels<B: PixelBuffer + ?Sized>(image: &B) -> Result<Vec<u8>> {
    let width = image.width() as usize;
    let order = image.channel_order();
    let total = checked_size(checked_size(width, image.height() as usize)?, BYTES_PER_PIXEL)?;

    let mut pixels = Vec::new();
    reserve(&mut pixels, total)?;

    for y in 0..image.height() {
        let line = image.scanline(y);
        if line.len() != width {
            return Err(EncodeError::DimensionMismatch { expected: width, actual: line.len() });
        }
        for &px in line {
            pixels.extend_from_slice(&order.to_rgba(px));
        }
    }

    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    struct Failing;

    impl Compressor for Failing {
        fn compress(&self, _data: &[u8], _level: CompressionLevel) -> io::Result<Vec<u8>> {
            Err(io::Error::new(io::ErrorKind::Other, "deflate exploded"))
        }
    }

    struct Ragged;

    impl PixelBuffer for Ragged {
        fn width(&self) -> u32 {
            2
        }

        fn height(&self) -> u32 {
            1
        }

        fn scanline(&self, _y: u32) -> &[[u8; 4]] {
            &[[1, 2, 3, 4]]
        }
    }

    #[test]
    fn ihdr_payload_layout() {
        let bytes = ihdr_chunk(0x0102_0304, 7).unwrap();
        assert_eq!(&bytes[..8], &[0, 0, 0, 13, b'I', b'H', b'D', b'R']);
        assert_eq!(&bytes[8..21], &[1, 2, 3, 4, 0, 0, 0, 7, 8, 6, 0, 0, 0]);
        assert_eq!(bytes.len(), IHDR_LEN + CHUNK_OVERHEAD);
    }

    #[test]
    fn compressor_failure_is_surfaced() {
        let bitmap = Bitmap::new(1, 1, ChannelOrder::Rgba).unwrap();
        let err = PngEncoder::default().with_compressor(Failing).encode(&bitmap).unwrap_err();

        match err {
            EncodeError::CompressionFailure(source) => assert_eq!(source.to_string(), "deflate exploded"),
            other => panic!("expected CompressionFailure, got {other:?}"),
        }
    }

    #[test]
    fn short_scanline_is_rejected() {
        let err = encode(&Ragged).unwrap_err();
        assert!(matches!(err, EncodeError::DimensionMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn pixels_are_normalized_before_filtering() {
        let bgra = Bitmap::from_bytes(2, 1, ChannelOrder::Bgra, &[3, 2, 1, 4, 30, 20, 10, 40]).unwrap();
        assert_eq!(normalized_pixels(&bgra).unwrap(), [1, 2, 3, 4, 10, 20, 30, 40]);
    }

    #[test]
    fn progress_ticks_once_per_stage() {
        let pb = ProgressBar::hidden();
        let bitmap = Bitmap::new(3, 2, ChannelOrder::Rgba).unwrap();
        PngEncoder::default().with_progress(pb.clone()).encode(&bitmap).unwrap();
        assert_eq!(pb.position(), 3);
    }
}
