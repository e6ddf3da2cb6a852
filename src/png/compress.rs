use std::io::{self, Write};
use std::num::NonZeroU64;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use zopfli::{Format, Options};

use crate::png::types::{CompressionLevel, CompressorKind};

/// Byte stream to zlib stream. Implementations keep no state between calls.
pub trait Compressor {
    fn compress(&self, data: &[u8], level: CompressionLevel) -> io::Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ZlibCompressor;

impl Compressor for ZlibCompressor {
    fn compress(&self, data: &[u8], level: CompressionLevel) -> io::Result<Vec<u8>> {
        let compression = match level {
            CompressionLevel::Fast => Compression::fast(),
            CompressionLevel::Balanced => Compression::default(),
            CompressionLevel::Maximum => Compression::best(),
        };

        let mut encoder = ZlibEncoder::new(Vec::new(), compression);
        encoder.write_all(data)?;
        encoder.finish()
    }
}

/// Slow, denser zlib streams. `level` picks the iteration count.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZopfliCompressor;

impl ZopfliCompressor {
    fn iterations(level: CompressionLevel) -> NonZeroU64 {
        let n = match level {
            CompressionLevel::Fast => 5,
            CompressionLevel::Balanced => 15,
            CompressionLevel::Maximum => 100,
        };
        NonZeroU64::new(n).unwrap_or(NonZeroU64::MIN)
    }
}

impl Compressor for ZopfliCompressor {
    fn compress(&self, data: &[u8], level: CompressionLevel) -> io::Result<Vec<u8>> {
        let options = Options {
            iteration_count: Self::iterations(level),
            ..Options::default()
        };

        let mut compressed = Vec::new();
        zopfli::compress(options, Format::Zlib, data, &mut compressed)?;
        Ok(compressed)
    }
}

impl CompressorKind {
    pub fn compressor(self) -> Box<dyn Compressor> {
        match self {
            CompressorKind::Zlib => Box::new(ZlibCompressor),
            CompressorKind::Zopfli => Box::new(ZopfliCompressor),
        }
    }
}
