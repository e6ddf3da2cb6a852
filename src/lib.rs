//! PNG encoder for 8-bit RGBA rasters.
//!
//! Every scanline is filtered with all five PNG predictors, the one with the
//! smallest sum of absolute signed bytes is kept, and the result is
//! zlib-compressed into a single IDAT chunk.
//!
//! ```no_run
//! use rgbapng::png::{encode, Bitmap, ChannelOrder, Pixel};
//!
//! let mut bitmap = Bitmap::new(2, 2, ChannelOrder::Rgba)?;
//! bitmap.set(0, 0, Pixel::new(255, 0, 0, 255));
//! let bytes = encode(&bitmap)?;
//! std::fs::write("out.png", bytes).unwrap();
//! # Ok::<(), rgbapng::png::EncodeError>(())
//! ```

pub mod png;
