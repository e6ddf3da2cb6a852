pub mod chunk;
pub mod compress;
pub mod constants;
pub mod error;
pub mod filter;
pub mod types;
pub mod write;

pub use chunk::ChunkBuilder;
pub use compress::{Compressor, ZlibCompressor, ZopfliCompressor};
pub use constants::*;
pub use error::{EncodeError, Result};
pub use filter::{FilterCandidate, FilterType};
pub use types::*;
pub use write::{encode, EncoderOptions, PngEncoder};
