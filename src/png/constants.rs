// https://www.w3.org/TR/png-3/#5PNG-file-signature
pub const PNG_SIG: [u8; 8] = [0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];

pub const IHDR: [u8; 4] = *b"IHDR";
pub const IDAT: [u8; 4] = *b"IDAT";
pub const IEND: [u8; 4] = *b"IEND";

/// IHDR payload: width, height, depth, color type, compression, filter, interlace.
pub const IHDR_LEN: usize = 13;

pub const BIT_DEPTH: u8 = 8;
pub const BYTES_PER_PIXEL: usize = 4;

// 5.3: the length field counts only the data and must not exceed 2^31 - 1.
pub const MAX_CHUNK_LEN: usize = (1 << 31) - 1;

// length + type + crc
pub const CHUNK_OVERHEAD: usize = 12;

/// Below this many rows the rayon path costs more than it saves.
pub const PARALLEL_MIN_ROWS: usize = 32;
