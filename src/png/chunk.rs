use byteorder::{BigEndian, ByteOrder, LittleEndian};
use crc32fast::Hasher;
use log::debug;

use crate::png::constants::*;
use crate::png::error::{reserve, EncodeError, Result};

/// Integers that can be appended to a chunk payload in either byte order.
pub trait ChunkInt: Copy {
    const SIZE: usize;

    fn put<B: ByteOrder>(self, buf: &mut [u8]);
}

macro_rules! chunk_int {
    ($($ty:ty => $write:ident),* $(,)?) => {
        $(
            impl ChunkInt for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn put<B: ByteOrder>(self, buf: &mut [u8]) {
                    B::$write(buf, self);
                }
            }
        )*
    };
}

chunk_int! {
    u16 => write_u16,
    u32 => write_u32,
    u64 => write_u64,
    i16 => write_i16,
    i32 => write_i32,
    i64 => write_i64,
}

/// One PNG chunk under construction.
///
/// The type is fixed up front and payload bytes are appended. Length and CRC
/// are only derived in [`ChunkBuilder::finalize`], which consumes the builder.
#[derive(Debug)]
pub struct ChunkBuilder {
    chunk_type: [u8; 4],
    data: Vec<u8>,
}

impl ChunkBuilder {
    pub fn new(chunk_type: &[u8]) -> Result<ChunkBuilder> {
        let chunk_type: [u8; 4] = chunk_type
            .try_into()
            .ok()
            .filter(|code: &[u8; 4]| code.is_ascii())
            .ok_or_else(|| EncodeError::InvalidChunkType(chunk_type.to_vec()))?;

        Ok(ChunkBuilder { chunk_type, data: Vec::new() })
    }

    pub fn chunk_type(&self) -> &[u8; 4] {
        &self.chunk_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        reserve(&mut self.data, additional)
    }

    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        reserve(&mut self.data, bytes.len())?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    pub fn append_u8(&mut self, value: u8) -> Result<()> {
        reserve(&mut self.data, 1)?;
        self.data.push(value);
        Ok(())
    }

    pub fn append_big_endian<T: ChunkInt>(&mut self, value: T) -> Result<()> {
        self.append::<BigEndian, T>(value)
    }

    pub fn append_little_endian<T: ChunkInt>(&mut self, value: T) -> Result<()> {
        self.append::<LittleEndian, T>(value)
    }

    fn append<B: ByteOrder, T: ChunkInt>(&mut self, value: T) -> Result<()> {
        reserve(&mut self.data, T::SIZE)?;
        let start = self.data.len();
        self.data.resize(start + T::SIZE, 0);
        value.put::<B>(&mut self.data[start..]);
        Ok(())
    }

    pub fn crc(&self) -> u32 {
        let mut hasher = Hasher::new();
        hasher.update(&self.chunk_type);
        hasher.update(&self.data);
        hasher.finalize()
    }

    /// Serializes as `length (BE) | type | payload | crc (BE)`.
    pub fn finalize(self) -> Result<Vec<u8>> {
        let len = self.data.len();
        if len > MAX_CHUNK_LEN {
            return Err(EncodeError::ChunkTooLarge { len });
        }

        let crc = self.crc();
        let mut out = Vec::new();
        reserve(&mut out, len + CHUNK_OVERHEAD)?;

        let mut word = [0u8; 4];
        BigEndian::write_u32(&mut word, len as u32);
        out.extend_from_slice(&word);
        out.extend_from_slice(&self.chunk_type);
        out.extend_from_slice(&self.data);
        BigEndian::write_u32(&mut word, crc);
        out.extend_from_slice(&word);

        debug!(
            "{} chunk: {} payload bytes, crc {:08x}",
            String::from_utf8_lossy(&self.chunk_type),
            len,
            crc
        );

        Ok(out)
    }
}
