use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodeError {
    /// A buffer could not grow, or its size does not fit in `usize`.
    #[error("could not allocate {requested} more bytes")]
    ResourceExhaustion { requested: usize },

    /// The zlib backend failed. Its error is passed through untouched.
    #[error("zlib compression failed")]
    CompressionFailure(#[source] std::io::Error),

    #[error("chunk type must be exactly 4 ASCII bytes, got {0:?}")]
    InvalidChunkType(Vec<u8>),

    #[error("chunk payload of {len} bytes exceeds the PNG limit")]
    ChunkTooLarge { len: usize },

    #[error("pixel data has length {actual}, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, EncodeError>;

/// Fallible `Vec::reserve`: allocation failure becomes an error instead of an abort.
pub(crate) fn reserve<T>(buf: &mut Vec<T>, additional: usize) -> Result<()> {
    buf.try_reserve(additional)
        .map_err(|_| EncodeError::ResourceExhaustion { requested: additional })
}

pub(crate) fn checked_size(a: usize, b: usize) -> Result<usize> {
    a.checked_mul(b)
        .ok_or(EncodeError::ResourceExhaustion { requested: usize::MAX })
}
