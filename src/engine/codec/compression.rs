use crate::engine::errors::CodecError;
use lz4_flex::block::{
    compress_prepend_size as lz4_compress, decompress_size_prepended as lz4_decompress,
};

pub const ZSTD_LEVEL: i32 = 3;

/// Per-record block compression used by the sequence format.
/// The numeric id is what lands in the file header flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Lz4,
    Zstd,
}

impl Compression {
    pub fn flag(&self) -> u16 {
        match self {
            Compression::None => 0,
            Compression::Lz4 => 1,
            Compression::Zstd => 2,
        }
    }

    pub fn from_flag(flag: u16) -> Result<Self, CodecError> {
        match flag {
            0 => Ok(Compression::None),
            1 => Ok(Compression::Lz4),
            2 => Ok(Compression::Zstd),
            other => Err(CodecError::Corrupt(format!(
                "unknown compression flag {}",
                other
            ))),
        }
    }

    pub fn compress(&self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        match self {
            Compression::None => Ok(input.to_vec()),
            Compression::Lz4 => Ok(lz4_compress(input)),
            Compression::Zstd => zstd::encode_all(input, ZSTD_LEVEL)
                .map_err(|e| CodecError::Compression(format!("zstd compress: {e}"))),
        }
    }

    pub fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        match self {
            Compression::None => Ok(input.to_vec()),
            Compression::Lz4 => lz4_decompress(input)
                .map_err(|e| CodecError::Compression(format!("lz4 decompress: {e}"))),
            Compression::Zstd => zstd::decode_all(input)
                .map_err(|e| CodecError::Compression(format!("zstd decompress: {e}"))),
        }
    }
}
