pub mod compression;
pub mod record;
pub mod registry;
pub mod sequence;
pub mod text;

pub use compression::Compression;
pub use record::{Record, RecordType};
pub use registry::CodecRegistry;
pub use sequence::SequenceCodec;
pub use text::TextCodec;

use crate::engine::errors::CodecError;
use std::fmt;
use std::path::Path;

/// A file format that merged records can be read from and written to.
pub trait Codec: Send + Sync + fmt::Debug {
    fn id(&self) -> &str;

    fn open_reader(&self, path: &Path) -> Result<Box<dyn RecordReader>, CodecError>;

    fn open_writer(
        &self,
        path: &Path,
        key_type: &RecordType,
        value_type: &RecordType,
    ) -> Result<Box<dyn RecordWriter>, CodecError>;
}

/// Sequential record source. Types are known as soon as the reader is open.
pub trait RecordReader: Send {
    fn key_type(&self) -> &RecordType;
    fn value_type(&self) -> &RecordType;

    /// Returns `None` once the file is exhausted.
    fn next_record(&mut self) -> Result<Option<Record>, CodecError>;

    fn close(self: Box<Self>) -> Result<(), CodecError>;
}

pub trait RecordWriter: Send {
    fn write(&mut self, record: &Record) -> Result<(), CodecError>;

    /// Flushes and syncs. Nothing written is durable before this returns.
    fn close(self: Box<Self>) -> Result<(), CodecError>;
}
