use super::{Codec, Compression, Record, RecordReader, RecordType, RecordWriter};
use crate::engine::errors::CodecError;
use crate::shared::storage_header::{BinaryHeader, FileKind};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;
use tracing::debug;

/// Binary record files.
///
/// Layout:
///   [BinaryHeader (SequenceRecords), flags = compression]
///   bincode((key_type, value_type))
///   repeated: len u32 LE | block
/// where each block is `bincode(Record)` passed through the compression named
/// in the header. Readers follow the header, whatever codec id opened them.
#[derive(Debug, Clone, Copy)]
pub struct SequenceCodec {
    id: &'static str,
    compression: Compression,
}

impl SequenceCodec {
    pub const ID: &'static str = "sequence";
    pub const LZ4_ID: &'static str = "sequence-lz4";
    pub const ZSTD_ID: &'static str = "sequence-zstd";

    pub fn plain() -> Self {
        Self {
            id: Self::ID,
            compression: Compression::None,
        }
    }

    pub fn lz4() -> Self {
        Self {
            id: Self::LZ4_ID,
            compression: Compression::Lz4,
        }
    }

    pub fn zstd() -> Self {
        Self {
            id: Self::ZSTD_ID,
            compression: Compression::Zstd,
        }
    }
}

impl Codec for SequenceCodec {
    fn id(&self) -> &str {
        self.id
    }

    fn open_reader(&self, path: &Path) -> Result<Box<dyn RecordReader>, CodecError> {
        let mut reader = BufReader::new(File::open(path)?);
        let header = BinaryHeader::read_expected(&mut reader, FileKind::SequenceRecords)?;
        let compression = Compression::from_flag(header.flags)?;
        let (key_type, value_type): (RecordType, RecordType) =
            bincode::deserialize_from(&mut reader)?;

        debug!(
            target: "sequence_codec::open_reader",
            path = %path.display(),
            ?compression,
            key_type = %key_type,
            value_type = %value_type,
            "Opened sequence file"
        );

        Ok(Box::new(SequenceReader {
            reader,
            compression,
            key_type,
            value_type,
        }))
    }

    fn open_writer(
        &self,
        path: &Path,
        key_type: &RecordType,
        value_type: &RecordType,
    ) -> Result<Box<dyn RecordWriter>, CodecError> {
        let mut writer = BufWriter::new(File::create(path)?);
        BinaryHeader::for_kind(FileKind::SequenceRecords, self.compression.flag())
            .write_to(&mut writer)?;
        bincode::serialize_into(&mut writer, &(key_type, value_type))?;

        Ok(Box::new(SequenceWriter {
            writer,
            compression: self.compression,
        }))
    }
}

pub struct SequenceReader {
    reader: BufReader<File>,
    compression: Compression,
    key_type: RecordType,
    value_type: RecordType,
}

impl SequenceReader {
    /// Reads the next length prefix. A clean EOF before the first byte ends the file.
    fn read_len(&mut self) -> Result<Option<usize>, CodecError> {
        let mut buf = [0u8; 4];
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) if filled == 0 => return Ok(None),
                Ok(0) => {
                    return Err(CodecError::Corrupt(
                        "truncated record length".to_string(),
                    ));
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(Some(u32::from_le_bytes(buf) as usize))
    }
}

impl RecordReader for SequenceReader {
    fn key_type(&self) -> &RecordType {
        &self.key_type
    }

    fn value_type(&self) -> &RecordType {
        &self.value_type
    }

    fn next_record(&mut self) -> Result<Option<Record>, CodecError> {
        let Some(len) = self.read_len()? else {
            return Ok(None);
        };

        // Untrusted length: never allocate more than the file holds.
        let mut block = Vec::new();
        (&mut self.reader)
            .take(len as u64)
            .read_to_end(&mut block)?;
        if block.len() < len {
            return Err(CodecError::Corrupt(format!(
                "truncated record block: expected {} bytes, found {}",
                len,
                block.len()
            )));
        }

        let raw = self.compression.decompress(&block)?;
        let record: Record = bincode::deserialize(&raw)?;
        Ok(Some(record))
    }

    fn close(self: Box<Self>) -> Result<(), CodecError> {
        Ok(())
    }
}

pub struct SequenceWriter {
    writer: BufWriter<File>,
    compression: Compression,
}

impl RecordWriter for SequenceWriter {
    fn write(&mut self, record: &Record) -> Result<(), CodecError> {
        let raw = bincode::serialize(record)?;
        let block = self.compression.compress(&raw)?;
        let len = u32::try_from(block.len())
            .map_err(|_| CodecError::Corrupt(format!("record block too large: {}", block.len())))?;

        self.writer.write_all(&len.to_le_bytes())?;
        self.writer.write_all(&block)?;
        Ok(())
    }

    fn close(mut self: Box<Self>) -> Result<(), CodecError> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        Ok(())
    }
}
