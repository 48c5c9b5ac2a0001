use super::{Codec, Record, RecordReader, RecordType, RecordWriter};
use crate::engine::errors::CodecError;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

const SEPARATOR: u8 = b'\t';

/// Newline-delimited records. Each line splits at its first TAB; a line
/// without one is a key with no value.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextCodec;

impl TextCodec {
    pub const ID: &'static str = "text";
}

impl Codec for TextCodec {
    fn id(&self) -> &str {
        Self::ID
    }

    fn open_reader(&self, path: &Path) -> Result<Box<dyn RecordReader>, CodecError> {
        let file = File::open(path)?;
        Ok(Box::new(TextReader {
            reader: BufReader::new(file),
            key_type: RecordType::text(),
            value_type: RecordType::text(),
            line: Vec::new(),
        }))
    }

    fn open_writer(
        &self,
        path: &Path,
        _key_type: &RecordType,
        _value_type: &RecordType,
    ) -> Result<Box<dyn RecordWriter>, CodecError> {
        let file = File::create(path)?;
        Ok(Box::new(TextWriter {
            writer: BufWriter::new(file),
        }))
    }
}

pub struct TextReader {
    reader: BufReader<File>,
    key_type: RecordType,
    value_type: RecordType,
    line: Vec<u8>,
}

impl RecordReader for TextReader {
    fn key_type(&self) -> &RecordType {
        &self.key_type
    }

    fn value_type(&self) -> &RecordType {
        &self.value_type
    }

    fn next_record(&mut self) -> Result<Option<Record>, CodecError> {
        self.line.clear();
        let read = self.reader.read_until(b'\n', &mut self.line)?;
        if read == 0 {
            return Ok(None);
        }
        if self.line.last() == Some(&b'\n') {
            self.line.pop();
        }

        let record = match self.line.iter().position(|b| *b == SEPARATOR) {
            Some(pos) => Record::new(&self.line[..pos], &self.line[pos + 1..]),
            None => Record::key_only(self.line.as_slice()),
        };
        Ok(Some(record))
    }

    fn close(self: Box<Self>) -> Result<(), CodecError> {
        Ok(())
    }
}

pub struct TextWriter {
    writer: BufWriter<File>,
}

impl RecordWriter for TextWriter {
    fn write(&mut self, record: &Record) -> Result<(), CodecError> {
        self.writer.write_all(&record.key)?;
        if let Some(value) = &record.value {
            self.writer.write_all(&[SEPARATOR])?;
            self.writer.write_all(value)?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn close(mut self: Box<Self>) -> Result<(), CodecError> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        Ok(())
    }
}
