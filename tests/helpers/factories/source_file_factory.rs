use crate::engine::codec::{CodecRegistry, Record, RecordType};
use std::path::{Path, PathBuf};

/// Writes a source file with the given records through a registered codec.
pub struct SourceFileFactory {
    dir: PathBuf,
    name: String,
    codec: String,
    key_type: RecordType,
    value_type: RecordType,
    records: Vec<Record>,
}

impl SourceFileFactory {
    pub fn new() -> Self {
        Self {
            dir: std::env::temp_dir(),
            name: "part-00000".to_string(),
            codec: "text".to_string(),
            key_type: RecordType::text(),
            value_type: RecordType::text(),
            records: vec![Record::new("key", "value")],
        }
    }

    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.dir = dir.to_path_buf();
        self
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn codec(mut self, id: &str) -> Self {
        self.codec = id.to_string();
        self
    }

    pub fn types(mut self, key_type: &str, value_type: &str) -> Self {
        self.key_type = RecordType::new(key_type);
        self.value_type = RecordType::new(value_type);
        self
    }

    pub fn with_records(mut self, records: &[(&str, &str)]) -> Self {
        self.records = records.iter().map(|(k, v)| Record::new(*k, *v)).collect();
        self
    }

    /// `count` records named `<prefix>-<i>` with value `<i>`.
    pub fn with_numbered_records(mut self, prefix: &str, count: usize) -> Self {
        self.records = (0..count)
            .map(|i| Record::new(format!("{}-{}", prefix, i), i.to_string()))
            .collect();
        self
    }

    pub fn create(self) -> PathBuf {
        std::fs::create_dir_all(&self.dir).unwrap();
        let path = self.dir.join(&self.name);

        let codec = CodecRegistry::with_defaults().get(&self.codec).unwrap();
        let mut writer = codec
            .open_writer(&path, &self.key_type, &self.value_type)
            .unwrap();
        for record in &self.records {
            writer.write(record).unwrap();
        }
        writer.close().unwrap();
        path
    }
}
