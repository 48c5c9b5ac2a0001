use crate::engine::errors::PartitionMapError;
use crate::shared::storage_header::{BinaryHeader, FileKind};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionEntry {
    pub bucket: String,
    pub partition: u32,
}

/// Persisted `bucket -> partition` table for one run.
///
/// Entries keep the order they were assigned in; duplicates are preserved on
/// load so the router can reject them instead of silently overwriting.
///
/// File format:
///   [BinaryHeader (PartitionMap)]
///   bincode(Vec<PartitionEntry>)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionMap {
    entries: Vec<PartitionEntry>,
}

impl PartitionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, bucket: impl Into<String>, partition: u32) {
        self.entries.push(PartitionEntry {
            bucket: bucket.into(),
            partition,
        });
    }

    pub fn entries(&self) -> &[PartitionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the map atomically: temp file, fsync, rename.
    pub fn save(&self, path: &Path) -> Result<(), PartitionMapError> {
        let io_err = |source| PartitionMapError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut tmp_path = path.to_path_buf();
        tmp_path.set_extension("tmp");

        let file = File::create(&tmp_path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        BinaryHeader::for_kind(FileKind::PartitionMap, 0)
            .write_to(&mut writer)
            .map_err(io_err)?;
        bincode::serialize_into(&mut writer, &self.entries)?;

        writer.flush().map_err(io_err)?;
        writer.get_ref().sync_all().map_err(io_err)?;
        drop(writer);

        std::fs::rename(&tmp_path, path).map_err(io_err)?;

        info!(target: "partition_map::save", path = %path.display(), entries = self.entries.len(), "Saved partition map");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, PartitionMapError> {
        let io_err = |source| PartitionMapError::Io {
            path: path.to_path_buf(),
            source,
        };

        let tmp_path = path.with_extension("tmp");
        if tmp_path.exists() {
            warn!(target: "partition_map::load", tmp = %tmp_path.display(), "Ignoring leftover temporary partition map");
        }

        let mut file = File::open(path).map_err(io_err)?;
        BinaryHeader::read_expected(&mut file, FileKind::PartitionMap).map_err(io_err)?;
        let entries: Vec<PartitionEntry> = bincode::deserialize_from(BufReader::new(file))?;

        debug!(target: "partition_map::load", path = %path.display(), entries = entries.len(), "Loaded partition map");
        Ok(Self { entries })
    }
}
