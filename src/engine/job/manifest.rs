use crate::engine::bucket::SourceFile;
use crate::engine::errors::JobError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// One directory and the files in it that are eligible for crushing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryListing {
    pub path: String,
    #[serde(default)]
    pub files: Vec<SourceFile>,
}

impl DirectoryListing {
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Planner output consumed by a crush job (JSON).
///
/// ```json
/// { "directories": [ { "path": "/in/logs", "files": [ { "path": "/in/logs/a", "size": 10 } ] } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrushManifest {
    pub directories: Vec<DirectoryListing>,
}

impl CrushManifest {
    pub fn load(path: &Path) -> Result<Self, JobError> {
        let raw = std::fs::read_to_string(path).map_err(|source| JobError::ManifestIo {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: Self =
            serde_json::from_str(&raw).map_err(|source| JobError::ManifestParse {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            target: "crush_manifest::load",
            path = %path.display(),
            directories = manifest.directories.len(),
            files = manifest.file_count(),
            bytes = manifest.total_bytes(),
            "Loaded manifest"
        );
        Ok(manifest)
    }

    pub fn file_count(&self) -> usize {
        self.directories.iter().map(|d| d.files.len()).sum()
    }

    pub fn total_bytes(&self) -> u64 {
        self.directories.iter().map(DirectoryListing::total_bytes).sum()
    }
}
