use crate::engine::bucket::SourceFile;
use crate::engine::job::{CrushManifest, DirectoryListing};
use crate::test_helpers::factories::SourceFileFactory;
use std::path::{Path, PathBuf};

/// Writes text source files under `root` and lists them in a manifest with
/// their real sizes.
pub struct ManifestFactory {
    root: PathBuf,
    manifest: CrushManifest,
}

impl ManifestFactory {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            manifest: CrushManifest::default(),
        }
    }

    /// Adds `<root>/<dir>` with one file per `(name, record_count)`.
    pub fn with_dir(mut self, dir: &str, files: &[(&str, usize)]) -> Self {
        let dir_path = self.root.join(dir);
        let mut listing = DirectoryListing {
            path: dir_path.display().to_string(),
            files: Vec::new(),
        };

        for (name, records) in files {
            let path = SourceFileFactory::new()
                .in_dir(&dir_path)
                .named(name)
                .with_numbered_records(name, *records)
                .create();
            let size = std::fs::metadata(&path).unwrap().len();
            listing
                .files
                .push(SourceFile::new(path.display().to_string(), size));
        }

        self.manifest.directories.push(listing);
        self
    }

    /// Lists a file that was never written.
    pub fn with_missing_file(mut self, dir: &str, name: &str, size: u64) -> Self {
        let dir_path = self.root.join(dir);
        let file = SourceFile::new(dir_path.join(name).display().to_string(), size);
        match self
            .manifest
            .directories
            .iter_mut()
            .find(|d| Path::new(&d.path) == dir_path)
        {
            Some(listing) => listing.files.push(file),
            None => self.manifest.directories.push(DirectoryListing {
                path: dir_path.display().to_string(),
                files: vec![file],
            }),
        }
        self
    }

    pub fn create(self) -> CrushManifest {
        self.manifest
    }

    /// Writes the manifest as JSON to `path` and returns it.
    pub fn write_to(self, path: &Path) -> CrushManifest {
        std::fs::write(path, serde_json::to_string_pretty(&self.manifest).unwrap()).unwrap();
        self.manifest
    }
}
