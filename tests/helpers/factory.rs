pub use super::factories::{
    CrushSpecFactory, JobConfigFactory, ManifestFactory, SourceFileFactory,
};
use std::path::Path;

pub struct Factory;

impl Factory {
    pub fn source_file() -> SourceFileFactory {
        SourceFileFactory::new()
    }

    pub fn crush_spec() -> CrushSpecFactory {
        CrushSpecFactory::new()
    }

    pub fn manifest(root: &Path) -> ManifestFactory {
        ManifestFactory::new(root)
    }

    pub fn job_config(root: &Path) -> JobConfigFactory {
        JobConfigFactory::new(root)
    }
}
