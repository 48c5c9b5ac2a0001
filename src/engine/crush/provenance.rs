use crate::engine::codec::Record;
use serde::Serialize;
use std::path::Path;

/// `source` was crushed into `output` (final location, not the staging copy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provenance {
    pub source: String,
    pub output: String,
}

impl Provenance {
    pub fn new(source: &Path, output: &Path) -> Self {
        Self {
            source: source.display().to_string(),
            output: output.display().to_string(),
        }
    }

    /// One `source<TAB>output` line in a provenance file.
    pub fn to_record(&self) -> Record {
        Record::new(self.source.as_bytes(), self.output.as_bytes())
    }
}
