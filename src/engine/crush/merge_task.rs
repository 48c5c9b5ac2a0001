use crate::engine::bucket::Bucket;
use crate::engine::errors::CrushSpecError;
use std::path::PathBuf;

/// Everything needed to crush one bucket into one output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeTask {
    pub bucket: String,
    pub directory: String,
    pub sources: Vec<PathBuf>,
}

impl MergeTask {
    pub fn new(
        bucket: impl Into<String>,
        sources: Vec<PathBuf>,
    ) -> Result<Self, CrushSpecError> {
        let bucket = bucket.into();
        let directory = Self::directory_of(&bucket)?.to_string();
        Ok(Self {
            bucket,
            directory,
            sources,
        })
    }

    pub fn from_bucket(bucket: &Bucket) -> Result<Self, CrushSpecError> {
        Self::new(
            bucket.name.clone(),
            bucket.members.iter().map(PathBuf::from).collect(),
        )
    }

    /// `/a/b-c-3` → `/a/b-c`: everything before the last `-`.
    pub fn directory_of(bucket: &str) -> Result<&str, CrushSpecError> {
        bucket
            .rfind('-')
            .map(|idx| &bucket[..idx])
            .ok_or_else(|| CrushSpecError::InvalidBucketName(bucket.to_string()))
    }
}
