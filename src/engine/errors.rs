use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error};

/// Misuse of a bucketing session or invalid bucketer construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BucketerError {
    #[error("Must have at least one bucket: {0}")]
    InvalidMaxBuckets(usize),

    #[error("Session name is empty")]
    EmptyName,

    #[error("No session active, call reset first")]
    NoActiveSession,
}

#[derive(Debug, Error)]
pub enum PartitionMapError {
    #[error("IO error on partition map {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Partition map serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Bucket {bucket} appears more than once in {location}")]
    DuplicateBucket { bucket: String, location: String },

    #[error("Partition {partition} not allowed with {partitions} partitions")]
    PartitionOutOfRange { partition: u32, partitions: usize },

    #[error("Bucket {0} is not in the partition map")]
    UnknownBucket(String),

    #[error("Must have at least one partition")]
    NoPartitions,
}

/// Configuration errors around crush specs and output naming.
#[derive(Debug, Error)]
pub enum CrushSpecError {
    #[error("No crush specs configured")]
    NoSpecs,

    #[error("No input regex: {0}")]
    MissingRegex(String),

    #[error("Invalid input regex {key}: {source}")]
    InvalidRegex {
        key: String,
        #[source]
        source: regex::Error,
    },

    #[error("No output replacement: {0}")]
    MissingReplacement(String),

    #[error("No input codec: {0}")]
    MissingInputCodec(String),

    #[error("Not a known input codec: {key}={value}")]
    UnknownInputCodec { key: String, value: String },

    #[error("No output codec: {0}")]
    MissingOutputCodec(String),

    #[error("Not a known output codec: {key}={value}")]
    UnknownOutputCodec { key: String, value: String },

    #[error("No matching input regex: {0}")]
    NoMatchingSpec(String),

    #[error("No value for key: {0}")]
    UnknownPlaceholder(String),

    #[error("Invalid output replacement {template}: {reason}")]
    InvalidReplacement { template: String, reason: String },

    #[error("No group {group} in regex {pattern}")]
    InvalidGroupReference { group: String, pattern: String },

    #[error("Bucket name has no ordinal suffix: {0}")]
    InvalidBucketName(String),
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Record serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Corrupt record file: {0}")]
    Corrupt(String),

    #[error("Compression error: {0}")]
    Compression(String),
}

/// Failure while merging a single bucket. The bucket produces no output.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error(transparent)]
    Spec(#[from] CrushSpecError),

    #[error("Could not open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("Could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("Could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("Could not close {}: {source}", .path.display())]
    Close {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("Heterogeneous keys detected in {}: {expected} != {found}", .path.display())]
    HeterogeneousKeys {
        path: PathBuf,
        expected: String,
        found: String,
    },

    #[error("Heterogeneous values detected in {}: {expected} != {found}", .path.display())]
    HeterogeneousValues {
        path: PathBuf,
        expected: String,
        found: String,
    },

    #[error("Could not commit {} to {}: {source}", .from.display(), .to.display())]
    Commit {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MergeError {
    pub fn log_error(&self, bucket: &str) {
        match self {
            MergeError::Spec(e) => {
                error!(target: "bucket_merger::merge", bucket, "Configuration error: {}", e);
            }
            MergeError::HeterogeneousKeys { path, .. }
            | MergeError::HeterogeneousValues { path, .. } => {
                error!(target: "bucket_merger::merge", bucket, path = %path.display(), "Heterogeneous records: {}", self);
            }
            other => {
                error!(target: "bucket_merger::merge", bucket, "Merge failed: {}", other);
                debug!(target: "bucket_merger::merge", bucket, "Merge failure details: {:?}", other);
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Could not read manifest {}: {source}", .path.display())]
    ManifestIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not parse manifest {}: {source}", .path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid job configuration: {0}")]
    InvalidConfig(String),

    #[error("Could not prepare output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Bucketer(#[from] BucketerError),

    #[error(transparent)]
    Spec(#[from] CrushSpecError),

    #[error(transparent)]
    PartitionMap(#[from] PartitionMapError),

    #[error("Partition {partition} failed on bucket {bucket}: {source}")]
    Merge {
        partition: u32,
        bucket: String,
        #[source]
        source: MergeError,
    },

    #[error("Partition {partition} could not write provenance {}: {source}", .path.display())]
    Provenance {
        partition: u32,
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("Partition {partition} could not prepare {}: {source}", .path.display())]
    Workspace {
        partition: u32,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Partition worker {partition} panicked or was cancelled: {reason}")]
    Join { partition: u32, reason: String },
}
