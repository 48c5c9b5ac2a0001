pub mod crush_job;
pub mod manifest;
pub mod worker;

pub use crush_job::{CrushJob, JobReport, PARTITION_MAP_FILE};
pub use manifest::{CrushManifest, DirectoryListing};
pub use worker::{PartitionWorker, WorkerReport};
