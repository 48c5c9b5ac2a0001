use crate::engine::bucket::Bucket;
use crate::engine::codec::{Codec, RecordType, RecordWriter, TextCodec};
use crate::engine::crush::{
    BucketMerger, CrushSpecs, MergeCounters, MergeTask, OutputLayout, OutputNamer,
};
use crate::engine::errors::{JobError, MergeError, PartitionMapError};
use crate::engine::partition::PartitionRouter;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const TEMPORARY_DIR: &str = "_temporary";

/// `part-00003`
pub fn part_file_name(partition: u32) -> String {
    format!("part-{:05}", partition)
}

#[derive(Debug, Clone, Default)]
pub struct WorkerReport {
    pub partition: u32,
    pub buckets: usize,
    pub counters: MergeCounters,
    pub provenance_path: PathBuf,
    pub last_status: Option<String>,
}

/// Crushes every bucket routed to one partition.
///
/// Blocking: meant to run on its own thread. Buckets are merged one at a
/// time in name order and each finished output is committed immediately.
/// Provenance lines are staged and published as `<output_dir>/part-NNNNN`
/// once every bucket of the partition succeeded.
pub struct PartitionWorker {
    pub partition: u32,
    pub partitions: usize,
    pub map_path: PathBuf,
    pub output_dir: PathBuf,
    pub specs: Arc<CrushSpecs>,
    pub buckets: Arc<Vec<Bucket>>,
    pub timestamp: u64,
    pub report_every: u64,
}

impl PartitionWorker {
    pub fn work_dir(&self) -> PathBuf {
        self.output_dir
            .join(TEMPORARY_DIR)
            .join(part_file_name(self.partition))
    }

    pub fn provenance_path(&self) -> PathBuf {
        self.output_dir.join(part_file_name(self.partition))
    }

    pub fn run(self) -> Result<WorkerReport, JobError> {
        let partition = self.partition;

        // Step 1: Load and validate the routing table
        let router = PartitionRouter::load(&self.map_path, self.partitions)?;

        // Step 2: Prepare the private staging tree
        let work_dir = self.work_dir();
        fs::create_dir_all(&work_dir).map_err(|source| JobError::Workspace {
            partition,
            path: work_dir.clone(),
            source,
        })?;

        let staged_provenance = work_dir.join(part_file_name(partition));
        let mut provenance = TextCodec
            .open_writer(&staged_provenance, &RecordType::text(), &RecordType::text())
            .map_err(|source| JobError::Provenance {
                partition,
                path: staged_provenance.clone(),
                source,
            })?;

        let mut merger = BucketMerger::new(
            Arc::clone(&self.specs),
            OutputNamer::new(partition, self.timestamp),
            OutputLayout::new(&work_dir, &self.output_dir),
        )
        .with_report_every(self.report_every);

        // Step 3: Merge this partition's buckets in name order
        let planned: HashMap<&str, &Bucket> = self
            .buckets
            .iter()
            .map(|b| (b.name.as_str(), b))
            .collect();
        let mut mine: Vec<&Bucket> = Vec::new();
        for name in router.buckets_for(partition) {
            let bucket = planned
                .get(name)
                .copied()
                .ok_or_else(|| PartitionMapError::UnknownBucket(name.to_string()))?;
            mine.push(bucket);
        }
        info!(target: "partition_worker::run", partition, buckets = mine.len(), "Starting partition");

        let mut counters = MergeCounters::default();
        for bucket in &mine {
            let merged = self.merge_one(&mut merger, bucket, provenance.as_mut())?;
            counters += merged;
        }

        // Step 4: Publish provenance and drop the staging tree
        provenance.close().map_err(|source| JobError::Provenance {
            partition,
            path: staged_provenance.clone(),
            source,
        })?;
        let provenance_path = self.provenance_path();
        fs::rename(&staged_provenance, &provenance_path).map_err(|source| {
            JobError::Workspace {
                partition,
                path: provenance_path.clone(),
                source,
            }
        })?;
        remove_work_dir(partition, &work_dir);

        info!(
            target: "partition_worker::run",
            partition,
            buckets = mine.len(),
            files = counters.files_merged,
            records = counters.records_merged,
            "Partition complete"
        );

        Ok(WorkerReport {
            partition,
            buckets: mine.len(),
            counters,
            provenance_path,
            last_status: merger.last_status().map(str::to_string),
        })
    }

    fn merge_one(
        &self,
        merger: &mut BucketMerger,
        bucket: &Bucket,
        provenance: &mut dyn RecordWriter,
    ) -> Result<MergeCounters, JobError> {
        let merge_err = |source: MergeError| JobError::Merge {
            partition: self.partition,
            bucket: bucket.name.clone(),
            source,
        };

        let task = MergeTask::from_bucket(bucket).map_err(|e| merge_err(e.into()))?;
        let outcome = merger.merge(&task).map_err(merge_err)?;
        outcome.commit().map_err(merge_err)?;

        for line in &outcome.provenance {
            provenance
                .write(&line.to_record())
                .map_err(|source| JobError::Provenance {
                    partition: self.partition,
                    path: self.provenance_path(),
                    source,
                })?;
        }

        debug!(
            target: "partition_worker::run",
            partition = self.partition,
            bucket = %bucket.name,
            output = %outcome.final_path.display(),
            "Bucket committed"
        );
        Ok(outcome.counters)
    }
}

fn remove_work_dir(partition: u32, work_dir: &Path) {
    if let Err(e) = fs::remove_dir_all(work_dir) {
        warn!(
            target: "partition_worker::run",
            partition,
            path = %work_dir.display(),
            error = %e,
            "Could not remove staging directory"
        );
    }
}
