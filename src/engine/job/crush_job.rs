use super::manifest::CrushManifest;
use super::worker::{PartitionWorker, WorkerReport};
use crate::engine::bucket::{Bucket, Bucketer};
use crate::engine::codec::CodecRegistry;
use crate::engine::crush::{CrushSpecs, MergeCounters};
use crate::engine::errors::JobError;
use crate::engine::partition::PartitionAssigner;
use crate::shared::config::{JobConfig, Settings};
use crate::shared::path::absolutize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error, info};

pub const PARTITION_MAP_FILE: &str = "_partition_map";

#[derive(Debug, Clone, Default)]
pub struct JobReport {
    pub timestamp: u64,
    pub directories: usize,
    pub buckets: usize,
    pub partition_map: PathBuf,
    pub counters: MergeCounters,
    pub workers: Vec<WorkerReport>,
}

/// Plans and runs one crush over a manifest of directories.
///
/// Planning (bucketing and partition assignment) happens once, up front.
/// Merging then runs one blocking worker per partition in parallel.
#[derive(Debug)]
pub struct CrushJob {
    config: JobConfig,
    specs: Arc<CrushSpecs>,
}

impl CrushJob {
    pub fn new(config: JobConfig, specs: CrushSpecs) -> Result<Self, JobError> {
        if config.workers == 0 {
            return Err(JobError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        if config.max_buckets_per_dir == 0 {
            return Err(JobError::InvalidConfig(
                "max_buckets_per_dir must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            config,
            specs: Arc::new(specs),
        })
    }

    /// Resolves `[[specs]]` against `registry` and validates `[job]`.
    pub fn from_settings(settings: &Settings, registry: &CodecRegistry) -> Result<Self, JobError> {
        let specs = CrushSpecs::from_config(&settings.specs, registry)?;
        Self::new(settings.job.clone(), specs)
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Buckets every directory of the manifest with one reused bucketer.
    ///
    /// Fails before any bucketing when a directory has no matching crush spec.
    pub fn plan(&self, manifest: &CrushManifest) -> Result<Vec<Bucket>, JobError> {
        let mut bucketer = Bucketer::new(
            self.config.max_buckets_per_dir,
            self.config.bucket_size,
            self.config.exclude_single_file_buckets,
        )?;

        for dir in &manifest.directories {
            self.specs.find(&dir.path)?;
        }

        let mut buckets = Vec::new();
        for dir in &manifest.directories {
            bucketer.reset(&dir.path)?;
            for file in &dir.files {
                bucketer.add(file)?;
            }
            let created = bucketer.create_buckets()?;
            debug!(target: "crush_job::plan", dir = %dir.path, buckets = created.len(), "Bucketed directory");
            buckets.extend(created);
        }

        // Empty buckets carry no work and never reach the partition map.
        buckets.retain(|b| !b.is_empty());
        Ok(buckets)
    }

    pub async fn run(&self) -> Result<JobReport, JobError> {
        let timestamp = self.config.timestamp.unwrap_or_else(now_millis);
        // Provenance lines carry absolute final paths.
        let output_dir = absolutize(&self.config.output_dir);
        let partitions = self.config.workers;

        // Step 1: Load the manifest and bucket each directory
        let manifest = CrushManifest::load(&self.config.manifest)?;
        let buckets = self.plan(&manifest)?;
        info!(
            target: "crush_job::run",
            directories = manifest.directories.len(),
            buckets = buckets.len(),
            timestamp,
            "Planned buckets"
        );

        // Step 2: Assign partitions and persist the map
        std::fs::create_dir_all(&output_dir).map_err(|source| JobError::OutputDir {
            path: output_dir.clone(),
            source,
        })?;
        let map = PartitionAssigner::new(partitions)?.assign(&buckets)?;
        let map_path = output_dir.join(PARTITION_MAP_FILE);
        map.save(&map_path)?;

        // Step 3: One blocking worker per partition
        let buckets = Arc::new(buckets);
        let mut handles = Vec::with_capacity(partitions);
        for partition in 0..partitions as u32 {
            let worker = PartitionWorker {
                partition,
                partitions,
                map_path: map_path.clone(),
                output_dir: output_dir.clone(),
                specs: Arc::clone(&self.specs),
                buckets: Arc::clone(&buckets),
                timestamp,
                report_every: self.config.report_every,
            };
            handles.push((partition, tokio::task::spawn_blocking(move || worker.run())));
        }

        // Step 4: Wait for every worker, keep the first failure
        let mut workers = Vec::with_capacity(partitions);
        let mut failure: Option<JobError> = None;
        for (partition, handle) in handles {
            match handle.await {
                Ok(Ok(report)) => workers.push(report),
                Ok(Err(e)) => {
                    error!(target: "crush_job::run", partition, "Partition failed: {}", e);
                    failure.get_or_insert(e);
                }
                Err(join_err) => {
                    error!(target: "crush_job::run", partition, "Failed to join partition worker: {join_err}");
                    failure.get_or_insert(JobError::Join {
                        partition,
                        reason: join_err.to_string(),
                    });
                }
            }
        }
        if let Some(e) = failure {
            return Err(e);
        }

        let mut counters = MergeCounters::default();
        for report in &workers {
            counters += report.counters;
        }

        info!(
            target: "crush_job::run",
            partitions,
            files = counters.files_merged,
            records = counters.records_merged,
            "Crush complete"
        );

        Ok(JobReport {
            timestamp,
            directories: manifest.directories.len(),
            buckets: buckets.len(),
            partition_map: map_path,
            counters,
            workers,
        })
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
