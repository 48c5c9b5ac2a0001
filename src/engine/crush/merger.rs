use super::counters::MergeCounters;
use super::crush_spec::{CrushSpec, CrushSpecs};
use super::merge_task::MergeTask;
use super::output_namer::OutputNamer;
use super::provenance::Provenance;
use crate::engine::codec::{RecordReader, RecordType, RecordWriter};
use crate::engine::errors::MergeError;
use crate::shared::path::rebase;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const CRUSH_DIR: &str = "crush";
const DEFAULT_REPORT_EVERY: u64 = 100;

/// Where a worker stages its outputs and where they end up once committed.
/// Both trees mirror the absolute output path under a `crush/` directory.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub work_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(work_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn staging_path(&self, output: &str) -> PathBuf {
        rebase(&self.work_dir.join(CRUSH_DIR), output)
    }

    pub fn final_path(&self, output: &str) -> PathBuf {
        rebase(&self.output_dir.join(CRUSH_DIR), output)
    }
}

/// Result of one successfully merged bucket. The output is still staged until
/// [`MergeOutcome::commit`] moves it.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub bucket: String,
    pub output: String,
    pub staging_path: PathBuf,
    pub final_path: PathBuf,
    pub provenance: Vec<Provenance>,
    pub counters: MergeCounters,
}

impl MergeOutcome {
    /// Moves the staged output to its final path, replacing an existing file.
    pub fn commit(&self) -> Result<(), MergeError> {
        let commit_err = |source| MergeError::Commit {
            from: self.staging_path.clone(),
            to: self.final_path.clone(),
            source,
        };

        if let Some(parent) = self.final_path.parent() {
            fs::create_dir_all(parent).map_err(commit_err)?;
        }
        fs::rename(&self.staging_path, &self.final_path).map_err(commit_err)?;

        debug!(
            target: "bucket_merger::commit",
            bucket = %self.bucket,
            path = %self.final_path.display(),
            "Committed crush output"
        );
        Ok(())
    }
}

/// Open output writer together with the record types the first source fixed.
struct Sink {
    writer: Box<dyn RecordWriter>,
    key_type: RecordType,
    value_type: RecordType,
}

impl Sink {
    fn open(spec: &CrushSpec, staging: &Path, reader: &dyn RecordReader) -> Result<Self, MergeError> {
        if let Some(parent) = staging.parent() {
            fs::create_dir_all(parent).map_err(|e| MergeError::Open {
                path: staging.to_path_buf(),
                source: e.into(),
            })?;
        }

        let key_type = reader.key_type().clone();
        let value_type = reader.value_type().clone();
        let writer = spec
            .output_codec()
            .open_writer(staging, &key_type, &value_type)
            .map_err(|source| MergeError::Open {
                path: staging.to_path_buf(),
                source,
            })?;

        Ok(Self {
            writer,
            key_type,
            value_type,
        })
    }

    fn check_types(&self, reader: &dyn RecordReader, source: &Path) -> Result<(), MergeError> {
        if reader.key_type() != &self.key_type {
            return Err(MergeError::HeterogeneousKeys {
                path: source.to_path_buf(),
                expected: self.key_type.to_string(),
                found: reader.key_type().to_string(),
            });
        }
        if reader.value_type() != &self.value_type {
            return Err(MergeError::HeterogeneousValues {
                path: source.to_path_buf(),
                expected: self.value_type.to_string(),
                found: reader.value_type().to_string(),
            });
        }
        Ok(())
    }
}

/// Crushes buckets one at a time for a single worker.
///
/// Sources are copied strictly in order into one output per bucket. A bucket
/// either produces a complete output or nothing: on any failure the staged
/// file is removed and the first error is returned.
pub struct BucketMerger {
    specs: Arc<CrushSpecs>,
    namer: OutputNamer,
    layout: OutputLayout,
    files_processed: u64,
    report_threshold: u64,
    last_status: Option<String>,
}

impl BucketMerger {
    pub fn new(specs: Arc<CrushSpecs>, namer: OutputNamer, layout: OutputLayout) -> Self {
        Self {
            specs,
            namer,
            layout,
            files_processed: 0,
            report_threshold: DEFAULT_REPORT_EVERY,
            last_status: None,
        }
    }

    /// First status report after `every` files; the threshold doubles after each one.
    pub fn with_report_every(mut self, every: u64) -> Self {
        self.report_threshold = every.max(1);
        self
    }

    pub fn files_processed(&self) -> u64 {
        self.files_processed
    }

    pub fn last_status(&self) -> Option<&str> {
        self.last_status.as_deref()
    }

    pub fn merge(&mut self, task: &MergeTask) -> Result<MergeOutcome, MergeError> {
        let specs = Arc::clone(&self.specs);
        let result = self.merge_with(&specs, task);
        if let Err(e) = &result {
            e.log_error(&task.bucket);
        }
        result
    }

    fn merge_with(
        &mut self,
        specs: &CrushSpecs,
        task: &MergeTask,
    ) -> Result<MergeOutcome, MergeError> {
        let spec = specs.find(&task.directory)?;
        let output = self.namer.calculate_output_file(spec, &task.directory)?;
        let staging_path = self.layout.staging_path(&output);
        let final_path = self.layout.final_path(&output);

        info!(
            target: "bucket_merger::merge",
            bucket = %task.bucket,
            output = %output,
            sources = task.sources.len(),
            "Crushing bucket"
        );

        let mut provenance = Vec::with_capacity(task.sources.len());
        let mut counters = MergeCounters::default();
        let mut sink: Option<Sink> = None;
        let mut failure: Option<MergeError> = None;

        for source in &task.sources {
            match self.copy_source(spec, source, &staging_path, &mut sink) {
                Ok(records) => counters.records_merged += records,
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }

            provenance.push(Provenance::new(source, &final_path));
            counters.files_merged += 1;
            self.record_progress(&task.bucket, source);
        }

        if let Some(sink) = sink {
            if let Err(source) = sink.writer.close() {
                let close_err = MergeError::Close {
                    path: staging_path.clone(),
                    source,
                };
                if failure.is_none() {
                    failure = Some(close_err);
                } else {
                    error!(
                        target: "bucket_merger::merge",
                        bucket = %task.bucket,
                        "Swallowing error on close of {}: {}",
                        output,
                        close_err
                    );
                }
            }
        }

        if let Some(e) = failure {
            discard_partial(&staging_path);
            return Err(e);
        }

        info!(
            target: "bucket_merger::merge",
            bucket = %task.bucket,
            files = counters.files_merged,
            records = counters.records_merged,
            "Bucket crushed"
        );

        Ok(MergeOutcome {
            bucket: task.bucket.clone(),
            output,
            staging_path,
            final_path,
            provenance,
            counters,
        })
    }

    /// Copies every record of `source` into the sink, opening the sink on the
    /// first source. Returns the number of records copied.
    fn copy_source(
        &self,
        spec: &CrushSpec,
        source: &Path,
        staging: &Path,
        sink: &mut Option<Sink>,
    ) -> Result<u64, MergeError> {
        debug!(target: "bucket_merger::merge", path = %source.display(), "Opening source");

        let mut reader = spec
            .input_codec()
            .open_reader(source)
            .map_err(|e| MergeError::Open {
                path: source.to_path_buf(),
                source: e,
            })?;

        let drained = drain(reader.as_mut(), spec, source, staging, sink);

        let closed = reader.close().map_err(|e| MergeError::Close {
            path: source.to_path_buf(),
            source: e,
        });

        match (drained, closed) {
            (Ok(records), Ok(())) => Ok(records),
            (Ok(_), Err(close_err)) => Err(close_err),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                debug!(
                    target: "bucket_merger::merge",
                    path = %source.display(),
                    "Swallowing error on close: {}",
                    close_err
                );
                Err(e)
            }
        }
    }

    fn record_progress(&mut self, bucket: &str, source: &Path) {
        self.files_processed += 1;
        if self.files_processed == self.report_threshold {
            self.report_threshold += self.report_threshold;
            let status = format!(
                "Processed {} files {} : {}",
                self.files_processed,
                bucket,
                source.display()
            );
            info!(target: "bucket_merger::progress", "{}", status);
            self.last_status = Some(status);
        }
    }
}

fn drain(
    reader: &mut dyn RecordReader,
    spec: &CrushSpec,
    source: &Path,
    staging: &Path,
    sink: &mut Option<Sink>,
) -> Result<u64, MergeError> {
    match sink.as_ref() {
        Some(open) => open.check_types(reader, source)?,
        None => *sink = Some(Sink::open(spec, staging, reader)?),
    }

    let mut records = 0u64;
    if let Some(sink) = sink.as_mut() {
        while let Some(record) = reader.next_record().map_err(|e| MergeError::Read {
            path: source.to_path_buf(),
            source: e,
        })? {
            sink.writer.write(&record).map_err(|e| MergeError::Write {
                path: staging.to_path_buf(),
                source: e,
            })?;
            records += 1;
        }
    }
    Ok(records)
}

fn discard_partial(staging: &Path) {
    match fs::remove_file(staging) {
        Ok(()) => {
            debug!(target: "bucket_merger::merge", path = %staging.display(), "Removed partial output");
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            warn!(
                target: "bucket_merger::merge",
                path = %staging.display(),
                error = %e,
                "Could not remove partial output"
            );
        }
    }
}
