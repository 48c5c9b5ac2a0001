use crate::shared::config::JobConfig;
use serde_json::Value;
use std::path::Path;

pub struct JobConfigFactory {
    config: JobConfig,
}

impl JobConfigFactory {
    /// Manifest at `<root>/manifest.json`, outputs under `<root>/out`.
    pub fn new(root: &Path) -> Self {
        Self {
            config: JobConfig {
                manifest: root.join("manifest.json"),
                output_dir: root.join("out"),
                workers: 2,
                bucket_size: 1024 * 1024,
                max_buckets_per_dir: 4,
                exclude_single_file_buckets: true,
                timestamp: Some(98765),
                report_every: 100,
            },
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        match key {
            "workers" => self.config.workers = value.as_u64().unwrap() as usize,
            "bucket_size" => self.config.bucket_size = value.as_u64().unwrap(),
            "max_buckets_per_dir" => {
                self.config.max_buckets_per_dir = value.as_u64().unwrap() as usize
            }
            "exclude_single_file_buckets" => {
                self.config.exclude_single_file_buckets = value.as_bool().unwrap()
            }
            "timestamp" => self.config.timestamp = value.as_u64(),
            "report_every" => self.config.report_every = value.as_u64().unwrap(),
            "manifest" => self.config.manifest = value.as_str().unwrap().into(),
            other => panic!("unknown job config field: {}", other),
        }
        self
    }

    pub fn create(self) -> JobConfig {
        self.config
    }
}
