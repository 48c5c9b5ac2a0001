use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub job: JobConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub specs: Vec<CrushSpecConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Planner output: directories with their eligible files and sizes (JSON)
    pub manifest: PathBuf,
    pub output_dir: PathBuf,
    /// Number of partition workers
    pub workers: usize,
    /// Target size of one crushed file in bytes
    pub bucket_size: u64,
    /// Upper bound on buckets created for a single directory
    pub max_buckets_per_dir: usize,
    #[serde(default = "default_exclude_single_file_buckets")]
    pub exclude_single_file_buckets: bool,
    /// Run timestamp (ms); defaults to the start time of the run
    pub timestamp: Option<u64>,
    /// First progress report after this many files; the threshold doubles after each report
    #[serde(default = "default_report_every")]
    pub report_every: u64,
}

fn default_exclude_single_file_buckets() -> bool {
    true
}

fn default_report_every() -> u64 {
    100
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub stdout_level: String,
    pub file_level: String,
}

/// One `[[specs]]` table. Fields stay optional so that a missing one can be
/// reported by its key instead of as a generic deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrushSpecConfig {
    pub regex: Option<String>,
    pub replacement: Option<String>,
    pub input_codec: Option<String>,
    pub output_codec: Option<String>,
}

impl CrushSpecConfig {
    pub fn new(regex: &str, replacement: &str, input_codec: &str, output_codec: &str) -> Self {
        Self {
            regex: Some(regex.to_string()),
            replacement: Some(replacement.to_string()),
            input_codec: Some(input_codec.to_string()),
            output_codec: Some(output_codec.to_string()),
        }
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()
    }
}

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var("FILECRUSH_CONFIG").unwrap_or_else(|_| "config/crush".to_string());

    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(&config_path))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
