use crate::test_helpers::factory::Factory;
use serde_json::Value;
use tempfile::tempdir;

#[cfg(test)]
#[test]
fn test_job_config_factory() {
    let root = tempdir().unwrap();
    let config = Factory::job_config(root.path())
        .with("workers", 3)
        .with("exclude_single_file_buckets", false)
        .with("timestamp", Value::Null)
        .create();

    assert_eq!(config.workers, 3);
    assert!(!config.exclude_single_file_buckets);
    assert_eq!(config.timestamp, None);
    assert_eq!(config.output_dir, root.path().join("out"));
    assert_eq!(config.report_every, 100);
}
