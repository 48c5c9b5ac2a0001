use crate::shared::config::Settings;
use indoc::indoc;
use std::path::PathBuf;
use tempfile::tempdir;

const FULL: &str = indoc! {r#"
    [job]
    manifest = "plan/manifest.json"
    output_dir = "/data/out"
    workers = 4
    bucket_size = 134217728
    max_buckets_per_dir = 16
    exclude_single_file_buckets = false
    timestamp = 98765
    report_every = 10

    [logging]
    log_dir = "logs"
    stdout_level = "info"
    file_level = "debug"

    [[specs]]
    regex = ".+/dir"
    replacement = "firstregex-${crush.timestamp}-${crush.task.num}-${crush.file.num}"
    input_codec = "sequence"
    output_codec = "text"

    [[specs]]
    regex = ".+"
    replacement = "crushed-${crush.file.num}"
    input_codec = "text"
    output_codec = "text"
"#};

const MINIMAL: &str = indoc! {r#"
    [job]
    manifest = "manifest.json"
    output_dir = "out"
    workers = 2
    bucket_size = 50
    max_buckets_per_dir = 5

    [logging]
    log_dir = "logs"
    stdout_level = "warn"
    file_level = "info"
"#};

fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("crush.toml");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn loads_every_section() {
    let (_dir, path) = write_config(FULL);
    let settings = Settings::from_file(&path).unwrap();

    assert_eq!(settings.job.manifest, PathBuf::from("plan/manifest.json"));
    assert_eq!(settings.job.workers, 4);
    assert_eq!(settings.job.bucket_size, 134_217_728);
    assert_eq!(settings.job.max_buckets_per_dir, 16);
    assert!(!settings.job.exclude_single_file_buckets);
    assert_eq!(settings.job.timestamp, Some(98765));
    assert_eq!(settings.job.report_every, 10);
    assert_eq!(settings.logging.file_level, "debug");

    assert_eq!(settings.specs.len(), 2);
    assert_eq!(settings.specs[0].regex.as_deref(), Some(".+/dir"));
    assert_eq!(settings.specs[0].input_codec.as_deref(), Some("sequence"));
    assert_eq!(settings.specs[1].replacement.as_deref(), Some("crushed-${crush.file.num}"));
}

#[test]
fn applies_defaults() {
    let (_dir, path) = write_config(MINIMAL);
    let settings = Settings::from_file(&path).unwrap();

    assert!(settings.job.exclude_single_file_buckets);
    assert_eq!(settings.job.report_every, 100);
    assert_eq!(settings.job.timestamp, None);
    assert!(settings.specs.is_empty());
}

#[test]
fn missing_spec_fields_deserialize_as_none() {
    let contents = format!(
        "{}\n[[specs]]\nregex = \"foo\"\ninput_codec = \"text\"\n",
        MINIMAL
    );
    let (_dir, path) = write_config(&contents);
    let settings = Settings::from_file(&path).unwrap();

    assert_eq!(settings.specs.len(), 1);
    assert!(settings.specs[0].replacement.is_none());
    assert!(settings.specs[0].output_codec.is_none());
}

#[test]
fn missing_job_section_fails() {
    let (_dir, path) = write_config("[logging]\nlog_dir = \"l\"\nstdout_level = \"info\"\nfile_level = \"info\"\n");
    assert!(Settings::from_file(&path).is_err());
}
