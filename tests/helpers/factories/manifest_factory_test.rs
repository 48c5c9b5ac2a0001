use crate::engine::job::CrushManifest;
use crate::test_helpers::factory::Factory;
use tempfile::tempdir;

#[cfg(test)]
#[test]
fn test_manifest_factory() {
    let root = tempdir().unwrap();
    let manifest_path = root.path().join("manifest.json");

    let manifest = Factory::manifest(root.path())
        .with_dir("in/logs", &[("a", 2), ("b", 1)])
        .with_missing_file("in/logs", "ghost", 10)
        .write_to(&manifest_path);

    assert_eq!(manifest.directories.len(), 1);
    assert_eq!(manifest.file_count(), 3);
    assert!(manifest.directories[0].files[0].size > 0);

    let loaded = CrushManifest::load(&manifest_path).unwrap();
    assert_eq!(loaded, manifest);
}
