use crate::engine::codec::{Codec, SequenceCodec};
use crate::test_helpers::factory::Factory;
use tempfile::tempdir;

#[cfg(test)]
#[test]
fn test_source_file_factory() {
    let dir = tempdir().unwrap();
    let path = Factory::source_file()
        .in_dir(dir.path())
        .named("fileA")
        .with_records(&[("a", "1"), ("b", "2")])
        .create();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\t1\nb\t2\n");

    let seq = Factory::source_file()
        .in_dir(dir.path())
        .named("seq")
        .codec("sequence-lz4")
        .types("bytes", "long")
        .with_numbered_records("r", 3)
        .create();

    let mut reader = SequenceCodec::plain().open_reader(&seq).unwrap();
    assert_eq!(reader.key_type().as_str(), "bytes");
    let mut count = 0;
    while reader.next_record().unwrap().is_some() {
        count += 1;
    }
    assert_eq!(count, 3);
}
