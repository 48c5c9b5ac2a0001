use crate::shared::storage_header::{BinaryHeader, FileKind};
use std::io::Cursor;

#[test]
fn header_roundtrip_ok() {
    let hdr = BinaryHeader::for_kind(FileKind::PartitionMap, 0);
    let mut buf = Vec::new();
    hdr.write_to(&mut buf).unwrap();
    assert_eq!(buf.len(), BinaryHeader::TOTAL_LEN);

    let read = BinaryHeader::read_from(Cursor::new(buf)).unwrap();
    assert_eq!(read.magic, FileKind::PartitionMap.magic());
    assert_eq!(read.version, 1);
    assert_eq!(read.flags, 0);
    assert_eq!(read.header_crc32, hdr.header_crc32);
}

#[test]
fn flags_survive_roundtrip() {
    let hdr = BinaryHeader::for_kind(FileKind::SequenceRecords, 2);
    let mut buf = Vec::new();
    hdr.write_to(&mut buf).unwrap();

    let read = BinaryHeader::read_expected(Cursor::new(buf), FileKind::SequenceRecords).unwrap();
    assert_eq!(read.flags, 2);
}

#[test]
fn corrupted_magic_rejected_via_crc_mismatch() {
    let hdr = BinaryHeader::for_kind(FileKind::PartitionMap, 0);
    let mut buf = Vec::new();
    hdr.write_to(&mut buf).unwrap();
    buf[0] ^= 0xFF;

    let err = BinaryHeader::read_from(Cursor::new(buf)).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}

#[test]
fn wrong_kind_is_rejected() {
    let hdr = BinaryHeader::for_kind(FileKind::SequenceRecords, 0);
    let mut buf = Vec::new();
    hdr.write_to(&mut buf).unwrap();

    let err = BinaryHeader::read_expected(Cursor::new(buf), FileKind::PartitionMap).unwrap_err();
    assert!(err.to_string().contains("partition map"));
}

#[test]
fn unsupported_version_is_rejected() {
    let hdr = BinaryHeader::new(FileKind::PartitionMap.magic(), 7, 0);
    let mut buf = Vec::new();
    hdr.write_to(&mut buf).unwrap();

    let err = BinaryHeader::read_expected(Cursor::new(buf), FileKind::PartitionMap).unwrap_err();
    assert!(err.to_string().contains("version 7"));
}

#[test]
fn truncated_header_fails() {
    let buf = vec![0u8; BinaryHeader::TOTAL_LEN - 3];
    assert!(BinaryHeader::read_from(Cursor::new(buf)).is_err());
}
