use crc32fast::Hasher as Crc32Hasher;
use std::io::{Read, Write};

/// Fixed-size header at the start of every binary file the engine writes.
///
/// Layout (little endian): `magic[8] | version u16 | flags u16 | reserved u32 | crc32 u32`.
/// The CRC covers every field before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryHeader {
    pub magic: [u8; 8],
    pub version: u16,
    pub flags: u16,
    pub reserved: u32,
    pub header_crc32: u32,
}

impl BinaryHeader {
    pub const LEN_WITHOUT_CRC: usize = 8 + 2 + 2 + 4;
    pub const TOTAL_LEN: usize = Self::LEN_WITHOUT_CRC + 4;

    pub fn new(magic: [u8; 8], version: u16, flags: u16) -> Self {
        let mut header = Self {
            magic,
            version,
            flags,
            reserved: 0,
            header_crc32: 0,
        };
        header.header_crc32 = header.compute_crc32();
        header
    }

    pub fn for_kind(kind: FileKind, flags: u16) -> Self {
        Self::new(kind.magic(), kind.version(), flags)
    }

    fn compute_crc32(&self) -> u32 {
        let mut hasher = Crc32Hasher::new();
        hasher.update(&self.magic);
        hasher.update(&self.version.to_le_bytes());
        hasher.update(&self.flags.to_le_bytes());
        hasher.update(&self.reserved.to_le_bytes());
        hasher.finalize()
    }

    pub fn write_to<W: Write>(&self, mut w: W) -> std::io::Result<()> {
        let mut buf = [0u8; Self::TOTAL_LEN];
        buf[0..8].copy_from_slice(&self.magic);
        buf[8..10].copy_from_slice(&self.version.to_le_bytes());
        buf[10..12].copy_from_slice(&self.flags.to_le_bytes());
        buf[12..16].copy_from_slice(&self.reserved.to_le_bytes());
        buf[16..20].copy_from_slice(&self.header_crc32.to_le_bytes());
        w.write_all(&buf)
    }

    pub fn read_from<R: Read>(mut r: R) -> std::io::Result<Self> {
        let mut buf = [0u8; Self::TOTAL_LEN];
        r.read_exact(&mut buf)?;

        let mut magic = [0u8; 8];
        magic.copy_from_slice(&buf[0..8]);
        let hdr = Self {
            magic,
            version: u16::from_le_bytes([buf[8], buf[9]]),
            flags: u16::from_le_bytes([buf[10], buf[11]]),
            reserved: u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]),
            header_crc32: u32::from_le_bytes([buf[16], buf[17], buf[18], buf[19]]),
        };

        if hdr.compute_crc32() != hdr.header_crc32 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "header CRC mismatch",
            ));
        }
        Ok(hdr)
    }

    /// Reads a header and checks that it belongs to `kind` at a supported version.
    pub fn read_expected<R: Read>(r: R, kind: FileKind) -> std::io::Result<Self> {
        let header = Self::read_from(r)?;
        if header.magic != kind.magic() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid magic for {}", kind.label()),
            ));
        }
        if header.version != kind.version() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "unsupported {} version {} (expected {})",
                    kind.label(),
                    header.version,
                    kind.version()
                ),
            ));
        }
        Ok(header)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    PartitionMap,
    SequenceRecords,
}

impl FileKind {
    pub const fn magic(&self) -> [u8; 8] {
        match self {
            FileKind::PartitionMap => *b"CRSHPMP\0",
            FileKind::SequenceRecords => *b"CRSHSEQ\0",
        }
    }

    pub const fn version(&self) -> u16 {
        1
    }

    pub const fn label(&self) -> &'static str {
        match self {
            FileKind::PartitionMap => "partition map",
            FileKind::SequenceRecords => "sequence file",
        }
    }
}
