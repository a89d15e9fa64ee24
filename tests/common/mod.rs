//! Shared helpers for integration tests: an in-memory zip builder and a
//! stock charm bundle.

#![allow(dead_code)]

use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::io::Write;

pub const METADATA: &str = "\
name: dummy
summary: That's a dummy charm.
description: |
    This is a longer description which
    potentially contains multiple lines.
provides:
    website: http
requires:
    db:
        interface: mysql
        optional: true
";

pub const CONFIG: &str = "\
options:
    title:
        default: My Title
        description: A descriptive title used for the service.
        type: string
    skill-level:
        description: A number indicating skill.
        type: int
";

/// 1980-01-01, the earliest DOS date.
const DOS_DATE: u16 = (1 << 5) | 1;

/// Builds zip archives byte by byte so tests control every header.
#[derive(Default)]
pub struct ZipBuilder {
    data: Vec<u8>,
    central: Vec<u8>,
    count: u16,
    offsets: Vec<(String, usize)>,
    comment: Vec<u8>,
    zip64: bool,
    disk_number: u16,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Central directory sizes and offsets go in 0x0001 extra fields and
    /// the archive ends with a ZIP64 end record and locator.
    pub fn zip64() -> Self {
        Self {
            zip64: true,
            ..Self::default()
        }
    }

    /// Claim the archive is one part of a multi-disk set.
    pub fn disk_number(mut self, disk: u16) -> Self {
        self.disk_number = disk;
        self
    }

    pub fn stored(self, name: &str, contents: &[u8]) -> Self {
        self.entry(name, 0, 0, contents.to_vec(), contents)
    }

    /// Store `contents` as-is but label them with an arbitrary method.
    pub fn with_method(self, name: &str, method: u16, contents: &[u8]) -> Self {
        self.entry(name, method, 0, contents.to_vec(), contents)
    }

    /// A stored entry with the general purpose "encrypted" bit set.
    pub fn encrypted(self, name: &str, contents: &[u8]) -> Self {
        self.entry(name, 0, 0x0001, contents.to_vec(), contents)
    }

    pub fn deflated(self, name: &str, contents: &[u8]) -> Self {
        let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
        enc.write_all(contents).unwrap();
        let compressed = enc.finish().unwrap();
        self.entry(name, 8, 0, compressed, contents)
    }

    pub fn dir(self, name: &str) -> Self {
        assert!(name.ends_with('/'));
        self.stored(name, b"")
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = comment.as_bytes().to_vec();
        self
    }

    fn entry(mut self, name: &str, method: u16, flags: u16, raw: Vec<u8>, contents: &[u8]) -> Self {
        let offset = self.data.len();
        let crc = crc32fast::hash(contents);
        let name_bytes = name.as_bytes();

        let d = &mut self.data;
        d.extend_from_slice(b"PK\x03\x04");
        d.extend_from_slice(&20u16.to_le_bytes()); // version needed
        d.extend_from_slice(&flags.to_le_bytes());
        d.extend_from_slice(&method.to_le_bytes());
        d.extend_from_slice(&0u16.to_le_bytes()); // time
        d.extend_from_slice(&DOS_DATE.to_le_bytes());
        d.extend_from_slice(&crc.to_le_bytes());
        d.extend_from_slice(&(raw.len() as u32).to_le_bytes());
        d.extend_from_slice(&(contents.len() as u32).to_le_bytes());
        d.extend_from_slice(&(name_bytes.len() as u16).to_le_bytes());
        d.extend_from_slice(&0u16.to_le_bytes()); // extra length
        d.extend_from_slice(name_bytes);
        d.extend_from_slice(&raw);

        let (compressed_size, uncompressed_size, header_offset, extra) = if self.zip64 {
            let mut extra = Vec::with_capacity(28);
            extra.extend_from_slice(&0x0001u16.to_le_bytes());
            extra.extend_from_slice(&24u16.to_le_bytes());
            extra.extend_from_slice(&(contents.len() as u64).to_le_bytes());
            extra.extend_from_slice(&(raw.len() as u64).to_le_bytes());
            extra.extend_from_slice(&(offset as u64).to_le_bytes());
            (u32::MAX, u32::MAX, u32::MAX, extra)
        } else {
            (raw.len() as u32, contents.len() as u32, offset as u32, Vec::new())
        };

        let c = &mut self.central;
        c.extend_from_slice(b"PK\x01\x02");
        c.extend_from_slice(&20u16.to_le_bytes()); // version made by
        c.extend_from_slice(&20u16.to_le_bytes()); // version needed
        c.extend_from_slice(&flags.to_le_bytes());
        c.extend_from_slice(&method.to_le_bytes());
        c.extend_from_slice(&0u16.to_le_bytes()); // time
        c.extend_from_slice(&DOS_DATE.to_le_bytes());
        c.extend_from_slice(&crc.to_le_bytes());
        c.extend_from_slice(&compressed_size.to_le_bytes());
        c.extend_from_slice(&uncompressed_size.to_le_bytes());
        c.extend_from_slice(&(name_bytes.len() as u16).to_le_bytes());
        c.extend_from_slice(&(extra.len() as u16).to_le_bytes());
        c.extend_from_slice(&0u16.to_le_bytes()); // comment length
        c.extend_from_slice(&0u16.to_le_bytes()); // disk number
        c.extend_from_slice(&0u16.to_le_bytes()); // internal attrs
        c.extend_from_slice(&0u32.to_le_bytes()); // external attrs
        c.extend_from_slice(&header_offset.to_le_bytes());
        c.extend_from_slice(name_bytes);
        c.extend_from_slice(&extra);

        self.count += 1;
        self.offsets.push((name.to_string(), offset));
        self
    }

    /// Finish the archive, also returning each entry's local header offset.
    pub fn finish_with_offsets(self) -> (Vec<u8>, Vec<(String, usize)>) {
        let mut out = self.data;
        let cd_offset = out.len() as u64;
        let cd_size = self.central.len() as u64;
        out.extend_from_slice(&self.central);

        let (count, cd_size32, cd_offset32) = if self.zip64 {
            let eocd64_offset = out.len() as u64;
            out.extend_from_slice(b"PK\x06\x06");
            out.extend_from_slice(&44u64.to_le_bytes()); // remaining record size
            out.extend_from_slice(&45u16.to_le_bytes()); // version made by
            out.extend_from_slice(&45u16.to_le_bytes()); // version needed
            out.extend_from_slice(&0u32.to_le_bytes()); // disk number
            out.extend_from_slice(&0u32.to_le_bytes()); // disk with directory
            out.extend_from_slice(&(self.count as u64).to_le_bytes());
            out.extend_from_slice(&(self.count as u64).to_le_bytes());
            out.extend_from_slice(&cd_size.to_le_bytes());
            out.extend_from_slice(&cd_offset.to_le_bytes());

            out.extend_from_slice(b"PK\x06\x07");
            out.extend_from_slice(&0u32.to_le_bytes()); // disk with zip64 record
            out.extend_from_slice(&eocd64_offset.to_le_bytes());
            out.extend_from_slice(&1u32.to_le_bytes()); // total disks

            (u16::MAX, u32::MAX, u32::MAX)
        } else {
            (self.count, cd_size as u32, cd_offset as u32)
        };

        out.extend_from_slice(b"PK\x05\x06");
        out.extend_from_slice(&self.disk_number.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&cd_size32.to_le_bytes());
        out.extend_from_slice(&cd_offset32.to_le_bytes());
        out.extend_from_slice(&(self.comment.len() as u16).to_le_bytes());
        out.extend_from_slice(&self.comment);

        (out, self.offsets)
    }

    pub fn finish(self) -> Vec<u8> {
        self.finish_with_offsets().0
    }
}

/// A builder preloaded with valid `metadata.yaml` and `config.yaml`.
pub fn charm() -> ZipBuilder {
    with_documents(ZipBuilder::new())
}

/// Add valid `metadata.yaml` and `config.yaml` to an existing builder.
pub fn with_documents(builder: ZipBuilder) -> ZipBuilder {
    builder
        .deflated("metadata.yaml", METADATA.as_bytes())
        .stored("config.yaml", CONFIG.as_bytes())
}

/// Overwrite the local header signature of `name` so it can no longer be
/// opened, leaving the central directory intact.
pub fn break_local_header(zip: &mut [u8], offsets: &[(String, usize)], name: &str) {
    let (_, offset) = offsets
        .iter()
        .find(|(n, _)| n == name)
        .unwrap_or_else(|| panic!("no entry {}", name));
    zip[*offset..*offset + 4].copy_from_slice(b"XXXX");
}
