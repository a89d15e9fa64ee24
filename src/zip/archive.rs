use std::sync::Arc;

use crate::error::ZipError;
use crate::io::ReadAt;

use super::entry::{SectionReader, ZipEntryReader};
use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

type Result<T> = std::result::Result<T, ZipError>;

/// A parsed ZIP archive: the central directory plus the source it came from.
pub struct ZipArchive<R: ReadAt + ?Sized> {
    parser: ZipParser<R>,
    entries: Vec<ZipFileEntry>,
}

impl<R: ReadAt + ?Sized> ZipArchive<R> {
    /// Parse the first `size` bytes of `reader` as an archive.
    pub fn with_size(reader: Arc<R>, size: u64) -> Result<Self> {
        Self::from_parser(ZipParser::with_size(reader, size))
    }

    fn from_parser(parser: ZipParser<R>) -> Result<Self> {
        let entries = parser.list_files()?;
        Ok(Self { parser, entries })
    }

    /// All entries in central directory order
    pub fn entries(&self) -> &[ZipFileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find an entry by its exact, case-sensitive name.
    pub fn by_name(&self, name: &str) -> Option<&ZipFileEntry> {
        self.entries.iter().find(|e| e.file_name == name)
    }

    /// Open a streaming reader over an entry's uncompressed contents.
    ///
    /// The local header is read and validated here, so a damaged entry
    /// fails at open time rather than on the first read.
    pub fn open(&self, entry: &ZipFileEntry) -> Result<ZipEntryReader<R>> {
        if entry.is_encrypted() {
            return Err(ZipError::format(format!(
                "{}: encrypted entries are not supported",
                entry.file_name
            )));
        }

        let data_offset = self.parser.get_data_offset(entry)?;
        let data = SectionReader::new(
            Arc::clone(self.parser.reader()),
            data_offset,
            entry.compressed_size,
        );

        match entry.compression_method {
            CompressionMethod::Stored => {
                if entry.compressed_size != entry.uncompressed_size {
                    return Err(ZipError::format(format!(
                        "{}: stored entry sizes disagree",
                        entry.file_name
                    )));
                }
                Ok(ZipEntryReader::stored(entry, data))
            }
            CompressionMethod::Deflate => Ok(ZipEntryReader::deflate(entry, data)),
            CompressionMethod::Unknown(method) => Err(ZipError::UnsupportedCompression(method)),
        }
    }
}
