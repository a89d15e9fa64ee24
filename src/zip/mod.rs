//! ZIP archive parsing.
//!
//! This module provides read access to ZIP archives over any [`ReadAt`]
//! source, supporting both standard ZIP format and ZIP64 extensions.
//!
//! [`ReadAt`]: crate::io::ReadAt
//!
//! ## Architecture
//!
//! - [`structures`]: Data structures representing ZIP format elements (EOCD, file headers, etc.)
//! - [`parser`]: Low-level parsing of ZIP structures from raw bytes
//! - [`entry`]: Streaming, checksum-verifying readers for entry contents
//! - [`archive`]: The parsed archive handed to callers
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! This implementation reads the EOCD first (from the end of the file),
//! then the Central Directory, which allows listing files without reading
//! the entire archive.
//!
//! ## Supported Features
//!
//! - Standard ZIP format (PKZIP APPNOTE 6.3.x compatible)
//! - ZIP64 extensions for files > 4GB
//! - STORED (no compression) method
//! - DEFLATE compression method
//!
//! ## Limitations
//!
//! - No encryption support
//! - No multi-disk archive support
//! - No BZIP2, LZMA, or other compression methods
//! - Read only

pub mod archive;
pub mod entry;
pub mod parser;
pub mod structures;

pub use archive::ZipArchive;
pub use entry::{SectionReader, ZipEntryReader};
pub use parser::ZipParser;
pub use structures::*;
