//! Charm bundles: zip archives carrying `metadata.yaml` and `config.yaml`.

mod expand;

pub use expand::{ExpandReport, clean_entry_path};

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::charm::{Charm, Config, Meta, ParseError};
use crate::error::{BundleError, Result};
use crate::io::{BytesReader, LocalFileReader, ReadAt};
use crate::zip::ZipArchive;

const METADATA_FILE: &str = "metadata.yaml";
const CONFIG_FILE: &str = "config.yaml";

/// A charm bundle read from a file or an in-memory buffer.
///
/// Construction only succeeds once both documents have been parsed; after
/// that the bundle is read-only.
pub struct Bundle {
    path: Option<PathBuf>,
    meta: Meta,
    config: Config,
    reader: Arc<dyn ReadAt>,
    size: u64,
}

impl Bundle {
    /// Read the bundle stored at `path`.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let (reader, size) = open_file(path)?;
        let mut bundle = Self::from_reader(Arc::new(reader), size)?;
        bundle.path = Some(path.to_path_buf());
        debug!(path = %path.display(), charm = %bundle.meta.name, "read bundle");
        Ok(bundle)
    }

    /// Read a bundle from bytes held in memory.
    ///
    /// The whole archive must fit in memory; nothing is streamed.
    pub fn read_bytes(data: impl Into<Vec<u8>>) -> Result<Self> {
        let reader = BytesReader::new(data);
        let size = reader.size();
        Self::from_reader(Arc::new(reader), size)
    }

    /// Read a bundle from the first `size` bytes of an arbitrary source.
    pub fn from_reader(reader: Arc<dyn ReadAt>, size: u64) -> Result<Self> {
        let archive = ZipArchive::with_size(Arc::clone(&reader), size)?;
        debug!(entries = archive.len(), size, "parsed bundle archive");

        let meta = read_document(&archive, METADATA_FILE, Meta::read_from)?;
        let config = read_document(&archive, CONFIG_FILE, Config::read_from)?;

        Ok(Self {
            path: None,
            meta,
            config,
            reader,
            size,
        })
    }

    /// The file the bundle was read from, if it came from one.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Size in bytes of the archive as it was read.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Re-open the archive for a fresh pass over its entries.
    ///
    /// A bundle with a path goes back to the file (which may have been
    /// replaced since it was read); otherwise the retained source is used
    /// with the size recorded at construction.
    pub fn archive(&self) -> Result<ZipArchive<dyn ReadAt>> {
        match &self.path {
            Some(path) => {
                let (reader, size) = open_file(path)?;
                let reader: Arc<dyn ReadAt> = Arc::new(reader);
                Ok(ZipArchive::with_size(reader, size)?)
            }
            None => Ok(ZipArchive::with_size(Arc::clone(&self.reader), self.size)?),
        }
    }
}

impl Charm for Bundle {
    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn config(&self) -> &Config {
        &self.config
    }
}

impl std::fmt::Debug for Bundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bundle")
            .field("path", &self.path)
            .field("meta", &self.meta)
            .field("config", &self.config)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

fn open_file(path: &Path) -> Result<(LocalFileReader, u64)> {
    let file = File::open(path).map_err(|e| BundleError::source_open(path, e))?;
    let reader = LocalFileReader::from_file(file).map_err(|e| BundleError::source_open(path, e))?;
    let size = reader.size();
    Ok((reader, size))
}

/// Locate `name` in the archive and hand its contents to `parse`.
///
/// The entry stream is owned by this call and dropped before returning,
/// whatever the outcome.
fn read_document<T>(
    archive: &ZipArchive<dyn ReadAt>,
    name: &str,
    parse: impl FnOnce(crate::zip::ZipEntryReader<dyn ReadAt>) -> std::result::Result<T, ParseError>,
) -> Result<T> {
    let entry = archive
        .by_name(name)
        .ok_or_else(|| BundleError::MissingEntry(name.to_string()))?;
    let stream = archive.open(entry)?;
    parse(stream).map_err(|source| BundleError::Parse {
        entry: name.to_string(),
        source,
    })
}
