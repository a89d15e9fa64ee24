use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use super::Bundle;
use crate::error::{BundleError, Result};
use crate::io::ReadAt;
use crate::zip::{ZipArchive, ZipFileEntry};

/// Outcome of an expansion that kept every per-entry failure.
#[derive(Debug, Default)]
pub struct ExpandReport {
    /// Directory markers created
    pub directories: usize,
    /// Files written
    pub files: usize,
    /// Entry failures in archive order
    pub failures: Vec<BundleError>,
}

impl ExpandReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// The failure `expand_to` would report.
    pub fn last_failure(&self) -> Option<&BundleError> {
        self.failures.last()
    }
}

enum Extracted {
    Directory,
    File,
}

impl Bundle {
    /// Expand the bundle into `dir`, creating directories as needed.
    ///
    /// Extraction carries on past entries that fail; only the last failure
    /// is returned. Failing to re-open or re-parse the archive is returned
    /// before anything is written.
    pub fn expand_to<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let archive = self.archive()?;
        let last = expand_entries(&archive, dir.as_ref()).fold(None, |last, outcome| match outcome {
            Ok(_) => last,
            Err(err) => Some(err),
        });
        match last {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Like [`expand_to`](Self::expand_to), but returns every failure
    /// instead of only the last.
    pub fn expand_to_with_report<P: AsRef<Path>>(&self, dir: P) -> Result<ExpandReport> {
        let archive = self.archive()?;
        let report = expand_entries(&archive, dir.as_ref()).fold(
            ExpandReport::default(),
            |mut report, outcome| {
                match outcome {
                    Ok(Extracted::Directory) => report.directories += 1,
                    Ok(Extracted::File) => report.files += 1,
                    Err(err) => report.failures.push(err),
                }
                report
            },
        );
        Ok(report)
    }
}

/// Lazily extract each entry in archive order, one outcome per entry.
fn expand_entries<'a>(
    archive: &'a ZipArchive<dyn ReadAt>,
    dir: &'a Path,
) -> impl Iterator<Item = Result<Extracted>> + 'a {
    archive.entries().iter().map(move |entry| {
        let outcome = extract_entry(archive, entry, dir);
        if let Err(err) = &outcome {
            warn!(entry = %entry.file_name, error = %err, "failed to expand entry");
        }
        outcome
    })
}

fn extract_entry(
    archive: &ZipArchive<dyn ReadAt>,
    entry: &ZipFileEntry,
    dir: &Path,
) -> Result<Extracted> {
    let name = entry.file_name.as_str();
    let fail = |e: io::Error| BundleError::extract(name, e);

    let mut stream = archive.open(entry).map_err(|e| fail(e.into()))?;
    let dest = dir.join(clean_entry_path(name));

    if name.ends_with('/') {
        create_dirs(&dest).map_err(fail)?;
        debug!(entry = name, path = %dest.display(), "created directory");
        return Ok(Extracted::Directory);
    }

    if let Some(parent) = dest.parent() {
        create_dirs(parent).map_err(fail)?;
    }
    let mut file = File::create(&dest).map_err(fail)?;
    let written = io::copy(&mut stream, &mut file).map_err(fail)?;
    debug!(entry = name, path = %dest.display(), bytes = written, "wrote file");
    Ok(Extracted::File)
}

#[cfg(unix)]
fn create_dirs(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o755).create(path)
}

#[cfg(not(unix))]
fn create_dirs(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Lexically clean an archive entry name into a relative path.
///
/// The name is treated as rooted: `.` and empty segments vanish, `..`
/// removes the previous segment or is dropped at the top, so the result
/// can always be joined onto a target directory without leaving it.
/// Segments the host platform would read as anything other than a plain
/// file name (drive prefixes, embedded separators) are dropped as well.
pub fn clean_entry_path(name: &str) -> PathBuf {
    let mut parts: Vec<&str> = Vec::new();
    for segment in name.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s if is_plain_name(s) => parts.push(s),
            _ => {}
        }
    }
    parts.into_iter().collect()
}

fn is_plain_name(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
