//! # charm-bundle
//!
//! Read charm bundles: zip archives that carry a `metadata.yaml` and a
//! `config.yaml` at their root, plus whatever hooks and files the charm ships.
//!
//! A [`Bundle`] can be opened from a file or from bytes already in memory.
//! Both go through the same random-access [`ReadAt`] contract, so the zip
//! central directory is read from the end of the archive and entries are
//! streamed on demand.
//!
//! ## Features
//!
//! - Open bundles from a path or an in-memory buffer
//! - Parsed, typed access to charm metadata and configuration
//! - Expand a bundle onto disk, confined to the target directory
//! - Support for ZIP64 format (archives larger than 4GB)
//! - Support for STORED (uncompressed) and DEFLATE compression methods
//!
//! ## Example
//!
//! ```no_run
//! use charm_bundle::Bundle;
//!
//! fn main() -> charm_bundle::Result<()> {
//!     let bundle = Bundle::read("mysql.charm")?;
//!     println!("{}: {}", bundle.meta().name, bundle.meta().summary);
//!
//!     bundle.expand_to("/var/lib/charms/mysql")?;
//!     Ok(())
//! }
//! ```

pub mod bundle;
pub mod charm;
pub mod cli;
pub mod error;
pub mod io;
pub mod zip;

pub use bundle::{Bundle, ExpandReport};
pub use charm::{Charm, Config, ConfigOption, Meta, OptionType, ParseError, Relation};
pub use cli::Cli;
pub use error::{BundleError, ErrorKind, Result};
pub use io::{BytesReader, LocalFileReader, ReadAt};
pub use zip::{ZipArchive, ZipFileEntry};
