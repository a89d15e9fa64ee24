//! Charm documents: `metadata.yaml` and `config.yaml`.
//!
//! Each document type exposes a `read_from` constructor that consumes a
//! byte stream and returns the parsed value or a [`ParseError`].

mod config;
mod meta;

pub use config::{Config, ConfigOption, OptionType};
pub use meta::{Meta, Relation, RelationScope};

use std::io;
use thiserror::Error;

/// Errors produced while parsing charm documents.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("read error: {0}")]
    Io(#[from] io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Invalid(String),
}

/// Anything that carries charm metadata and configuration.
pub trait Charm {
    fn meta(&self) -> &Meta;
    fn config(&self) -> &Config;
}
