use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

use super::ParseError;

/// Contents of a charm's `config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub options: BTreeMap<String, ConfigOption>,
}

/// A single configurable setting.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConfigOption {
    #[serde(rename = "type")]
    pub option_type: OptionType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    String,
    Int,
    Float,
    Boolean,
}

impl OptionType {
    /// Whether a YAML value is acceptable for an option of this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            OptionType::String => value.is_string(),
            OptionType::Int => value.is_i64() || value.is_u64(),
            // Integers are valid floats
            OptionType::Float => value.is_number(),
            OptionType::Boolean => value.is_bool(),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OptionType::String => "string",
            OptionType::Int => "int",
            OptionType::Float => "float",
            OptionType::Boolean => "boolean",
        };
        f.write_str(s)
    }
}

impl Config {
    /// Parse `config.yaml` from a byte stream.
    ///
    /// An empty document yields a config with no options.
    pub fn read_from<R: Read>(mut r: R) -> Result<Self, ParseError> {
        let mut data = Vec::new();
        r.read_to_end(&mut data)?;
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Config::default());
        }
        let config: Option<Config> = serde_yaml::from_slice(&data)?;
        let config = config.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ParseError> {
        for (name, opt) in &self.options {
            match &opt.default {
                Some(value) if !value.is_null() && !opt.option_type.accepts(value) => {
                    return Err(ParseError::Invalid(format!(
                        "config: option {:?} has a default that is not a {}",
                        name, opt.option_type
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Default values for every option that declares one.
    pub fn defaults(&self) -> BTreeMap<&str, &Value> {
        self.options
            .iter()
            .filter_map(|(name, opt)| {
                opt.default
                    .as_ref()
                    .filter(|v| !v.is_null())
                    .map(|v| (name.as_str(), v))
            })
            .collect()
    }
}
