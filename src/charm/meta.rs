use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;

use super::ParseError;

/// Contents of a charm's `metadata.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Meta {
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subordinate: bool,
    #[serde(default)]
    pub provides: BTreeMap<String, Relation>,
    #[serde(default)]
    pub requires: BTreeMap<String, Relation>,
    #[serde(default)]
    pub peers: BTreeMap<String, Relation>,
}

/// A relation endpoint declared by a charm.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawRelation")]
pub struct Relation {
    pub interface: String,
    pub optional: bool,
    pub limit: Option<u32>,
    pub scope: RelationScope,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationScope {
    #[default]
    Global,
    Container,
}

/// Relations can be written as just the interface name.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRelation {
    Interface(String),
    Full {
        interface: String,
        #[serde(default)]
        optional: bool,
        #[serde(default)]
        limit: Option<u32>,
        #[serde(default)]
        scope: RelationScope,
    },
}

impl From<RawRelation> for Relation {
    fn from(raw: RawRelation) -> Self {
        match raw {
            RawRelation::Interface(interface) => Relation {
                interface,
                optional: false,
                limit: None,
                scope: RelationScope::Global,
            },
            RawRelation::Full {
                interface,
                optional,
                limit,
                scope,
            } => Relation {
                interface,
                optional,
                limit,
                scope,
            },
        }
    }
}

impl Meta {
    /// Parse `metadata.yaml` from a byte stream.
    pub fn read_from<R: Read>(mut r: R) -> Result<Self, ParseError> {
        let mut data = Vec::new();
        r.read_to_end(&mut data)?;
        let meta: Meta = serde_yaml::from_slice(&data)?;
        meta.validate()?;
        Ok(meta)
    }

    fn validate(&self) -> Result<(), ParseError> {
        if self.name.trim().is_empty() {
            return Err(ParseError::Invalid("metadata: name must not be empty".to_string()));
        }
        for (kind, relations) in [
            ("provides", &self.provides),
            ("requires", &self.requires),
            ("peers", &self.peers),
        ] {
            for (name, rel) in relations {
                if rel.interface.is_empty() {
                    return Err(ParseError::Invalid(format!(
                        "metadata: {} relation {:?} has no interface",
                        kind, name
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMMY: &str = r#"
name: dummy
summary: "That's a dummy charm."
description: |
    This is a longer description which
    potentially contains multiple lines.
provides:
    url: http
    admin:
        interface: http
        limit: 1
requires:
    db:
        interface: mysql
        optional: true
        scope: container
peers:
    ring: dummy-ring
"#;

    #[test]
    fn test_read_meta() {
        let meta = Meta::read_from(DUMMY.as_bytes()).unwrap();
        assert_eq!(meta.name, "dummy");
        assert_eq!(meta.summary, "That's a dummy charm.");
        assert!(meta.description.starts_with("This is a longer"));
        assert!(!meta.subordinate);

        assert_eq!(meta.provides["url"].interface, "http");
        assert_eq!(meta.provides["admin"].limit, Some(1));
        assert!(meta.requires["db"].optional);
        assert_eq!(meta.requires["db"].scope, RelationScope::Container);
        assert_eq!(meta.peers["ring"].interface, "dummy-ring");
    }

    #[test]
    fn test_missing_name() {
        let err = Meta::read_from("summary: nameless\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::Yaml(_)));
    }

    #[test]
    fn test_empty_name() {
        let err = Meta::read_from("name: ''\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::Invalid(_)));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let meta = Meta::read_from("name: x\nrevision: 3\nformat: 2\n".as_bytes()).unwrap();
        assert_eq!(meta.name, "x");
    }

    #[test]
    fn test_not_yaml() {
        assert!(Meta::read_from("name: [unterminated".as_bytes()).is_err());
    }
}
