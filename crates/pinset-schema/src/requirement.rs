use crate::types::PackageName;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("requirement spec is empty")]
    Empty,
    #[error("requirement spec '{spec}' has {count} tokens, expected '<name> [<version>] [<build>]'")]
    TooManyTokens { spec: String, count: usize },
    #[error("requirement name must not be empty")]
    EmptyName,
}

/// One dependency entry: a name with optional version constraint and build pin.
///
/// An absent `version_constraint` means "any version". Serialization order of
/// the fields is fixed, so a list of requirements serializes identically for
/// identical content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Requirement {
    pub name: PackageName,
    pub version_constraint: Option<String>,
    pub build_pin: Option<String>,
}

impl Requirement {
    pub fn new(name: impl Into<PackageName>) -> Self {
        Self {
            name: name.into(),
            version_constraint: None,
            build_pin: None,
        }
    }

    #[must_use]
    pub fn with_version(mut self, constraint: impl Into<String>) -> Self {
        self.version_constraint = Some(constraint.into());
        self
    }

    #[must_use]
    pub fn with_build(mut self, pin: impl Into<String>) -> Self {
        self.build_pin = Some(pin.into());
        self
    }

    /// Build a requirement from table fields, trimming each value and
    /// treating blank optional fields as absent.
    pub fn from_parts(
        name: &str,
        version: Option<&str>,
        build: Option<&str>,
    ) -> Result<Self, SpecError> {
        let name = PackageName::parse_trimmed(name).ok_or(SpecError::EmptyName)?;
        Ok(Self {
            name,
            version_constraint: non_blank(version),
            build_pin: non_blank(build),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Split on ASCII whitespace, keeping a closed `{{ ... }}` span inside one
/// token so an unsubstituted placeholder stays attached to its field. An
/// unclosed `{{` is ordinary text.
fn tokenize(spec: &str) -> Vec<&str> {
    let bytes = spec.as_bytes();
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i..].starts_with(b"{{") {
            if let Some(close) = spec[i + 2..].find("}}") {
                start.get_or_insert(i);
                i += close + 4;
                continue;
            }
        }
        if bytes[i].is_ascii_whitespace() {
            if let Some(s) = start.take() {
                tokens.push(&spec[s..i]);
            }
        } else {
            start.get_or_insert(i);
        }
        i += 1;
    }
    if let Some(s) = start {
        tokens.push(&spec[s..]);
    }
    tokens
}

/// Parses the free-form `"<name> [<version>] [<build>]"` form used by recipe
/// requirement lists, e.g. `"rust-core-or1k 1.23.0 19"`.
impl FromStr for Requirement {
    type Err = SpecError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let tokens = tokenize(spec);
        match tokens.as_slice() {
            [] => Err(SpecError::Empty),
            [name] => Self::from_parts(name, None, None),
            [name, version] => Self::from_parts(name, Some(*version), None),
            [name, version, build] => Self::from_parts(name, Some(*version), Some(*build)),
            _ => Err(SpecError::TooManyTokens {
                spec: spec.trim().to_owned(),
                count: tokens.len(),
            }),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(version) = &self.version_constraint {
            write!(f, " {version}")?;
        }
        if let Some(build) = &self.build_pin {
            if self.version_constraint.is_none() {
                f.write_str(" *")?;
            }
            write!(f, " {build}")?;
        }
        Ok(())
    }
}
