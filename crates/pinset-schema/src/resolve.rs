use crate::identity::{compute_set_identity, SetIdentity};
use crate::manifest::ChannelType;
use crate::requirement::Requirement;
use crate::types::PackageName;
use crate::validate::ValidatedManifest;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML serialization failed: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Identity of the package a resolved set belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageIdentity {
    pub name: PackageName,
    pub version: String,
    pub channel_type: ChannelType,
    pub build_number: u64,
    pub build_string: String,
}

/// Deduplicated requirements in name order, ready for an external installer.
///
/// Built only by [`resolve`]; the requirement order is byte-wise ordinal on
/// the name, so two manifests with the same content serialize identically
/// no matter how their requirements were ordered in the source text.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResolvedSet {
    package: PackageIdentity,
    requirements: Vec<Requirement>,
}

impl ResolvedSet {
    pub fn package(&self) -> &PackageIdentity {
        &self.package
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    pub fn identity(&self) -> SetIdentity {
        compute_set_identity(&self.package, &self.requirements)
    }

    pub fn canonical_json(&self) -> Result<String, RenderError> {
        Ok(serde_json::to_string(self)?)
    }

    /// One `{name, version_constraint, build_pin}` object per line.
    pub fn to_json_lines(&self) -> Result<String, RenderError> {
        let mut out = String::new();
        for req in &self.requirements {
            out.push_str(&serde_json::to_string(req)?);
            out.push('\n');
        }
        Ok(out)
    }

    pub fn to_toml(&self) -> Result<String, RenderError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn render(&self, format: OutputFormat) -> Result<String, RenderError> {
        match format {
            OutputFormat::Json => self.canonical_json(),
            OutputFormat::JsonLines => self.to_json_lines(),
            OutputFormat::Toml => self.to_toml(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    #[default]
    #[serde(rename = "jsonl")]
    JsonLines,
    Toml,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "jsonl" | "json-lines" => Ok(Self::JsonLines),
            "toml" => Ok(Self::Toml),
            other => Err(format!(
                "unknown output format '{other}' (expected: json, jsonl, toml)"
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::JsonLines => "jsonl",
            Self::Toml => "toml",
        })
    }
}

impl ValidatedManifest {
    pub fn resolve(&self) -> ResolvedSet {
        resolve(self)
    }
}

/// Order requirements by name. No version solving happens here.
pub fn resolve(validated: &ValidatedManifest) -> ResolvedSet {
    let mut requirements = validated.requirements().to_vec();
    requirements.sort_by(|a, b| a.name.cmp(&b.name));

    let set = ResolvedSet {
        package: PackageIdentity {
            name: validated.name().clone(),
            version: validated.version().to_owned(),
            channel_type: validated.channel_type(),
            build_number: validated.build_number(),
            build_string: validated.build_string().to_owned(),
        },
        requirements,
    };
    debug!("resolved '{}': {} requirements", set.package.name, set.len());
    set
}
