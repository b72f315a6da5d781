use crate::requirement::{Requirement, SpecError};
use crate::types::PackageName;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to parse manifest: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("package.name is required and must not be empty")]
    MissingName,
    #[error("malformed entry requirements[{index}]: {source}")]
    MalformedRequirement {
        index: usize,
        #[source]
        source: SpecError,
    },
}

/// Text syntax of a manifest document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManifestFormat {
    #[default]
    Toml,
    Yaml,
}

impl ManifestFormat {
    /// Pick the format from a file extension; anything but `.yaml`/`.yml` is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Toml,
        }
    }
}

// --- On-disk shape ---------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RawManifest {
    pub package: PackageSection,
    #[serde(default)]
    pub build: BuildSection,
    #[serde(default)]
    pub requirements: RequirementsSection,
    #[serde(default)]
    pub about: About,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PackageSection {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    /// `true`, or a noarch flavour such as `"python"` / `"generic"`.
    #[serde(default)]
    pub noarch: Option<NoarchField>,
    #[serde(default)]
    pub number: Option<NumberField>,
    #[serde(default)]
    pub string: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum NoarchField {
    Flag(bool),
    Kind(String),
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum NumberField {
    Int(i64),
    Text(String),
    /// Floats, booleans and anything else that is not a build number. Kept so
    /// validation can report it alongside the manifest's other problems.
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RequirementsSection {
    #[serde(default)]
    pub run: Vec<RawRequirement>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RawRequirement {
    Spec(String),
    Table(RequirementTable),
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RequirementTable {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub build: Option<String>,
}

/// Descriptive metadata. Carried through untouched apart from placeholder checks.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct About {
    #[serde(default)]
    pub home: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

// --- Parsed model ----------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelType {
    Noarch,
    #[default]
    PlatformSpecific,
}

impl ChannelType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Noarch => "noarch",
            Self::PlatformSpecific => "platform-specific",
        }
    }
}

/// Build number as written. Checked for sign and numeric form by validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildNumber {
    Number(i64),
    Text(String),
}

impl Default for BuildNumber {
    fn default() -> Self {
        Self::Number(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildMetadata {
    pub channel_type: ChannelType,
    pub build_number: BuildNumber,
    pub build_string: String,
}

/// A parsed manifest with requirement specs split into structured triples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub name: PackageName,
    pub version: String,
    pub build: BuildMetadata,
    pub requirements: Vec<Requirement>,
    pub about: About,
}

impl RawManifest {
    /// Lower the on-disk shape into a [`Manifest`].
    pub fn into_manifest(self) -> Result<Manifest, ParseError> {
        let name = self
            .package
            .name
            .as_deref()
            .and_then(PackageName::parse_trimmed)
            .ok_or(ParseError::MissingName)?;

        let requirements = self
            .requirements
            .run
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                lower_requirement(raw)
                    .map_err(|source| ParseError::MalformedRequirement { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let channel_type = match &self.build.noarch {
            Some(NoarchField::Flag(true)) => ChannelType::Noarch,
            Some(NoarchField::Kind(kind)) if !kind.trim().is_empty() => ChannelType::Noarch,
            _ => ChannelType::PlatformSpecific,
        };

        let build_number = match self.build.number {
            None => BuildNumber::default(),
            Some(NumberField::Int(n)) => BuildNumber::Number(n),
            Some(NumberField::Text(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    BuildNumber::default()
                } else {
                    BuildNumber::Text(text.to_owned())
                }
            }
            Some(NumberField::Other(value)) => BuildNumber::Text(value.to_string()),
        };

        Ok(Manifest {
            name,
            version: self.package.version.trim().to_owned(),
            build: BuildMetadata {
                channel_type,
                build_number,
                build_string: self.build.string.trim().to_owned(),
            },
            requirements,
            about: self.about,
        })
    }
}

fn lower_requirement(raw: &RawRequirement) -> Result<Requirement, SpecError> {
    match raw {
        RawRequirement::Spec(spec) => spec.parse(),
        RawRequirement::Table(table) => Requirement::from_parts(
            table.name.as_deref().unwrap_or_default(),
            table.version.as_deref(),
            table.build.as_deref(),
        ),
    }
}

pub fn parse_manifest_str(input: &str, format: ManifestFormat) -> Result<Manifest, ParseError> {
    let raw: RawManifest = match format {
        ManifestFormat::Toml => toml::from_str(input)?,
        ManifestFormat::Yaml => serde_yaml::from_str(input)?,
    };
    let manifest = raw.into_manifest()?;
    debug!(
        "parsed manifest '{}' with {} requirements",
        manifest.name,
        manifest.requirements.len()
    );
    Ok(manifest)
}

pub fn parse_manifest_file(path: impl AsRef<Path>) -> Result<Manifest, ParseError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    parse_manifest_str(&content, ManifestFormat::from_path(path))
}
