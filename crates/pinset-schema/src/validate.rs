use crate::manifest::{About, BuildNumber, ChannelType, Manifest};
use crate::requirement::Requirement;
use crate::types::PackageName;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// A single problem found while validating a manifest.
///
/// Every variant names the offending field with a stable identifier such as
/// `package.version` or `requirements[3].version`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("duplicate requirement '{name}' at requirements[{duplicate}] (first declared at requirements[{first}])")]
    DuplicateRequirement {
        name: PackageName,
        first: usize,
        duplicate: usize,
    },
    #[error("invalid build metadata in {field}: '{value}' is not a non-negative integer")]
    InvalidBuildMetadata { field: String, value: String },
    #[error("unresolved placeholder in {field}: '{value}'")]
    UnresolvedPlaceholder { field: String, value: String },
}

impl ValidationError {
    pub fn field(&self) -> String {
        match self {
            Self::DuplicateRequirement { duplicate, .. } => {
                format!("requirements[{duplicate}].name")
            }
            Self::InvalidBuildMetadata { field, .. } | Self::UnresolvedPlaceholder { field, .. } => {
                field.clone()
            }
        }
    }
}

/// All violations found in one manifest. Never empty when returned as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub manifest: PackageName,
    pub violations: Vec<ValidationError>,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "manifest '{}' failed validation with {} violation(s)",
            self.manifest,
            self.violations.len()
        )?;
        for v in &self.violations {
            write!(f, "\n  - {v}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

/// A manifest that passed every check. Only [`validate`] can produce one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedManifest {
    manifest: Manifest,
    build_number: u64,
}

impl ValidatedManifest {
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn name(&self) -> &PackageName {
        &self.manifest.name
    }

    pub fn version(&self) -> &str {
        &self.manifest.version
    }

    pub fn channel_type(&self) -> ChannelType {
        self.manifest.build.channel_type
    }

    pub fn build_number(&self) -> u64 {
        self.build_number
    }

    pub fn build_string(&self) -> &str {
        &self.manifest.build.build_string
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.manifest.requirements
    }

    pub fn about(&self) -> &About {
        &self.manifest.about
    }
}

/// True when `value` holds a `{{` that is closed by a later `}}`.
pub fn contains_placeholder(value: &str) -> bool {
    value
        .find("{{")
        .is_some_and(|start| value[start + 2..].contains("}}"))
}

impl Manifest {
    pub fn validate(self) -> Result<ValidatedManifest, ValidationReport> {
        validate(self)
    }
}

/// Run every check and collect all violations before failing.
pub fn validate(manifest: Manifest) -> Result<ValidatedManifest, ValidationReport> {
    let mut violations = Vec::new();
    let mut check = |field: &str, value: &str| {
        if contains_placeholder(value) {
            violations.push(ValidationError::UnresolvedPlaceholder {
                field: field.to_owned(),
                value: value.to_owned(),
            });
        }
    };

    check("package.name", manifest.name.as_str());
    check("package.version", manifest.version.as_str());

    let build_number = match &manifest.build.build_number {
        BuildNumber::Number(n) => u64::try_from(*n).map_err(|_| n.to_string()),
        BuildNumber::Text(text) if contains_placeholder(text) => {
            check("build.number", text.as_str());
            Ok(0)
        }
        // Parsed through i64 so every accepted value fits a TOML integer.
        BuildNumber::Text(text) => text
            .parse::<i64>()
            .ok()
            .and_then(|n| u64::try_from(n).ok())
            .ok_or_else(|| text.clone()),
    };
    check("build.string", manifest.build.build_string.as_str());

    for (i, req) in manifest.requirements.iter().enumerate() {
        check(format!("requirements[{i}].name").as_str(), req.name.as_str());
        if let Some(version) = &req.version_constraint {
            check(format!("requirements[{i}].version").as_str(), version.as_str());
        }
        if let Some(build) = &req.build_pin {
            check(format!("requirements[{i}].build").as_str(), build.as_str());
        }
    }

    let about = &manifest.about;
    for (field, value) in [
        ("about.home", &about.home),
        ("about.license", &about.license),
        ("about.summary", &about.summary),
        ("about.description", &about.description),
    ] {
        if let Some(value) = value {
            check(field, value.as_str());
        }
    }

    let build_number = match build_number {
        Ok(n) => n,
        Err(value) => {
            violations.push(ValidationError::InvalidBuildMetadata {
                field: "build.number".to_owned(),
                value,
            });
            0
        }
    };

    let mut first_seen: HashMap<&PackageName, usize> = HashMap::new();
    for (i, req) in manifest.requirements.iter().enumerate() {
        if let Some(&first) = first_seen.get(&req.name) {
            violations.push(ValidationError::DuplicateRequirement {
                name: req.name.clone(),
                first,
                duplicate: i,
            });
        } else {
            first_seen.insert(&req.name, i);
        }
    }

    if !violations.is_empty() {
        return Err(ValidationReport {
            manifest: manifest.name.clone(),
            violations,
        });
    }

    debug!(
        "manifest '{}' validated: {} requirements",
        manifest.name,
        manifest.requirements.len()
    );
    Ok(ValidatedManifest {
        manifest,
        build_number,
    })
}
