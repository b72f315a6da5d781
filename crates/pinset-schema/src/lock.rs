use crate::identity::{compute_set_identity, SetIdentity};
use crate::requirement::Requirement;
use crate::resolve::{PackageIdentity, ResolvedSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const LOCK_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum LockError {
    #[error("lock file I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("lock file parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("lock file serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("unsupported lock_version: {0}, expected 1")]
    UnsupportedVersion(u32),
    #[error("lock file digest mismatch: lock has '{lock_digest}', recomputed '{computed_digest}'")]
    DigestMismatch {
        lock_digest: String,
        computed_digest: String,
    },
    #[error("lock file manifest drift: {0}")]
    ManifestDrift(String),
}

/// The lock file records a resolved set together with its digest.
///
/// The digest is recomputed from the locked fields on every integrity check,
/// so a hand-edited lock is caught even when the edit keeps it well-formed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LockFile {
    pub lock_version: u32,
    pub digest: String,
    pub short_digest: String,
    pub package: PackageIdentity,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

impl LockFile {
    pub fn from_resolved(set: &ResolvedSet) -> Self {
        let identity = set.identity();
        LockFile {
            lock_version: LOCK_VERSION,
            digest: identity.digest.into_inner(),
            short_digest: identity.short_digest.into_inner(),
            package: set.package().clone(),
            requirements: set.requirements().to_vec(),
        }
    }

    pub fn compute_identity(&self) -> SetIdentity {
        compute_set_identity(&self.package, &self.requirements)
    }

    /// Verify that the stored digest matches the locked content.
    pub fn verify_integrity(&self) -> Result<SetIdentity, LockError> {
        if self.lock_version != LOCK_VERSION {
            return Err(LockError::UnsupportedVersion(self.lock_version));
        }
        let identity = self.compute_identity();
        if self.digest != identity.digest.as_str() {
            return Err(LockError::DigestMismatch {
                lock_digest: self.digest.clone(),
                computed_digest: identity.digest.into_inner(),
            });
        }
        Ok(identity)
    }

    /// Check that a freshly resolved manifest still matches this lock file.
    pub fn verify_manifest_intent(&self, set: &ResolvedSet) -> Result<(), LockError> {
        let current = set.package();
        if self.package.name != current.name {
            return Err(LockError::ManifestDrift(format!(
                "package name changed: lock has '{}', manifest has '{}'",
                self.package.name, current.name
            )));
        }
        if self.package.version != current.version {
            return Err(LockError::ManifestDrift(format!(
                "package version changed: lock has '{}', manifest has '{}'",
                self.package.version, current.version
            )));
        }
        if self.package != *current {
            return Err(LockError::ManifestDrift(
                "build metadata changed. Run 'pinset lock' to refresh.".to_owned(),
            ));
        }

        let locked: BTreeMap<&str, &Requirement> = self
            .requirements
            .iter()
            .map(|r| (r.name.as_str(), r))
            .collect();
        let declared: BTreeMap<&str, &Requirement> = set
            .requirements()
            .iter()
            .map(|r| (r.name.as_str(), r))
            .collect();

        for (name, req) in &declared {
            match locked.get(name) {
                None => {
                    return Err(LockError::ManifestDrift(format!(
                        "requirement '{name}' is in manifest but not in lock file. Run 'pinset lock' to refresh."
                    )))
                }
                Some(pinned) if pinned != req => {
                    return Err(LockError::ManifestDrift(format!(
                        "requirement changed: lock has '{pinned}', manifest has '{req}'"
                    )))
                }
                Some(_) => {}
            }
        }
        if let Some(name) = locked.keys().find(|name| !declared.contains_key(*name)) {
            return Err(LockError::ManifestDrift(format!(
                "requirement '{name}' is in lock file but no longer in manifest"
            )));
        }

        Ok(())
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), LockError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        std::io::Write::write_all(&mut tmp, content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| LockError::Io(e.error))?;
        // Fsync parent directory to ensure rename durability on power loss.
        if let Ok(f) = fs::File::open(dir) {
            let _ = f.sync_all();
        }
        Ok(())
    }

    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, LockError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{parse_manifest_str, ManifestFormat};

    fn resolve_str(input: &str) -> ResolvedSet {
        parse_manifest_str(input, ManifestFormat::Toml)
            .unwrap()
            .validate()
            .unwrap()
            .resolve()
    }

    fn sample_set() -> ResolvedSet {
        resolve_str(
            r#"
[package]
name = "artiq-dev"
version = "5.0"
[build]
noarch = "python"
number = 0
string = "py_0+git1a2b3c4d"
[requirements]
run = ["python >=3.5.3,<3.6", "rust-core-or1k 1.23.0 19", "numpy"]
"#,
        )
    }

    #[test]
    fn lock_roundtrip() {
        let lock = LockFile::from_resolved(&sample_set());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pinset.lock");

        lock.write_to_file(&path).unwrap();
        let loaded = LockFile::read_from_file(&path).unwrap();
        assert_eq!(lock, loaded);
    }

    #[test]
    fn lock_digest_matches_set_identity() {
        let set = sample_set();
        let lock = LockFile::from_resolved(&set);
        assert_eq!(lock.digest, set.identity().digest.as_str());
        assert_eq!(lock.requirements, set.requirements());
    }

    #[test]
    fn lock_integrity_check_passes() {
        let lock = LockFile::from_resolved(&sample_set());
        assert!(lock.verify_integrity().is_ok());
    }

    #[test]
    fn lock_integrity_fails_on_tamper() {
        let mut lock = LockFile::from_resolved(&sample_set());
        lock.requirements[0].version_constraint = Some("1.15".to_owned());
        assert!(matches!(
            lock.verify_integrity(),
            Err(LockError::DigestMismatch { .. })
        ));
    }

    #[test]
    fn lock_rejects_unknown_version() {
        let mut lock = LockFile::from_resolved(&sample_set());
        lock.lock_version = 9;
        assert!(matches!(
            lock.verify_integrity(),
            Err(LockError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn manifest_intent_verified() {
        let set = sample_set();
        let lock = LockFile::from_resolved(&set);
        assert!(lock.verify_manifest_intent(&set).is_ok());
    }

    #[test]
    fn drift_detected_on_changed_pin() {
        let lock = LockFile::from_resolved(&sample_set());
        let changed = resolve_str(
            r#"
[package]
name = "artiq-dev"
version = "5.0"
[build]
noarch = "python"
number = 0
string = "py_0+git1a2b3c4d"
[requirements]
run = ["python >=3.5.3,<3.6", "rust-core-or1k 1.23.0 20", "numpy"]
"#,
        );
        let err = lock.verify_manifest_intent(&changed).unwrap_err();
        assert!(err.to_string().contains("rust-core-or1k"));
    }

    #[test]
    fn drift_detected_on_added_and_removed_requirements() {
        let lock = LockFile::from_resolved(&resolve_str(
            "[package]\nname = \"x\"\n[requirements]\nrun = [\"a\", \"b\"]\n",
        ));
        let added = resolve_str("[package]\nname = \"x\"\n[requirements]\nrun = [\"a\", \"b\", \"c\"]\n");
        let removed = resolve_str("[package]\nname = \"x\"\n[requirements]\nrun = [\"a\"]\n");
        assert!(lock
            .verify_manifest_intent(&added)
            .unwrap_err()
            .to_string()
            .contains("'c' is in manifest"));
        assert!(lock
            .verify_manifest_intent(&removed)
            .unwrap_err()
            .to_string()
            .contains("'b' is in lock file"));
    }

    #[test]
    fn drift_detected_on_version_change() {
        let lock = LockFile::from_resolved(&resolve_str(
            "[package]\nname = \"x\"\nversion = \"1.0\"\n",
        ));
        let bumped = resolve_str("[package]\nname = \"x\"\nversion = \"1.1\"\n");
        assert!(matches!(
            lock.verify_manifest_intent(&bumped),
            Err(LockError::ManifestDrift(_))
        ));
    }
}
