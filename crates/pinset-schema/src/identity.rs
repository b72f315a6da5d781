use crate::requirement::Requirement;
use crate::resolve::PackageIdentity;
use crate::types::{SetDigest, ShortDigest};
use serde::Serialize;

/// Deterministic identity of a resolved set.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SetIdentity {
    pub digest: SetDigest,
    pub short_digest: ShortDigest,
}

/// Hash the package identity and the resolved requirement triples.
///
/// Callers pass requirements in resolved (name-sorted) order. Both the
/// resolver and the lock file go through this function, so a lock written
/// from a set always agrees with the set's own identity.
pub fn compute_set_identity(package: &PackageIdentity, requirements: &[Requirement]) -> SetIdentity {
    let mut hasher = blake3::Hasher::new();

    hasher.update(format!("name:{}", package.name).as_bytes());
    hasher.update(format!("version:{}", package.version).as_bytes());
    hasher.update(format!("channel:{}", package.channel_type.as_str()).as_bytes());
    hasher.update(
        format!(
            "build:{}:{}",
            package.build_number, package.build_string
        )
        .as_bytes(),
    );

    for req in requirements {
        hasher.update(
            format!(
                "req:{}@{}#{}",
                req.name,
                req.version_constraint.as_deref().unwrap_or_default(),
                req.build_pin.as_deref().unwrap_or_default()
            )
            .as_bytes(),
        );
    }

    let hex = hasher.finalize().to_hex().to_string();
    let short = hex[..12].to_owned();

    SetIdentity {
        digest: SetDigest::new(hex),
        short_digest: ShortDigest::new(short),
    }
}

#[cfg(test)]
mod tests {
    use crate::manifest::{parse_manifest_str, ManifestFormat};
    use crate::resolve::ResolvedSet;

    fn resolve_str(input: &str) -> ResolvedSet {
        parse_manifest_str(input, ManifestFormat::Toml)
            .unwrap()
            .validate()
            .unwrap()
            .resolve()
    }

    #[test]
    fn stable_digest_for_reordered_requirements() {
        let a = resolve_str(
            r#"
[package]
name = "artiq-dev"
[requirements]
run = ["numpy", "python >=3.5.3,<3.6"]
"#,
        );
        let b = resolve_str(
            r#"
[package]
name = "artiq-dev"
[requirements]
run = ["python >=3.5.3,<3.6", "numpy"]
"#,
        );
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn changed_pin_changes_digest() {
        let a = resolve_str(
            r#"
[package]
name = "x"
[requirements]
run = ["llvm-or1k 4.0.1"]
"#,
        );
        let b = resolve_str(
            r#"
[package]
name = "x"
[requirements]
run = ["llvm-or1k 6.0.0"]
"#,
        );
        assert_ne!(a.identity(), b.identity());
    }

    #[test]
    fn build_number_is_part_of_identity() {
        let a = resolve_str("[package]\nname = \"x\"\n[build]\nnumber = 1\n");
        let b = resolve_str("[package]\nname = \"x\"\n[build]\nnumber = 2\n");
        assert_ne!(a.identity(), b.identity());
    }

    #[test]
    fn short_digest_is_12_chars() {
        let id = resolve_str("[package]\nname = \"x\"\n").identity();
        assert_eq!(id.short_digest.as_str().len(), 12);
        assert_eq!(id.digest.as_str().len(), 64);
        assert!(id.digest.as_str().starts_with(id.short_digest.as_str()));
    }
}
