//! Manifest parsing, validation, deterministic resolution, and lock files for pinset.
//!
//! This crate is the resolver core: manifest parsing from TOML or YAML
//! (`parse_manifest_str`), batch validation that reports every violation at
//! once (`validate`), name-ordered resolution into a `ResolvedSet`
//! (`resolve`), blake3 set identity, lock file generation/verification
//! (`LockFile`), and built-in preset manifests.

pub mod identity;
pub mod lock;
pub mod manifest;
pub mod pipeline;
pub mod preset;
pub mod requirement;
pub mod resolve;
pub mod types;
pub mod validate;

pub use identity::{compute_set_identity, SetIdentity};
pub use lock::{LockError, LockFile, LOCK_VERSION};
pub use manifest::{
    parse_manifest_file, parse_manifest_str, About, BuildMetadata, BuildNumber, ChannelType,
    Manifest, ManifestFormat, ParseError, RawManifest,
};
pub use pipeline::{check_batch, check_manifest_file, process_str, BatchOutcome, PipelineError};
pub use preset::{get_preset, list_presets, Preset, BUILTIN_PRESETS};
pub use requirement::{Requirement, SpecError};
pub use resolve::{resolve, OutputFormat, PackageIdentity, RenderError, ResolvedSet};
pub use types::{PackageName, SetDigest, ShortDigest};
pub use validate::{
    contains_placeholder, validate, ValidatedManifest, ValidationError, ValidationReport,
};
