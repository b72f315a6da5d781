//! Raw text to resolved set in one call, for single manifests and batches.
//!
//! Each manifest runs through `parse -> validate -> resolve` on its own. A
//! batch shares nothing between manifests, so one bad manifest is reported
//! without affecting the others.

use crate::manifest::{parse_manifest_file, parse_manifest_str, ManifestFormat, ParseError};
use crate::resolve::ResolvedSet;
use crate::validate::ValidationReport;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Validation(#[from] ValidationReport),
    #[error("manifest check panicked")]
    Panicked,
}

pub fn process_str(input: &str, format: ManifestFormat) -> Result<ResolvedSet, PipelineError> {
    let validated = parse_manifest_str(input, format)?.validate()?;
    Ok(validated.resolve())
}

pub fn check_manifest_file(path: impl AsRef<Path>) -> Result<ResolvedSet, PipelineError> {
    let validated = parse_manifest_file(path)?.validate()?;
    Ok(validated.resolve())
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub path: PathBuf,
    pub result: Result<ResolvedSet, PipelineError>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Check every manifest and return one outcome per path, in input order.
pub fn check_batch(paths: &[PathBuf]) -> Vec<BatchOutcome> {
    let width = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
    debug!("checking {} manifests, {width} at a time", paths.len());

    let mut outcomes = Vec::with_capacity(paths.len());
    for chunk in paths.chunks(width) {
        std::thread::scope(|s| {
            let handles: Vec<_> = chunk
                .iter()
                .map(|path| s.spawn(move || check_manifest_file(path)))
                .collect();
            for (path, handle) in chunk.iter().zip(handles) {
                let result = handle.join().unwrap_or(Err(PipelineError::Panicked));
                if let Err(e) = &result {
                    warn!("{}: {e}", path.display());
                }
                outcomes.push(BatchOutcome {
                    path: path.clone(),
                    result,
                });
            }
        });
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn process_str_runs_all_stages() {
        let set = process_str(
            "[package]\nname = \"x\"\n[requirements]\nrun = [\"b\", \"a\"]\n",
            ManifestFormat::Toml,
        )
        .unwrap();
        assert_eq!(set.requirements()[0].name, "a");
    }

    #[test]
    fn process_str_surfaces_parse_and_validation_errors() {
        assert!(matches!(
            process_str("[package]\n", ManifestFormat::Toml),
            Err(PipelineError::Parse(ParseError::MissingName))
        ));
        assert!(matches!(
            process_str(
                "[package]\nname = \"x\"\n[requirements]\nrun = [\"a\", \"a\"]\n",
                ManifestFormat::Toml
            ),
            Err(PipelineError::Validation(_))
        ));
    }

    #[test]
    fn batch_isolates_failures_and_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.toml");
        let bad = dir.path().join("bad.toml");
        let missing = dir.path().join("missing.toml");
        fs::write(&good, "[package]\nname = \"good\"\n").unwrap();
        fs::write(&bad, "[package]\nname = \"bad\"\n[build]\nnumber = -1\n").unwrap();

        let paths = vec![bad.clone(), good.clone(), missing.clone()];
        let outcomes = check_batch(&paths);

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].path, bad);
        assert!(matches!(
            outcomes[0].result,
            Err(PipelineError::Validation(_))
        ));
        assert!(outcomes[1].is_ok());
        assert!(matches!(
            outcomes[2].result,
            Err(PipelineError::Parse(ParseError::Io(_)))
        ));
    }

    #[test]
    fn batch_of_nothing_is_empty() {
        assert!(check_batch(&[]).is_empty());
    }
}
