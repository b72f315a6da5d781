use super::{manifest_error, EXIT_SUCCESS};
use pinset_schema::{check_manifest_file, OutputFormat};
use std::io::Write;
use std::path::Path;
use tracing::info;

pub fn run(manifest: &Path, format: OutputFormat) -> Result<u8, String> {
    info!("resolving {}", manifest.display());
    let set = check_manifest_file(manifest).map_err(manifest_error)?;
    let mut rendered = set.render(format).map_err(|e| e.to_string())?;
    if !rendered.is_empty() && !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    std::io::stdout()
        .write_all(rendered.as_bytes())
        .map_err(|e| format!("failed to write output: {e}"))?;
    Ok(EXIT_SUCCESS)
}
