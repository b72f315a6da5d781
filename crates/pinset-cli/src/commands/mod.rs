pub mod check;
pub mod completions;
pub mod lock;
pub mod man_pages;
pub mod new;
pub mod presets;
pub mod resolve;
pub mod verify;

use console::Style;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_MANIFEST_ERROR: u8 = 2;
pub const EXIT_LOCK_ERROR: u8 = 3;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn manifest_error(e: impl std::fmt::Display) -> String {
    format!("manifest error: {e}")
}

pub fn lock_error(e: impl std::fmt::Display) -> String {
    format!("lock error: {e}")
}

pub fn mark_ok(msg: &str) -> String {
    format!("{} {msg}", Style::new().green().apply_to("✓"))
}

pub fn mark_fail(msg: &str) -> String {
    format!("{} {msg}", Style::new().red().bold().apply_to("✗"))
}

/// The lock file lives next to its manifest.
pub fn lock_path_for(manifest: &Path, lock_name: &str) -> PathBuf {
    match manifest.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(lock_name),
        _ => PathBuf::from(lock_name),
    }
}

/// Write `content` to `dest` through a synced temp file in the same directory.
/// Without `overwrite` the final rename refuses to replace an existing file.
pub fn write_atomic(dest: &Path, content: &str, overwrite: bool) -> Result<(), String> {
    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| format!("write temp file: {e}"))?;
    use std::io::Write;
    tmp.write_all(content.as_bytes())
        .map_err(|e| format!("write temp file: {e}"))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| format!("fsync temp file: {e}"))?;
    let persisted = if overwrite {
        tmp.persist(dest)
    } else {
        tmp.persist_noclobber(dest)
    };
    persisted.map_err(|e| match e.error.kind() {
        ErrorKind::AlreadyExists => format!(
            "refusing to overwrite existing {} (pass --force)",
            dest.display()
        ),
        _ => format!("persist {}: {}", dest.display(), e.error),
    })?;
    Ok(())
}
