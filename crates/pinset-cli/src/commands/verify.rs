use super::{json_pretty, lock_error, lock_path_for, manifest_error, mark_ok, EXIT_SUCCESS};
use pinset_schema::{check_manifest_file, LockFile};
use std::path::Path;

pub fn run(manifest: &Path, lock_name: &str, json: bool) -> Result<u8, String> {
    let lock_path = lock_path_for(manifest, lock_name);
    let lock = LockFile::read_from_file(&lock_path).map_err(lock_error)?;
    let identity = lock.verify_integrity().map_err(lock_error)?;

    let set = check_manifest_file(manifest).map_err(manifest_error)?;
    lock.verify_manifest_intent(&set).map_err(lock_error)?;

    if json {
        let payload = serde_json::json!({
            "status": "verified",
            "lock_file": lock_path,
            "digest": identity.digest,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "{}",
            mark_ok(&format!(
                "{} matches {} ({})",
                lock_path.display(),
                manifest.display(),
                identity.short_digest
            ))
        );
    }
    Ok(EXIT_SUCCESS)
}
