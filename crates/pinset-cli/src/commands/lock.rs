use super::{json_pretty, lock_error, lock_path_for, manifest_error, EXIT_SUCCESS};
use pinset_schema::{check_manifest_file, LockFile};
use std::path::Path;
use tracing::info;

pub fn run(manifest: &Path, lock_name: &str, json: bool) -> Result<u8, String> {
    let set = check_manifest_file(manifest).map_err(manifest_error)?;
    let lock = LockFile::from_resolved(&set);
    let lock_path = lock_path_for(manifest, lock_name);

    lock.write_to_file(&lock_path).map_err(lock_error)?;
    info!("wrote {}", lock_path.display());

    if json {
        let payload = serde_json::json!({
            "status": "locked",
            "lock_file": lock_path,
            "name": lock.package.name,
            "digest": lock.digest,
            "short_digest": lock.short_digest,
            "requirements": lock.requirements.len(),
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "locked '{}' ({}) to {}",
            lock.package.name,
            lock.short_digest,
            lock_path.display()
        );
    }
    Ok(EXIT_SUCCESS)
}
