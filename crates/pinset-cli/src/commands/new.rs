use super::{json_pretty, manifest_error, write_atomic, EXIT_SUCCESS};
use pinset_schema::{get_preset, list_presets, RawManifest};
use std::path::Path;

fn render_preset(preset_name: &str, package_name: &str) -> Result<String, String> {
    let preset = get_preset(preset_name).ok_or_else(|| {
        let known: Vec<&str> = list_presets().iter().map(|p| p.name).collect();
        format!(
            "unknown preset '{preset_name}' (expected: {})",
            known.join(", ")
        )
    })?;
    let mut raw: RawManifest =
        toml::from_str(preset.manifest).map_err(|e| format!("preset parse error: {e}"))?;
    raw.package.name = Some(package_name.to_owned());

    // Round-trip through the resolver so a bad name never reaches disk.
    raw.clone()
        .into_manifest()
        .map_err(manifest_error)?
        .validate()
        .map_err(manifest_error)?;

    toml::to_string_pretty(&raw).map_err(|e| format!("TOML serialization failed: {e}"))
}

pub fn run(
    name: &str,
    preset: &str,
    dest: &Path,
    force: bool,
    json: bool,
) -> Result<u8, String> {
    let content = render_preset(preset, name)?;
    write_atomic(dest, &content, force)?;

    if json {
        let payload = serde_json::json!({
            "status": "written",
            "path": dest,
            "name": name,
            "preset": preset,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("wrote {} for '{name}' from preset '{preset}'", dest.display());
    }
    Ok(EXIT_SUCCESS)
}
