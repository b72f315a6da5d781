use super::EXIT_SUCCESS;
use clap::CommandFactory;
use std::path::{Path, PathBuf};

fn render_page(cmd: clap::Command, path: &Path) -> Result<(), String> {
    let mut buf = Vec::new();
    clap_mangen::Man::new(cmd)
        .render(&mut buf)
        .map_err(|e| format!("man page render failed: {e}"))?;
    std::fs::write(path, &buf).map_err(|e| format!("failed to write {}: {e}", path.display()))
}

/// Render `<bin>.1` plus one `<bin>-<sub>.1` page per subcommand.
pub fn write_pages<C: CommandFactory>(dir: &Path) -> Result<Vec<PathBuf>, String> {
    std::fs::create_dir_all(dir).map_err(|e| format!("failed to create dir: {e}"))?;
    let cmd = C::command();
    let bin = cmd.get_name().to_owned();

    let mut written = vec![dir.join(format!("{bin}.1"))];
    render_page(cmd.clone(), &written[0])?;
    for sub in cmd.get_subcommands() {
        let path = dir.join(format!("{bin}-{}.1", sub.get_name()));
        render_page(sub.clone(), &path)?;
        written.push(path);
    }
    Ok(written)
}

pub fn run<C: CommandFactory>(dir: &Path) -> Result<u8, String> {
    let written = write_pages::<C>(dir)?;
    println!("{} man pages written to {}", written.len(), dir.display());
    Ok(EXIT_SUCCESS)
}
