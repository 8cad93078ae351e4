use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Writes through a sibling `.tmp` file and renames it over `path`, so readers see either
/// the old document or the new one.
pub(crate) fn write_text_atomic(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = sibling_with_suffix(path, "tmp");
    if let Err(error) = fs::write(&tmp_path, text.as_bytes()) {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }
    if let Err(error) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }
    Ok(())
}

/// Copies `path` into `<path>.bak.tmp` and renames that over `<path>.bak`, so a failed copy
/// leaves the previous backup intact. Returns `Ok(None)` when there is nothing to back up yet.
pub(crate) fn copy_to_backup(path: &Path) -> io::Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }
    let backup = backup_path_for(path);
    let tmp_path = sibling_with_suffix(path, "bak.tmp");
    if let Err(error) = fs::copy(path, &tmp_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }
    if let Err(error) = fs::rename(&tmp_path, &backup) {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }
    Ok(Some(backup))
}

pub fn backup_path_for(path: &Path) -> PathBuf {
    sibling_with_suffix(path, "bak")
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("saves.json");
    let name = format!("{file_name}.{suffix}");
    match path.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}
