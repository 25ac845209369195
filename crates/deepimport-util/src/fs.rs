use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Write `bytes` to `path` unless the file already holds exactly those bytes.
///
/// Returns `true` when the file was written. A missing file counts as changed.
///
/// # Errors
/// Returns an error if the existing file cannot be read or the write fails.
pub fn write_if_changed(path: &Path, bytes: &[u8]) -> io::Result<bool> {
    match fs::read(path) {
        Ok(existing) if existing == bytes => return Ok(false),
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    atomic_write(path, bytes)?;
    Ok(true)
}

/// Replace the contents of `path` through a sibling temp file and a rename,
/// so readers see either the old bytes or the new bytes.
///
/// # Errors
/// Returns an error if the temp file cannot be written or renamed into place.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let temp_path = temp_sibling(path);

    {
        let mut file = File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        // Windows refuses to rename over an existing file.
        if cfg!(windows) {
            fs::copy(&temp_path, path)?;
            let _ = fs::remove_file(&temp_path);
            return Ok(());
        }
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    Ok(())
}

/// Temp path in the same directory, so the rename never crosses filesystems.
fn temp_sibling(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("file");
    parent.join(format!(".{name}.deepimport.{}", std::process::id()))
}
