//! Reading sources and writing artifacts relative to the project root.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SpritifyError};

/// Create `dir` and any missing parents.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| SpritifyError::io(dir, e))
}

/// Read a UTF-8 file at `root/rel`.
pub fn read_to_string(root: &Path, rel: &str) -> Result<String> {
    let path = root.join(rel);
    fs::read_to_string(&path).map_err(|e| SpritifyError::io(&path, e))
}

/// Write `contents` to `root/rel`, creating parent directories first.
pub fn write(root: &Path, rel: &str, contents: impl AsRef<[u8]>) -> Result<PathBuf> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(&path, contents).map_err(|e| SpritifyError::io(&path, e))?;
    Ok(path)
}

/// Path of the debug sidecar for an artifact (`dest` + `.json`).
pub fn sidecar(dest: &str) -> String {
    format!("{}.json", dest)
}
