//! Atomic output writing.

use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Writes `contents` to `path` so readers only ever see the old file or the
/// complete new one.
///
/// The data goes to a temporary file in the destination directory first and
/// is then persisted over `path`. Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the temporary file
/// cannot be written or moved into place. `path` is untouched in that case.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
