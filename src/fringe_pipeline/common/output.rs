use std::ffi::OsStr;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::fringe_pipeline::common::error::{FringeError, Result};

/// Writes `bytes` to a temporary file next to `path`, then renames it over `path`.
///
/// Readers never observe a partially written file, and an existing file is
/// only replaced once the new content is complete.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let directory = target_directory(path);
    let output_error = output_error(path);

    let mut file = NamedTempFile::new_in(directory).map_err(&output_error)?;
    file.write_all(bytes).map_err(&output_error)?;
    file.as_file().sync_all().map_err(&output_error)?;
    file.persist(path).map_err(|e| output_error(e.error))?;

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Lets `write` create the file at a fresh path in a staging directory next to
/// `path`, then renames the finished file over `path`.
///
/// For encoders that open the output themselves and refuse to overwrite it.
/// The staging directory is removed whether or not `write` succeeds.
pub fn write_atomically_with<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let directory = target_directory(path);
    let output_error = output_error(path);

    let staging = tempfile::Builder::new()
        .prefix(".staging-")
        .tempdir_in(directory)
        .map_err(&output_error)?;
    let staged = staging
        .path()
        .join(path.file_name().unwrap_or(OsStr::new("output")));

    write(&staged)?;
    File::open(&staged)
        .and_then(|file| file.sync_all())
        .map_err(&output_error)?;
    std::fs::rename(&staged, path).map_err(&output_error)?;

    debug!("Moved {} into place", path.display());
    Ok(())
}

fn target_directory(path: &Path) -> &Path {
    path.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

fn output_error(path: &Path) -> impl Fn(std::io::Error) -> FringeError + '_ {
    move |e| FringeError::OutputWriteError(format!("{}: {}", path.display(), e))
}
