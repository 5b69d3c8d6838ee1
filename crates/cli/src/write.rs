//! Output writing.
//!
//! Every artifact is first written in full to a temp file inside its
//! destination directory. Files are renamed into place only once all of
//! them are staged, so an error while producing any one leaves the
//! previous outputs untouched.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::CliError;

/// Contents waiting to be renamed onto `path`.
pub struct StagedFile {
    path: PathBuf,
    temp: NamedTempFile,
}

pub fn stage(path: &Path, contents: &str) -> Result<StagedFile, CliError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)
        .map_err(|e| CliError::fatal(format!("cannot create {}: {}", dir.display(), e)))?;

    let mut temp = NamedTempFile::new_in(&dir)
        .map_err(|e| CliError::fatal(format!("cannot stage {}: {}", path.display(), e)))?;
    temp.write_all(contents.as_bytes())
        .and_then(|_| temp.flush())
        .map_err(|e| CliError::fatal(format!("cannot write {}: {}", path.display(), e)))?;

    Ok(StagedFile {
        path: path.to_path_buf(),
        temp,
    })
}

/// Stage every `(path, contents)` pair, then move them all into place.
pub fn write_all_atomic(files: &[(&Path, &str)]) -> Result<(), CliError> {
    let staged = files
        .iter()
        .map(|(path, contents)| stage(path, contents))
        .collect::<Result<Vec<_>, _>>()?;

    for file in staged {
        let StagedFile { path, temp } = file;
        temp.persist(&path)
            .map_err(|e| CliError::fatal(format!("cannot write {}: {}", path.display(), e.error)))?;
        tracing::debug!(path = %path.display(), "wrote output");
    }
    Ok(())
}
