//! Env file location and loading.
//!
//! [`resolve_env_file`] turns an [`EnvFile`] into a concrete path and
//! [`read_env_file`] loads it. A missing file is reported as
//! [`EnvfigError::MissingFile`] before any parsing happens; other I/O
//! failures (permissions, invalid UTF-8) surface as
//! [`EnvfigError::IoError`].

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::EnvfigError;
use crate::types::EnvFile;

/// Resolve an [`EnvFile`] to the path of the file to read.
///
/// Returns `None` if the directory cannot be determined (no home directory,
/// no working directory).
pub fn resolve_env_file(location: &EnvFile, file_name: &str) -> Option<PathBuf> {
    match location {
        EnvFile::Cwd => std::env::current_dir().ok().map(|d| d.join(file_name)),
        EnvFile::Home => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(file_name))
        }
        EnvFile::Platform(app_name) => {
            let proj = directories::ProjectDirs::from("", "", app_name)?;
            Some(proj.config_dir().join(file_name))
        }
        EnvFile::Path(p) => Some(p.clone()),
    }
}

/// Read the env file at `path`.
pub fn read_env_file(path: &Path) -> Result<String, EnvfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            debug!(path = %path.display(), bytes = content.len(), "read env file");
            Ok(content)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(EnvfigError::MissingFile {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(EnvfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
