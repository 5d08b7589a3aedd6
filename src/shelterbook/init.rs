//! # Data Directory Resolution
//!
//! Every collection, the config and the session live in one data directory.
//! [`resolve_data_dir`] picks it, in order:
//!
//! 1. An explicit path (`--data-dir`, or `SHELTERBOOK_HOME` through clap's
//!    `env` support) is used as given.
//! 2. `-g/--global` selects the per-user platform data directory, found with
//!    the `directories` crate (e.g. `~/.local/share/shelterbook` on Linux).
//! 3. Otherwise `./Data` under the current working directory, the layout the
//!    shelter files have always used.
//!
//! Resolution never creates anything. Directories appear on the first write
//! or on `shelterbook init`.

use crate::api::ShelterApi;
use crate::commands::DataPaths;
use crate::error::{Result, ShelterError};
use crate::store::fs::FileStore;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DIR_NAME: &str = "Data";

pub struct ShelterContext {
    pub api: ShelterApi<FileStore>,
}

pub fn global_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("org", "shelterbook", "shelterbook")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| ShelterError::Store("Could not determine the user data directory".into()))
}

pub fn resolve_data_dir(cwd: &Path, data_override: Option<&Path>, use_global: bool) -> Result<PathBuf> {
    if let Some(dir) = data_override {
        if dir.is_absolute() {
            return Ok(dir.to_path_buf());
        }
        return Ok(cwd.join(dir));
    }
    if use_global {
        return global_data_dir();
    }
    Ok(cwd.join(DEFAULT_DIR_NAME))
}

pub fn initialize(cwd: &Path, data_override: Option<&Path>, use_global: bool) -> Result<ShelterContext> {
    let data_dir = resolve_data_dir(cwd, data_override, use_global)?;
    tracing::debug!(data_dir = %data_dir.display(), "using data directory");

    let store = FileStore::new(data_dir.clone());
    let api = ShelterApi::new(store, DataPaths::new(data_dir));
    Ok(ShelterContext { api })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_to_data_under_cwd() {
        let temp = TempDir::new().unwrap();
        let dir = resolve_data_dir(temp.path(), None, false).unwrap();
        assert_eq!(dir, temp.path().join("Data"));
        assert!(!dir.exists());
    }

    #[test]
    fn override_wins_over_global() {
        let temp = TempDir::new().unwrap();
        let custom = temp.path().join("records");
        let dir = resolve_data_dir(temp.path(), Some(&custom), true).unwrap();
        assert_eq!(dir, custom);
    }

    #[test]
    fn relative_override_is_joined_to_cwd() {
        let temp = TempDir::new().unwrap();
        let dir = resolve_data_dir(temp.path(), Some(Path::new("shelters")), false).unwrap();
        assert_eq!(dir, temp.path().join("shelters"));
    }

    #[test]
    fn context_points_api_at_resolved_dir() {
        let temp = TempDir::new().unwrap();
        let ctx = initialize(temp.path(), None, false).unwrap();
        assert_eq!(ctx.api.paths().data_dir, temp.path().join("Data"));
    }
}
