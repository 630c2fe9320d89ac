//! Platform data and config locations.
//!
//! The data directory holds `shelter.json` and the OTLP trace file. It resolves
//! in this order:
//!
//! 1. `SHELTER_DATA_DIR` environment variable
//! 2. The platform data directory (`~/.local/share/shelter` on Linux)
//! 3. `./.shelter` when no home directory can be determined

use directories::ProjectDirs;
use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "SHELTER_DATA_DIR";

const FALLBACK_DIR: &str = ".shelter";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "shelter", "shelter")
}

/// Returns the data directory for shelter storage.
///
/// The directory is not created here; storage and tracing create it on first
/// use.
///
/// # Examples
///
/// ```
/// use shelter::infrastructure::get_data_dir;
///
/// let data_dir = get_data_dir();
/// assert!(!data_dir.as_os_str().is_empty());
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    resolve_data_dir(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
}

fn resolve_data_dir(override_dir: Option<PathBuf>) -> PathBuf {
    override_dir
        .filter(|dir| !dir.as_os_str().is_empty())
        .or_else(|| project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DIR))
}

/// Default location of the optional `config.toml`.
#[must_use]
pub fn config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}
