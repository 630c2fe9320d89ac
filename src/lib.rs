//! Shelter: catalog filtering, optimistic favorites and adoption requests for
//! an animal shelter.
//!
//! The crate provides:
//! - Category and free-text filtering over listings and events
//! - Favorite toggles applied optimistically and reverted when the write fails
//! - Adoption requests moving a listing `available → pending → adopted`
//! - Event browsing and registration
//! - Sign-in, sign-up and listing submission with ordered form validation
//! - JSON file persistence behind a background worker thread

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Line shell (main.rs)                               │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, forms, optimistic favorites      │
//! │  - Action dispatching                               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Auth Layer    │   │ Worker Layer  │
//! │ (ui/)         │   │ (auth/)       │   │ (worker/)     │
//! │ - View models │   │ - Provider    │   │ - JSON IPC    │
//! │ - Text render │   │ - Session     │   │ - Storage ops │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                                                   │
//! ┌─────────────────────────────────────────────────────┐
//! │  Catalog (catalog/), Storage (storage/)             │
//! │  Domain (domain/), Infrastructure (infrastructure/) │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with event/action model
//! - [`auth`]: Identity provider seam and the explicit auth session
//! - [`catalog`]: Catalog snapshots and the filter engine
//! - [`domain`]: Listings, events, identities and errors
//! - [`infrastructure`]: Data and config directory resolution
//! - [`storage`]: Storage trait with JSON file and in-memory backends
//! - [`worker`]: Background storage worker and its wire messages
//! - [`ui`]: View models and the plain-text renderer
//! - [`observability`]: Tracing subscriber and OTLP file export
//!
//! # Configuration
//!
//! Read from `config.toml` in the platform config directory, or from the path
//! in `SHELTER_CONFIG`:
//!
//! ```toml
//! data_dir = "/var/lib/shelter"
//! storage = "json"          # or "memory"
//! seed_catalog = true
//! trace_level = "debug"
//! trace_file = "/tmp/shelter-otlp.json"
//! ```
//!
//! `SHELTER_DATA_DIR` overrides `data_dir`. Accounts are kept next to the
//! store (`accounts.json`) when `storage = "json"`.
//!
//! # Example
//!
//! ```rust
//! use shelter::auth::AuthSession;
//! use shelter::{handle_event, AppState, Event};
//!
//! let mut state = AppState::new();
//! let session = AuthSession::anonymous();
//!
//! let (_, actions) = handle_event(&mut state, &session, &Event::Mount)?;
//! assert!(!actions.is_empty());
//! # Ok::<(), shelter::ShelterError>(())
//! ```

pub mod app;
pub mod auth;
pub mod catalog;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod storage;
pub mod ui;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event, InputMode, SearchFocus, ViewMode};
pub use domain::{Result, ShelterError};

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SHELTER_CONFIG";

/// File name of the OTLP trace output inside the data directory.
pub const TRACE_FILE: &str = "shelter-otlp.json";

/// Where the worker keeps listings, events, favorites and registrations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local; nothing survives a restart.
    Memory,
    /// `shelter.json` and `accounts.json` inside the data directory.
    #[default]
    Json,
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding `shelter.json`. Default: platform data directory.
    pub data_dir: PathBuf,

    pub storage: StorageBackend,

    /// Tracing filter directive (`trace`, `debug`, `info`, ...).
    ///
    /// `RUST_LOG` takes precedence. Setting a level without `trace_file`
    /// exports spans to `shelter-otlp.json` in the data directory.
    pub trace_level: Option<String>,

    /// OTLP JSON trace output.
    pub trace_file: Option<PathBuf>,

    /// Fill a fresh store with the demo catalog. Default: `true`
    pub seed_catalog: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: infrastructure::get_data_dir(),
            storage: StorageBackend::Json,
            trace_level: None,
            trace_file: None,
            seed_catalog: true,
        }
    }
}

impl Config {
    /// Parses a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ShelterError::Config`] for malformed TOML or unknown keys.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shelter::{Config, StorageBackend};
    ///
    /// let config = Config::from_toml_str("storage = \"memory\"\nseed_catalog = false")?;
    /// assert_eq!(config.storage, StorageBackend::Memory);
    /// assert!(!config.seed_catalog);
    /// # Ok::<(), shelter::ShelterError>(())
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ShelterError::Config(e.to_string()))
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ShelterError::Io`] if the file cannot be read and
    /// [`ShelterError::Config`] if it does not parse.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Loads the effective configuration.
    ///
    /// Reads the file named by `SHELTER_CONFIG` (which must exist), else the
    /// platform `config.toml` if present, else defaults. `SHELTER_DATA_DIR`
    /// then overrides `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => match infrastructure::config_file().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        if let Some(dir) = std::env::var_os(infrastructure::DATA_DIR_ENV) {
            if !dir.is_empty() {
                config.data_dir = PathBuf::from(dir);
            }
        }

        tracing::debug!(data_dir = %config.data_dir.display(), storage = ?config.storage, "config loaded");
        Ok(config)
    }

    /// Where spans are exported, if anywhere.
    ///
    /// An explicit `trace_file` wins. A `trace_level` on its own exports to
    /// the data directory. With neither, logs only go to stderr.
    #[must_use]
    pub fn trace_output(&self) -> Option<PathBuf> {
        self.trace_file.clone().or_else(|| {
            self.trace_level
                .as_ref()
                .map(|_| self.data_dir.join(TRACE_FILE))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.storage, StorageBackend::Json);
        assert!(config.seed_catalog);
        assert_eq!(config.trace_level, None);
        assert_eq!(config.trace_file, None);
    }

    #[test]
    fn parses_toml() {
        let config = Config::from_toml_str(
            r#"
            data_dir = "/srv/shelter"
            storage = "memory"
            seed_catalog = false
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/shelter"));
        assert_eq!(config.storage, StorageBackend::Memory);
        assert!(!config.seed_catalog);
        assert_eq!(config.trace_level, None);
    }

    #[test]
    fn rejects_unknown_toml_keys() {
        let err = Config::from_toml_str("theme = \"dark\"").unwrap_err();
        assert!(matches!(err, ShelterError::Config(_)));

        let err = Config::from_toml_str("storage = \"postgres\"").unwrap_err();
        assert!(matches!(err, ShelterError::Config(_)));
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "trace_level = \"warn\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.trace_level.as_deref(), Some("warn"));

        let missing = Config::from_file(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ShelterError::Io(_)));
    }

    #[test]
    fn trace_output_resolution() {
        let mut config = Config {
            data_dir: PathBuf::from("/tmp/shelter"),
            ..Config::default()
        };
        assert_eq!(config.trace_output(), None);

        config.trace_level = Some("debug".into());
        assert_eq!(
            config.trace_output(),
            Some(PathBuf::from("/tmp/shelter/shelter-otlp.json"))
        );

        config.trace_file = Some(PathBuf::from("/var/log/trace.json"));
        assert_eq!(
            config.trace_output(),
            Some(PathBuf::from("/var/log/trace.json"))
        );
    }
}
