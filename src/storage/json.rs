//! JSON file-based storage backend.
//!
//! Keeps the whole [`StorageData`] document in memory and rewrites the file
//! after every mutation using an atomic write (write-to-temp + rename), so a
//! crash never leaves a half-written catalog behind. A mutation is applied to
//! a copy of the document and only replaces it once the copy is on disk, so
//! memory and file never disagree.
//!
//! # Performance Characteristics
//!
//! - **Read**: served from memory after the initial load
//! - **Write**: O(n), serializes and writes the entire document
//! - **Best for**: a single shelter's catalog, infrequent writes

use crate::domain::error::{Result, ShelterError};
use crate::domain::{AdoptionStatus, Listing, ShelterEvent};
use crate::storage::backend::Storage;
use crate::storage::data::{StorageData, STORAGE_VERSION};
use crate::storage::models::NewListing;
use std::path::{Path, PathBuf};

/// JSON file storage backend.
///
/// # Thread Safety
///
/// This type is `Send` but not `Sync`. It is owned by the single worker thread.
pub struct JsonStorage {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory document, always equal to the last successful write.
    data: StorageData,
}

impl JsonStorage {
    /// Opens a JSON storage file, starting empty if it does not exist yet.
    ///
    /// Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON or an unknown format version
    /// - File permissions prevent reading
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use shelter::storage::JsonStorage;
    /// use std::path::PathBuf;
    ///
    /// let storage = JsonStorage::new(PathBuf::from("/tmp/shelter.json"))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(file_path: PathBuf) -> Result<Self> {
        Self::open(file_path, StorageData::default)
    }

    /// Opens a JSON storage file, writing `seed` to it if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Same conditions as [`JsonStorage::new`], plus failure to write the seed.
    pub fn with_seed(file_path: PathBuf, seed: StorageData) -> Result<Self> {
        let storage = Self::open(file_path, || seed)?;
        if !storage.file_path.exists() {
            Self::save_to_file(&storage.file_path, &storage.data)?;
        }
        Ok(storage)
    }

    fn open(file_path: PathBuf, initial: impl FnOnce() -> StorageData) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON storage");

        if let Some(parent) = file_path.parent() {
            tracing::debug!(parent = ?parent, "creating parent directory");
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            tracing::debug!("loading existing data");
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new storage");
            initial()
        };

        tracing::debug!(
            listing_count = data.listings.len(),
            event_count = data.events.len(),
            "storage initialized"
        );

        Ok(Self { file_path, data })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Loads storage data from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid JSON, or
    /// was written by a newer format version.
    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| ShelterError::Storage(format!("failed to parse JSON: {e}")))?;

        if data.version > STORAGE_VERSION {
            return Err(ShelterError::Storage(format!(
                "unsupported storage version {} (expected {STORAGE_VERSION})",
                data.version
            )));
        }

        tracing::debug!(
            version = data.version,
            listings = data.listings.len(),
            events = data.events.len(),
            "loaded storage data"
        );

        Ok(data)
    }

    /// Saves `data` to `path` using atomic write.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, the temporary write, or the rename fails.
    fn save_to_file(path: &Path, data: &StorageData) -> Result<()> {
        tracing::debug!(path = ?path, "saving storage data");

        let json = serde_json::to_string_pretty(data)
            .map_err(|e| ShelterError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;

        tracing::trace!("renaming temporary file to final location");
        if let Err(e) = std::fs::rename(&tmp_path, path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        tracing::debug!("storage saved successfully");
        Ok(())
    }

    /// Runs a mutation against a copy of the document, persists the copy, then
    /// adopts it.
    ///
    /// If either the mutation or the save fails, the in-memory document and
    /// the file are both left as they were.
    fn mutate<T>(&mut self, op: impl FnOnce(&mut StorageData) -> Result<T>) -> Result<T> {
        let mut next = self.data.clone();
        let value = op(&mut next)?;
        Self::save_to_file(&self.file_path, &next)?;
        self.data = next;
        Ok(value)
    }
}

impl Storage for JsonStorage {
    fn fetch_listings(&self) -> Result<Vec<Listing>> {
        let _span = tracing::debug_span!("json_fetch_listings").entered();

        let listings = self.data.listings.clone();
        tracing::debug!(count = listings.len(), "retrieved listings");
        Ok(listings)
    }

    fn fetch_listing_by_id(&self, id: &str) -> Result<Option<Listing>> {
        let _span = tracing::debug_span!("json_fetch_listing_by_id", listing_id = %id).entered();

        let listing = self.data.listing(id).cloned();
        tracing::debug!(found = listing.is_some(), "listing lookup complete");
        Ok(listing)
    }

    fn set_listing_status(&mut self, id: &str, status: AdoptionStatus) -> Result<()> {
        let _span = tracing::debug_span!("json_set_listing_status",
            listing_id = %id,
            status = %status
        )
        .entered();

        self.mutate(|data| data.set_listing_status(id, status))?;
        tracing::debug!("listing status updated");
        Ok(())
    }

    fn add_listing(&mut self, submission: NewListing, created_by: &str) -> Result<Listing> {
        let _span = tracing::debug_span!("json_add_listing", name = %submission.name).entered();

        let listing = self.mutate(|data| Ok(data.add_listing(submission, created_by)))?;
        tracing::debug!(listing_id = %listing.id, "listing added");
        Ok(listing)
    }

    fn set_favorite(&mut self, user_id: &str, listing_id: &str, is_favorite: bool) -> Result<()> {
        let _span = tracing::debug_span!("json_set_favorite",
            listing_id = %listing_id,
            is_favorite = is_favorite
        )
        .entered();

        self.mutate(|data| data.set_favorite(user_id, listing_id, is_favorite))?;
        tracing::debug!("favorite persisted");
        Ok(())
    }

    fn is_favorite(&self, listing_id: &str, user_id: &str) -> Result<bool> {
        Ok(self.data.is_favorite(listing_id, user_id))
    }

    fn favorite_ids(&self, user_id: &str) -> Result<Vec<String>> {
        let _span = tracing::debug_span!("json_favorite_ids").entered();

        let ids = self.data.favorite_ids(user_id);
        tracing::debug!(count = ids.len(), "retrieved favorites");
        Ok(ids)
    }

    fn fetch_events(&self) -> Result<Vec<ShelterEvent>> {
        let _span = tracing::debug_span!("json_fetch_events").entered();

        let events = self.data.events.clone();
        tracing::debug!(count = events.len(), "retrieved events");
        Ok(events)
    }

    fn fetch_event_by_id(&self, id: &str) -> Result<Option<ShelterEvent>> {
        Ok(self.data.event(id).cloned())
    }

    fn register_for_event(&mut self, event_id: &str, user_id: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_register_for_event", event_id = %event_id).entered();

        self.mutate(|data| data.register_for_event(event_id, user_id))?;
        tracing::debug!("registration persisted");
        Ok(())
    }

    fn is_registered(&self, event_id: &str, user_id: &str) -> Result<bool> {
        Ok(self.data.is_registered(event_id, user_id))
    }
}
