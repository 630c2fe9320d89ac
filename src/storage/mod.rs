//! Storage layer for the shelter catalog, favorites and event registrations.
//!
//! Every backend works over the same [`StorageData`] document; they differ
//! only in where that document lives.
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction for backend implementations
//! - `data`: The shared document and its mutation rules
//! - `json`: JSON file-based storage implementation
//! - `memory`: Process-local storage, seeded for demos and tests
//! - `models`: Submission types separate from domain models
//! - `seed`: Starter catalog

pub mod backend;
pub mod data;
pub mod json;
pub mod memory;
pub mod models;
pub mod seed;

pub use backend::Storage;
pub use data::StorageData;
pub use json::JsonStorage;
pub use memory::MemoryStorage;
pub use models::NewListing;
