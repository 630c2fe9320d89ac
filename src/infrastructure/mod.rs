//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where the shelter keeps its data and trace files on the host.

pub mod paths;

pub use paths::{config_file, get_data_dir, DATA_DIR_ENV};
