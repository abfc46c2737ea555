//! Backup documents: what is installed, written to and read from JSON.

pub mod io;
pub mod types;

pub use types::{BackupFile, BackupPackage};

pub(crate) const CURRENT_SCHEMA_VERSION: u32 = 1;
