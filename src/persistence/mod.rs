//! Text snapshots of the roster.
//!
//! - [`SnapshotStore`] - locked save/load of timestamped snapshot files
//! - [`format`] - the record codec
//! - [`PersistenceError`] - what a save or load can run into

pub mod error;
pub mod format;
pub mod snapshot;

pub use error::*;
pub use snapshot::*;
