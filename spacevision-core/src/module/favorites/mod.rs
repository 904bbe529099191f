//! Favorites persistence
//!
//! - `storage`: named key-value slots (file-backed or in-memory)
//! - `store`: read-modify-write favorites collection with identity dedup
//! - `context`: shared in-memory view with loading flag and change notification

pub mod context;
pub mod storage;
pub mod store;

pub use context::{FavoritesContext, FavoritesState};
pub use storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use store::{FAVORITES_KEY, FavoritesStore};
