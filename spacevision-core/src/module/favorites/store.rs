use anyhow::{Context, Result};
use spacevision_common::{FavoriteRecord, FavoritesCollection, RemoteRecord};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::storage::KeyValueStore;

/// Slot holding the JSON array of favorites
pub const FAVORITES_KEY: &str = "favorites";

/// Persisted, deduplicated favorites.
///
/// Every mutation is a read-modify-write of the whole collection. Storage
/// failures never escape: unreadable data reads as empty and a failed write
/// leaves the stored collection as it was.
#[derive(Clone)]
pub struct FavoritesStore {
    storage: Arc<dyn KeyValueStore>,
}

impl FavoritesStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Persisted favorites, empty when nothing is stored or it cannot be read
    pub async fn list(&self) -> FavoritesCollection {
        let content = match self.storage.get(FAVORITES_KEY).await {
            Ok(Some(content)) if !content.trim().is_empty() => content,
            Ok(_) => {
                debug!("No favorites stored yet");
                return FavoritesCollection::new();
            }
            Err(e) => {
                error!("Error reading favorites: {:#}", e);
                return FavoritesCollection::new();
            }
        };

        match serde_json::from_str::<FavoritesCollection>(&content) {
            Ok(collection) => collection,
            Err(e) => {
                warn!("Stored favorites are not valid, treating as empty: {}", e);
                FavoritesCollection::new()
            }
        }
    }

    /// Prepend `record` unless an entry with the same identity exists
    pub async fn add(&self, record: FavoriteRecord) -> FavoritesCollection {
        let current = self.list().await;
        if current.contains(&record) {
            debug!("Favorite {:?} already saved", record.identity());
            return current;
        }

        let mut updated = current.clone();
        updated.prepend(record);
        self.persist_or_keep(updated, current).await
    }

    /// Drop every entry matching `record`
    pub async fn remove(&self, record: &RemoteRecord) -> FavoritesCollection {
        let current = self.list().await;
        let mut updated = current.clone();
        if updated.remove_matching(record) == 0 {
            debug!("Favorite {:?} not saved, nothing to remove", record.identity());
            return current;
        }

        self.persist_or_keep(updated, current).await
    }

    /// Delete the persisted collection entirely
    pub async fn clear(&self) {
        match self.storage.remove(FAVORITES_KEY).await {
            Ok(()) => info!("Cleared all favorites"),
            Err(e) => error!("Error clearing favorites: {:#}", e),
        }
    }

    /// Write the current collection to `path` as a pretty-printed backup
    pub async fn export_to<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        let path = path.as_ref().to_path_buf();
        let favorites = self.list().await;
        let content = serde_json::to_string_pretty(&favorites)
            .context("Failed to serialize favorites")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create export directory {:?}", parent))?;
        }
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write export file {:?}", path))?;

        info!("Exported {} favorites to {:?}", favorites.len(), path);
        Ok(path)
    }

    async fn persist_or_keep(
        &self,
        updated: FavoritesCollection,
        current: FavoritesCollection,
    ) -> FavoritesCollection {
        match self.persist(&updated).await {
            Ok(()) => updated,
            Err(e) => {
                error!("Error saving favorites, keeping previous state: {:#}", e);
                current
            }
        }
    }

    async fn persist(&self, favorites: &FavoritesCollection) -> Result<()> {
        let content = serde_json::to_string(favorites).context("Failed to serialize favorites")?;
        self.storage.set(FAVORITES_KEY, &content).await?;
        debug!("Persisted {} favorites", favorites.len());
        Ok(())
    }
}
