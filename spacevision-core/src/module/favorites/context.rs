use spacevision_common::{FavoriteRecord, FavoritesCollection, RemoteRecord};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::store::FavoritesStore;

/// What consumers observe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoritesState {
    pub favorites: FavoritesCollection,
    /// True until the first load from storage completes
    pub loading: bool,
}

impl Default for FavoritesState {
    fn default() -> Self {
        Self {
            favorites: FavoritesCollection::new(),
            loading: true,
        }
    }
}

/// In-memory favorites coordinator.
///
/// Holds the collection last returned by the store and broadcasts every change.
/// Share one instance by handing out the `Arc`; mutations issued through the
/// same instance are applied one at a time.
pub struct FavoritesContext {
    store: FavoritesStore,
    state: watch::Sender<FavoritesState>,
    /// Serializes read-modify-write sequences against the store
    write_gate: Mutex<()>,
}

impl FavoritesContext {
    pub fn new(store: FavoritesStore) -> Arc<Self> {
        let (state, _) = watch::channel(FavoritesState::default());
        Arc::new(Self {
            store,
            state,
            write_gate: Mutex::new(()),
        })
    }

    /// Load persisted favorites into memory and clear the loading flag
    pub async fn load(&self) {
        let _guard = self.write_gate.lock().await;
        let favorites = self.store.list().await;
        info!("Loaded {} favorites", favorites.len());
        self.state.send_replace(FavoritesState {
            favorites,
            loading: false,
        });
    }

    /// Run `load` in the background
    pub fn spawn_load(self: &Arc<Self>) -> JoinHandle<()> {
        let context = Arc::clone(self);
        tokio::spawn(async move {
            context.load().await;
        })
    }

    /// Resolve once the initial load has finished
    pub async fn wait_until_loaded(&self) {
        let mut receiver = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait
        let _ = receiver.wait_for(|state| !state.loading).await;
    }

    pub async fn add_favorite(&self, record: FavoriteRecord) {
        let _guard = self.write_gate.lock().await;
        let favorites = self.store.add(record).await;
        self.replace_favorites(favorites);
    }

    pub async fn remove_favorite(&self, record: &RemoteRecord) {
        let _guard = self.write_gate.lock().await;
        let favorites = self.store.remove(record).await;
        self.replace_favorites(favorites);
    }

    /// Remove `record` if saved, otherwise save it. Returns whether it is saved afterwards.
    pub async fn toggle_favorite(&self, record: FavoriteRecord) -> bool {
        let _guard = self.write_gate.lock().await;
        let favorites = if self.is_favorite(&record) {
            self.store.remove(&record).await
        } else {
            self.store.add(record.clone()).await
        };
        let saved = favorites.contains(&record);
        self.replace_favorites(favorites);
        saved
    }

    /// Delete every saved favorite
    pub async fn clear_favorites(&self) {
        let _guard = self.write_gate.lock().await;
        self.store.clear().await;
        let favorites = self.store.list().await;
        self.replace_favorites(favorites);
    }

    /// Identity check against the in-memory collection only
    pub fn is_favorite(&self, record: &RemoteRecord) -> bool {
        self.state.borrow().favorites.contains(record)
    }

    pub fn favorites(&self) -> FavoritesCollection {
        self.state.borrow().favorites.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn snapshot(&self) -> FavoritesState {
        self.state.borrow().clone()
    }

    /// Change notifications; the receiver starts at the current state
    pub fn subscribe(&self) -> watch::Receiver<FavoritesState> {
        self.state.subscribe()
    }

    pub fn store(&self) -> &FavoritesStore {
        &self.store
    }

    fn replace_favorites(&self, favorites: FavoritesCollection) {
        debug!("Favorites now {}", favorites.len());
        self.state.send_modify(|state| state.favorites = favorites);
    }
}
