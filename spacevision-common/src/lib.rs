//! Shared data model for the SpaceVision data layer.

pub mod favorites;
pub mod types;

pub use favorites::{FavoriteRecord, FavoritesCollection};
pub use types::{
    DailyImage, IdentityKey, MediaType, RecordView, RemoteRecord, RoverPhoto, SearchResult,
    SourceKind,
};
