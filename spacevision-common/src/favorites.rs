use serde::{Deserialize, Serialize};

use crate::types::RemoteRecord;

/// A favorite is a remote record stored as-is
pub type FavoriteRecord = RemoteRecord;

/// Ordered favorites, most recently added first.
///
/// Entries are unique under the identity rule, except for unidentifiable
/// records which are always kept as distinct entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoritesCollection(Vec<FavoriteRecord>);

impl FavoritesCollection {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FavoriteRecord> {
        self.0.iter()
    }

    pub fn records(&self) -> &[FavoriteRecord] {
        &self.0
    }

    pub fn into_records(self) -> Vec<FavoriteRecord> {
        self.0
    }

    /// Whether any entry shares an identity with `record`
    pub fn contains(&self, record: &RemoteRecord) -> bool {
        self.0.iter().any(|f| f.same_identity(record))
    }

    /// Insert at the front without checking identity
    pub fn prepend(&mut self, record: FavoriteRecord) {
        self.0.insert(0, record);
    }

    /// Drop every entry matching `record`, returning how many were removed
    pub fn remove_matching(&mut self, record: &RemoteRecord) -> usize {
        let before = self.0.len();
        self.0.retain(|f| !f.same_identity(record));
        before - self.0.len()
    }
}

impl From<Vec<FavoriteRecord>> for FavoritesCollection {
    fn from(records: Vec<FavoriteRecord>) -> Self {
        Self(records)
    }
}

impl<'a> IntoIterator for &'a FavoritesCollection {
    type Item = &'a FavoriteRecord;
    type IntoIter = std::slice::Iter<'a, FavoriteRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
