use serde::{Deserialize, Serialize};

/// Upstream source a raw record was fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Astronomy picture of the day
    DailyImage,
    /// Mars rover photo search
    RoverPhoto,
    /// Image and video library search
    SearchResult,
}

/// Media type reported by the daily image endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    #[default]
    Image,
    Video,
}

impl MediaType {
    /// Anything that is not explicitly "video" is treated as an image.
    pub fn from_upstream(value: &str) -> Self {
        if value.eq_ignore_ascii_case("video") {
            MediaType::Video
        } else {
            MediaType::Image
        }
    }
}

/// A daily curated image or video, keyed by calendar date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyImage {
    pub date: String,
    pub title: String,
    pub explanation: String,
    pub url: String,
    #[serde(default)]
    pub media_type: MediaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hd_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

/// A photo taken by a planetary rover
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoverPhoto {
    pub id: i64,
    #[serde(default)]
    pub sol: i64,
    pub earth_date: String,
    pub img_src: String,
    pub camera: String,
    pub rover: String,
}

/// One item from the media library search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub nasa_id: String,
    pub title: String,
    pub description: String,
    pub date_created: String,
    pub img_src: String,
}

/// A record from any of the upstream sources.
///
/// Persisted verbatim as a favorite; the `kind` tag keeps the shapes apart on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RemoteRecord {
    DailyImage(DailyImage),
    RoverPhoto(RoverPhoto),
    SearchResult(SearchResult),
}

/// Identity used to deduplicate and match favorites
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum IdentityKey {
    /// Keyed by a non-empty calendar date
    Date(String),
    /// Keyed by a non-empty identifier
    Id(String),
    /// Neither a date nor an id is available
    Unidentifiable,
}

impl IdentityKey {
    /// Two keys match only when they are of the same kind and carry equal values.
    ///
    /// `Unidentifiable` never matches anything, itself included.
    pub fn matches(&self, other: &IdentityKey) -> bool {
        match (self, other) {
            (IdentityKey::Date(a), IdentityKey::Date(b)) => a == b,
            (IdentityKey::Id(a), IdentityKey::Id(b)) => a == b,
            _ => false,
        }
    }

    fn date(value: &str) -> Option<Self> {
        (!value.is_empty()).then(|| IdentityKey::Date(value.to_string()))
    }

    fn id(value: &str) -> Option<Self> {
        (!value.is_empty()).then(|| IdentityKey::Id(value.to_string()))
    }
}

/// Common display projection shared by all record shapes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordView {
    pub identity: IdentityKey,
    pub title: String,
    pub date: String,
    pub image_url: String,
    pub description: String,
}

impl RemoteRecord {
    pub fn source_kind(&self) -> SourceKind {
        match self {
            RemoteRecord::DailyImage(_) => SourceKind::DailyImage,
            RemoteRecord::RoverPhoto(_) => SourceKind::RoverPhoto,
            RemoteRecord::SearchResult(_) => SourceKind::SearchResult,
        }
    }

    /// Every identity key this record carries, primary key first.
    ///
    /// Empty for records with neither a date nor an id.
    pub fn identity_keys(&self) -> Vec<IdentityKey> {
        match self {
            RemoteRecord::DailyImage(image) => {
                IdentityKey::date(&image.date).into_iter().collect()
            }
            // A zero id is treated as absent
            RemoteRecord::RoverPhoto(photo) => (photo.id != 0)
                .then(|| IdentityKey::Id(photo.id.to_string()))
                .into_iter()
                .collect(),
            RemoteRecord::SearchResult(result) => IdentityKey::id(&result.nasa_id)
                .into_iter()
                .chain(IdentityKey::date(&result.date_created))
                .collect(),
        }
    }

    /// The primary identity key, used for display and logging
    pub fn identity(&self) -> IdentityKey {
        self.identity_keys()
            .into_iter()
            .next()
            .unwrap_or(IdentityKey::Unidentifiable)
    }

    /// Whether `key` matches one of this record's identity keys
    pub fn has_key(&self, key: &IdentityKey) -> bool {
        self.identity_keys().iter().any(|k| k.matches(key))
    }

    /// Two records are the same favorite when they share a date key or an id key
    pub fn same_identity(&self, other: &RemoteRecord) -> bool {
        other.identity_keys().iter().any(|key| self.has_key(key))
    }

    pub fn title(&self) -> String {
        match self {
            RemoteRecord::DailyImage(image) => image.title.clone(),
            RemoteRecord::RoverPhoto(photo) => format!("Mars Rover - {}", photo.camera),
            RemoteRecord::SearchResult(result) => result.title.clone(),
        }
    }

    pub fn date(&self) -> &str {
        match self {
            RemoteRecord::DailyImage(image) => &image.date,
            RemoteRecord::RoverPhoto(photo) => &photo.earth_date,
            RemoteRecord::SearchResult(result) => &result.date_created,
        }
    }

    pub fn image_url(&self) -> &str {
        match self {
            RemoteRecord::DailyImage(image) => &image.url,
            RemoteRecord::RoverPhoto(photo) => &photo.img_src,
            RemoteRecord::SearchResult(result) => &result.img_src,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            RemoteRecord::DailyImage(image) => &image.explanation,
            RemoteRecord::RoverPhoto(_) => "",
            RemoteRecord::SearchResult(result) => &result.description,
        }
    }

    pub fn view(&self) -> RecordView {
        RecordView {
            identity: self.identity(),
            title: self.title(),
            date: self.date().to_string(),
            image_url: self.image_url().to_string(),
            description: self.description().to_string(),
        }
    }
}
