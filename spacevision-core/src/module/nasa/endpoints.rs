//! URL builders for the upstream endpoints
use urlencoding::encode;

pub const DEFAULT_API_BASE: &str = "https://api.nasa.gov";
pub const DEFAULT_IMAGES_BASE: &str = "https://images-api.nasa.gov";

const CAMERA_ALL: &str = "all";

/// Rover photo query; defaults match the mobile client's initial filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoverQuery {
    pub rover: String,
    pub sol: u32,
    /// `None` or `"all"` leaves the camera filter off
    pub camera: Option<String>,
}

impl Default for RoverQuery {
    fn default() -> Self {
        Self {
            rover: "curiosity".to_string(),
            sol: 1000,
            camera: Some("fhaz".to_string()),
        }
    }
}

impl RoverQuery {
    pub fn new(rover: impl Into<String>, sol: u32, camera: Option<String>) -> Self {
        Self {
            rover: rover.into(),
            sol,
            camera,
        }
    }

    fn camera_filter(&self) -> Option<&str> {
        self.camera
            .as_deref()
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(CAMERA_ALL))
    }
}

/// Builds endpoint URLs from a base host, a resource path and escaped query values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NasaEndpoints {
    api_base: String,
    images_base: String,
    api_key: String,
}

impl Default for NasaEndpoints {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE, DEFAULT_IMAGES_BASE, "DEMO_KEY")
    }
}

impl NasaEndpoints {
    pub fn new(api_base: &str, images_base: &str, api_key: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            images_base: images_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Daily image, today's when `date` is `None`
    pub fn apod(&self, date: Option<&str>) -> String {
        let mut params = vec![("api_key", self.api_key.clone())];
        if let Some(date) = date.filter(|d| !d.is_empty()) {
            params.push(("date", date.to_string()));
        }
        build_url(&self.api_base, "/planetary/apod", &params)
    }

    /// `count` random daily images (the response is an array)
    pub fn apod_random(&self, count: u32) -> String {
        build_url(
            &self.api_base,
            "/planetary/apod",
            &[
                ("api_key", self.api_key.clone()),
                ("count", count.to_string()),
            ],
        )
    }

    pub fn mars_photos(&self, query: &RoverQuery) -> String {
        let path = format!("/mars-photos/api/v1/rovers/{}/photos", encode(&query.rover));
        let mut params = vec![("sol", query.sol.to_string())];
        if let Some(camera) = query.camera_filter() {
            params.push(("camera", camera.to_string()));
        }
        params.push(("api_key", self.api_key.clone()));
        build_url(&self.api_base, &path, &params)
    }

    /// Near-earth-object feed for the inclusive date range
    pub fn neo_feed(&self, start_date: &str, end_date: &str) -> String {
        build_url(
            &self.api_base,
            "/neo/rest/v1/feed",
            &[
                ("start_date", start_date.to_string()),
                ("end_date", end_date.to_string()),
                ("api_key", self.api_key.clone()),
            ],
        )
    }

    /// Media library image search. This host takes no API key.
    pub fn image_search(&self, query: &str, page: u32) -> String {
        build_url(
            &self.images_base,
            "/search",
            &[
                ("q", query.to_string()),
                ("page", page.max(1).to_string()),
                ("media_type", "image".to_string()),
            ],
        )
    }
}

fn build_url(base: &str, path: &str, params: &[(&str, String)]) -> String {
    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        format!("{}{}", base, path)
    } else {
        format!("{}{}?{}", base, path, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> NasaEndpoints {
        NasaEndpoints::new("https://api.test", "https://images.test/", "KEY123")
    }

    /// Every `key=value` pair of the query string
    fn query_pairs(url: &str) -> Vec<(String, String)> {
        url.split_once('?')
            .map(|(_, q)| q)
            .unwrap_or_default()
            .split('&')
            .filter(|p| !p.is_empty())
            .map(|p| {
                let (k, v) = p.split_once('=').unwrap();
                (k.to_string(), v.to_string())
            })
            .collect()
    }

    fn assert_once(url: &str, key: &str, value: &str) {
        let matches = query_pairs(url)
            .into_iter()
            .filter(|(k, _)| k == key)
            .collect::<Vec<_>>();
        assert_eq!(matches.len(), 1, "{} should appear once in {}", key, url);
        assert_eq!(matches[0].1, value);
    }

    #[test]
    fn test_apod_url() {
        let url = endpoints().apod(None);
        assert!(url.starts_with("https://api.test/planetary/apod?"));
        assert_once(&url, "api_key", "KEY123");
        assert!(query_pairs(&url).iter().all(|(k, _)| k != "date"));

        let url = endpoints().apod(Some("2023-05-01"));
        assert_once(&url, "date", "2023-05-01");
        assert_once(&url, "api_key", "KEY123");
    }

    #[test]
    fn test_apod_random_url() {
        let url = endpoints().apod_random(5);
        assert!(url.contains("/planetary/apod"));
        assert_once(&url, "count", "5");
    }

    #[test]
    fn test_mars_photos_url() {
        let query = RoverQuery::new("curiosity", 1000, Some("fhaz".to_string()));
        let url = endpoints().mars_photos(&query);
        assert!(url.contains("/mars-photos/api/v1/rovers/curiosity/photos"));
        assert_once(&url, "sol", "1000");
        assert_once(&url, "camera", "fhaz");
        assert_once(&url, "api_key", "KEY123");
    }

    #[test]
    fn test_mars_photos_all_cameras_omits_filter() {
        for camera in [None, Some("all".to_string()), Some("ALL".to_string())] {
            let url = endpoints().mars_photos(&RoverQuery::new("spirit", 12, camera));
            assert!(query_pairs(&url).iter().all(|(k, _)| k != "camera"), "{}", url);
        }
    }

    #[test]
    fn test_neo_feed_url() {
        let url = endpoints().neo_feed("2023-01-01", "2023-01-07");
        assert!(url.contains("/neo/rest/v1/feed"));
        assert_once(&url, "start_date", "2023-01-01");
        assert_once(&url, "end_date", "2023-01-07");
        assert_once(&url, "api_key", "KEY123");
    }

    #[test]
    fn test_image_search_escapes_and_has_no_key() {
        let url = endpoints().image_search("Apollo 11 & friends", 2);
        assert!(url.starts_with("https://images.test/search?"));
        assert_once(&url, "q", "Apollo%2011%20%26%20friends");
        assert_once(&url, "page", "2");
        assert_once(&url, "media_type", "image");
        assert!(!url.contains("api_key"));
    }

    #[test]
    fn test_dynamic_path_segment_is_escaped() {
        let url = endpoints().mars_photos(&RoverQuery::new("a/b", 1, None));
        assert!(url.contains("/rovers/a%2Fb/photos"));
    }
}
