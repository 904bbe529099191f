//! Upstream space-agency data access
//!
//! - `api_client`: GET + JSON with bounded exponential-backoff retry
//! - `endpoints`: URL builders for every upstream resource
//! - `normalizer`: raw JSON -> `RemoteRecord`

pub mod api_client;
pub mod endpoints;
pub mod normalizer;

pub use api_client::{
    FetchClient, FetchError, HttpResponse, HttpTransport, ReqwestTransport, RetryPolicy,
};
pub use endpoints::{NasaEndpoints, RoverQuery};
pub use normalizer::{
    daily_images, flatten_neo_feed, normalize, normalize_all, rover_photos, search_results,
};

use serde_json::Value;
use spacevision_common::RemoteRecord;

use crate::dates;

/// Endpoint builders and the fetch client bundled per upstream resource
#[derive(Clone)]
pub struct NasaApi {
    client: FetchClient,
    endpoints: NasaEndpoints,
}

impl NasaApi {
    pub fn new(client: FetchClient, endpoints: NasaEndpoints) -> Self {
        Self { client, endpoints }
    }

    pub fn endpoints(&self) -> &NasaEndpoints {
        &self.endpoints
    }

    pub async fn apod(&self, date: Option<&str>) -> Result<Value, FetchError> {
        self.client.fetch_json_default(&self.endpoints.apod(date)).await
    }

    pub async fn random_apod(&self, count: u32) -> Result<Value, FetchError> {
        self.client
            .fetch_json_default(&self.endpoints.apod_random(count))
            .await
    }

    pub async fn mars_photos(&self, query: &RoverQuery) -> Result<Value, FetchError> {
        self.client
            .fetch_json_default(&self.endpoints.mars_photos(query))
            .await
    }

    pub async fn neo_feed(&self, start_date: &str, end_date: &str) -> Result<Value, FetchError> {
        self.client
            .fetch_json_default(&self.endpoints.neo_feed(start_date, end_date))
            .await
    }

    pub async fn search_images(&self, query: &str, page: u32) -> Result<Value, FetchError> {
        self.client
            .fetch_json_default(&self.endpoints.image_search(query, page))
            .await
    }

    /// The daily image for `date` (today when `None`) as a record
    pub async fn daily_image_record(
        &self,
        date: Option<&str>,
    ) -> Result<Option<RemoteRecord>, FetchError> {
        let response = self.apod(date).await?;
        Ok(daily_images(&response).into_iter().next())
    }

    pub async fn random_image_records(&self, count: u32) -> Result<Vec<RemoteRecord>, FetchError> {
        Ok(daily_images(&self.random_apod(count).await?))
    }

    pub async fn rover_photo_records(
        &self,
        query: &RoverQuery,
    ) -> Result<Vec<RemoteRecord>, FetchError> {
        Ok(rover_photos(&self.mars_photos(query).await?))
    }

    pub async fn search_records(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<RemoteRecord>, FetchError> {
        Ok(search_results(&self.search_images(query, page).await?))
    }

    /// Near-earth objects approaching from today through `days` ahead, soonest first
    pub async fn upcoming_neos(&self, days: u32) -> Result<Vec<Value>, FetchError> {
        let start = dates::today();
        let end = dates::future(i64::from(days));
        let feed = self.neo_feed(&start, &end).await?;
        Ok(flatten_neo_feed(&feed))
    }
}
