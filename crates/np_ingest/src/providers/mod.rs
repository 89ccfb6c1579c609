use std::time::Duration;

use async_trait::async_trait;
use np_core::Result;

pub mod newsapi;
pub mod opencage;

pub use newsapi::NewsApiClient;
pub use opencage::OpenCageClient;

/// One headline as returned by the news provider, prior to normalization.
/// Everything is optional here; the ingestor decides what is usable.
#[derive(Debug, Clone, Default)]
pub struct RawHeadline {
    pub title: Option<String>,
    pub source_name: Option<String>,
    pub url: Option<String>,
    pub published_at: Option<String>,
}

#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Top headlines for one category
    async fn top_headlines(
        &self,
        category: &str,
        language: &str,
        country: &str,
    ) -> Result<Vec<RawHeadline>>;

    /// Free-text search across all indexed sources
    async fn everything(&self, query: &str, language: &str) -> Result<Vec<RawHeadline>>;
}

/// Address components of one reverse-geocoding result.
#[derive(Debug, Clone, Default)]
pub struct PlaceComponents {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub state_code: Option<String>,
    pub country: Option<String>,
}

#[async_trait]
pub trait GeoProvider: Send + Sync {
    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Vec<PlaceComponents>>;
}

/// Shared HTTP client for the provider clients, with a per-call timeout.
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()
        .map_err(Into::into)
}
