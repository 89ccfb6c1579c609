use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::types::{Article, Sentiment};
use crate::Result;

/// Listing filter; `None` means no constraint on that field.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub category: Option<String>,
    pub sentiment: Option<Sentiment>,
}

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Whether a record with this URL is already stored
    async fn exists(&self, url: &str) -> Result<bool>;

    /// Insert unless the URL is already present; first write wins.
    /// Returns the stored record and whether it was created by this call.
    async fn get_or_create(&self, article: Article) -> Result<(Article, bool)>;

    /// Every stored record, in no particular order
    async fn all(&self) -> Result<Vec<Article>>;

    /// Filtered records, most recent first
    async fn list(&self, filter: &ArticleFilter) -> Result<Vec<Article>>;

    /// Write back recomputed sentiment values; returns the number of
    /// records actually touched
    async fn bulk_update_sentiment(&self, updates: &[(String, Sentiment)]) -> Result<usize>;

    /// Drop records published before the cutoff; returns the number removed
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize>;
}
