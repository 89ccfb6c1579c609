use async_trait::async_trait;
use np_core::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{NewsProvider, RawHeadline};

const BASE_URL: &str = "https://newsapi.org/v2";

#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    status: String,
    articles: Option<Vec<ApiArticle>>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiArticle {
    #[serde(default)]
    source: ApiSource,
    title: Option<String>,
    url: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiSource {
    name: Option<String>,
}

impl From<ApiArticle> for RawHeadline {
    fn from(a: ApiArticle) -> Self {
        RawHeadline {
            title: a.title,
            source_name: a.source.name,
            url: a.url,
            published_at: a.published_at,
        }
    }
}

/// Client for the NewsAPI.org v2 endpoints.
pub struct NewsApiClient {
    client: Client,
    api_key: String,
}

impl NewsApiClient {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Vec<RawHeadline>> {
        let response = self
            .client
            .get(format!("{}/{}", BASE_URL, path))
            .header("X-Api-Key", &self.api_key)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Provider(format!(
                "news provider returned {} for /{}",
                status, path
            )));
        }

        let body: HeadlinesResponse = response.json().await?;
        if body.status != "ok" {
            return Err(Error::Provider(format!(
                "news provider error {}: {}",
                body.code.unwrap_or_default(),
                body.message.unwrap_or_default()
            )));
        }

        let articles = body.articles.unwrap_or_default();
        debug!(path, count = articles.len(), "news provider response");
        Ok(articles.into_iter().map(RawHeadline::from).collect())
    }
}

#[async_trait]
impl NewsProvider for NewsApiClient {
    async fn top_headlines(
        &self,
        category: &str,
        language: &str,
        country: &str,
    ) -> Result<Vec<RawHeadline>> {
        self.get(
            "top-headlines",
            &[
                ("category", category),
                ("language", language),
                ("country", country),
            ],
        )
        .await
    }

    async fn everything(&self, query: &str, language: &str) -> Result<Vec<RawHeadline>> {
        self.get(
            "everything",
            &[
                ("q", query),
                ("language", language),
                ("sortBy", "publishedAt"),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_payload_deserializes() {
        let json = r#"{
            "status": "ok",
            "totalResults": 1,
            "articles": [{
                "source": {"id": null, "name": "The Daily Record"},
                "title": "Strong growth reported",
                "url": "http://example.com/growth",
                "publishedAt": "2026-08-01T09:30:00Z"
            }]
        }"#;
        let body: HeadlinesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.status, "ok");
        let articles = body.articles.unwrap();
        assert_eq!(articles.len(), 1);
        let raw = RawHeadline::from(articles.into_iter().next().unwrap());
        assert_eq!(raw.source_name.as_deref(), Some("The Daily Record"));
        assert_eq!(raw.published_at.as_deref(), Some("2026-08-01T09:30:00Z"));
    }

    #[test]
    fn error_payload_deserializes() {
        let json = r#"{"status": "error", "code": "rateLimited", "message": "slow down"}"#;
        let body: HeadlinesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.status, "error");
        assert_eq!(body.code.as_deref(), Some("rateLimited"));
        assert!(body.articles.is_none());
    }
}
