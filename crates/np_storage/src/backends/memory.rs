use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use np_core::{Article, ArticleFilter, ArticleStore, Result, Sentiment};
use tokio::sync::RwLock;

/// In-memory store keyed by URL. The default backend; one instance per
/// collection (global, local).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    articles: Arc<RwLock<HashMap<String, Article>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn exists(&self, url: &str) -> Result<bool> {
        Ok(self.articles.read().await.contains_key(url))
    }

    async fn get_or_create(&self, article: Article) -> Result<(Article, bool)> {
        let mut articles = self.articles.write().await;
        if let Some(existing) = articles.get(&article.url) {
            return Ok((existing.clone(), false));
        }
        articles.insert(article.url.clone(), article.clone());
        Ok((article, true))
    }

    async fn all(&self) -> Result<Vec<Article>> {
        Ok(self.articles.read().await.values().cloned().collect())
    }

    async fn list(&self, filter: &ArticleFilter) -> Result<Vec<Article>> {
        let articles = self.articles.read().await;
        let mut matched: Vec<Article> = articles
            .values()
            .filter(|a| {
                filter
                    .category
                    .as_deref()
                    .map_or(true, |c| a.category == c)
            })
            .filter(|a| filter.sentiment.map_or(true, |s| a.sentiment == s))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(matched)
    }

    async fn bulk_update_sentiment(&self, updates: &[(String, Sentiment)]) -> Result<usize> {
        let mut articles = self.articles.write().await;
        let mut touched = 0;
        for (url, sentiment) in updates {
            if let Some(article) = articles.get_mut(url) {
                if article.sentiment != *sentiment {
                    article.sentiment = *sentiment;
                    touched += 1;
                }
            }
        }
        Ok(touched)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut articles = self.articles.write().await;
        let before = articles.len();
        articles.retain(|_, a| a.published_at >= cutoff);
        Ok(before - articles.len())
    }
}
