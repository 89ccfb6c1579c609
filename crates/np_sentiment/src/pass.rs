use np_core::{ArticleStore, Result};
use tracing::{debug, info};

use crate::classifier::classify;

/// Recompute sentiment for every record in one store, writing back only
/// the values that changed. Returns the number of records rewritten.
pub async fn classify_store(store: &dyn ArticleStore) -> Result<usize> {
    let articles = store.all().await?;
    let mut updates = Vec::new();
    for article in &articles {
        let sentiment = match classify(&article.title, &article.category) {
            Some(s) => s,
            None => {
                debug!(url = %article.url, "skipping record with empty title");
                continue;
            }
        };
        if sentiment != article.sentiment {
            updates.push((article.url.clone(), sentiment));
        }
    }
    if updates.is_empty() {
        return Ok(0);
    }
    store.bulk_update_sentiment(&updates).await
}

/// Full classification pass over both collections.
pub async fn classify_all(
    global: &dyn ArticleStore,
    local: &dyn ArticleStore,
) -> Result<usize> {
    let changed = classify_store(global).await? + classify_store(local).await?;
    info!(changed, "sentiment pass complete");
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use np_core::{Article, ArticleFilter, Sentiment};
    use np_storage::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn article(url: &str, title: &str, category: &str) -> Article {
        Article {
            title: title.to_string(),
            source: "Test Wire".to_string(),
            url: url.to_string(),
            published_at: Utc::now(),
            category: category.to_string(),
            sentiment: Sentiment::Neutral,
            location: None,
        }
    }

    #[tokio::test]
    async fn pass_classifies_and_is_idempotent() {
        let store = MemoryStore::new();
        store
            .get_or_create(article("http://a.com/1", "Quarterly profit beats forecasts", "Business"))
            .await
            .unwrap();
        store
            .get_or_create(article("http://a.com/2", "Markets plummet overnight", "Business"))
            .await
            .unwrap();
        store
            .get_or_create(article("http://a.com/3", "Council meets on schedule", "General"))
            .await
            .unwrap();

        let changed = classify_store(&store).await.unwrap();
        assert_eq!(changed, 2);

        let all = store.all().await.unwrap();
        let by_url = |url: &str| all.iter().find(|a| a.url == url).unwrap().sentiment;
        assert_eq!(by_url("http://a.com/1"), Sentiment::Positive);
        assert_eq!(by_url("http://a.com/2"), Sentiment::Negative);
        assert_eq!(by_url("http://a.com/3"), Sentiment::Neutral);

        // Unchanged input: the second pass rewrites nothing
        assert_eq!(classify_store(&store).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn empty_titles_are_left_untouched() {
        let store = MemoryStore::new();
        let mut untitled = article("http://a.com/1", "", "General");
        untitled.sentiment = Sentiment::Positive;
        store.get_or_create(untitled).await.unwrap();

        assert_eq!(classify_store(&store).await.unwrap(), 0);
        let all = store.all().await.unwrap();
        assert_eq!(all[0].sentiment, Sentiment::Positive);
    }

    /// Store wrapper that counts write calls.
    struct CountingStore {
        inner: MemoryStore,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl ArticleStore for CountingStore {
        async fn exists(&self, url: &str) -> Result<bool> {
            self.inner.exists(url).await
        }
        async fn get_or_create(&self, article: Article) -> Result<(Article, bool)> {
            self.inner.get_or_create(article).await
        }
        async fn all(&self) -> Result<Vec<Article>> {
            self.inner.all().await
        }
        async fn list(&self, filter: &ArticleFilter) -> Result<Vec<Article>> {
            self.inner.list(filter).await
        }
        async fn bulk_update_sentiment(
            &self,
            updates: &[(String, Sentiment)],
        ) -> Result<usize> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.bulk_update_sentiment(updates).await
        }
        async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
            self.inner.delete_older_than(cutoff).await
        }
    }

    #[tokio::test]
    async fn no_write_is_issued_when_nothing_changed() {
        let store = CountingStore {
            inner: MemoryStore::new(),
            writes: AtomicUsize::new(0),
        };
        store
            .get_or_create(article("http://a.com/1", "Council meets on schedule", "General"))
            .await
            .unwrap();

        classify_store(&store).await.unwrap();
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn classify_all_covers_both_collections() {
        let global = MemoryStore::new();
        let local = MemoryStore::new();
        global
            .get_or_create(article("http://a.com/1", "Strong growth reported", "Business"))
            .await
            .unwrap();
        let mut localized = article("http://b.com/1", "Bridge collapse closes road", "General");
        localized.location = Some("Springfield, IL".to_string());
        local.get_or_create(localized).await.unwrap();

        let changed = classify_all(&global, &local).await.unwrap();
        assert_eq!(changed, 2);
    }
}
