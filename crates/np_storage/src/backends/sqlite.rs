use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use np_core::{Article, ArticleFilter, ArticleStore, Error, Result, Sentiment};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        url TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        source TEXT NOT NULL,
        published_at TEXT NOT NULL,
        category TEXT NOT NULL,
        sentiment TEXT NOT NULL DEFAULT 'Neutral',
        location TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS local_articles (
        url TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        source TEXT NOT NULL,
        published_at TEXT NOT NULL,
        category TEXT NOT NULL,
        sentiment TEXT NOT NULL DEFAULT 'Neutral',
        location TEXT
    )
    "#,
];

/// SQLite-backed store. One handle per table; `articles` holds the global
/// collection and `local_articles` the local one, same schema.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    table: &'static str,
}

impl SqliteStore {
    /// Open (creating if needed) the database file and run migrations.
    pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| Error::Storage(format!("failed to open database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("migration {} failed: {}", i, e)))?;
        }

        Ok(pool)
    }

    pub fn global(pool: SqlitePool) -> Self {
        Self { pool, table: "articles" }
    }

    pub fn local(pool: SqlitePool) -> Self {
        Self { pool, table: "local_articles" }
    }

    fn row_to_article(row: &SqliteRow) -> Result<Article> {
        let published_at: String = row.get("published_at");
        let published_at = DateTime::parse_from_rfc3339(&published_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| Error::Storage(format!("bad published_at in row: {}", e)))?;

        let sentiment: String = row.get("sentiment");
        let sentiment = sentiment.parse::<Sentiment>().unwrap_or_default();

        Ok(Article {
            title: row.get("title"),
            source: row.get("source"),
            url: row.get("url"),
            published_at,
            category: row.get("category"),
            sentiment,
            location: row.get("location"),
        })
    }
}

#[async_trait]
impl ArticleStore for SqliteStore {
    async fn exists(&self, url: &str) -> Result<bool> {
        let sql = format!("SELECT 1 FROM {} WHERE url = ?", self.table);
        let row = sqlx::query(&sql)
            .bind(url)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;
        Ok(row.is_some())
    }

    async fn get_or_create(&self, article: Article) -> Result<(Article, bool)> {
        // Conflict on url is the dedup path, absorbed as a no-op
        let sql = format!(
            "INSERT INTO {} (url, title, source, published_at, category, sentiment, location) \
             VALUES (?, ?, ?, ?, ?, ?, ?) ON CONFLICT(url) DO NOTHING",
            self.table
        );
        let inserted = sqlx::query(&sql)
            .bind(&article.url)
            .bind(&article.title)
            .bind(&article.source)
            .bind(article.published_at.to_rfc3339())
            .bind(&article.category)
            .bind(article.sentiment.as_str())
            .bind(&article.location)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;
        let created = inserted.rows_affected() > 0;

        let sql = format!("SELECT * FROM {} WHERE url = ?", self.table);
        let row = sqlx::query(&sql)
            .bind(&article.url)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;

        Ok((Self::row_to_article(&row)?, created))
    }

    async fn all(&self) -> Result<Vec<Article>> {
        let sql = format!("SELECT * FROM {}", self.table);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;
        rows.iter().map(Self::row_to_article).collect()
    }

    async fn list(&self, filter: &ArticleFilter) -> Result<Vec<Article>> {
        let mut sql = format!("SELECT * FROM {} WHERE 1 = 1", self.table);
        if filter.category.is_some() {
            sql.push_str(" AND category = ?");
        }
        if filter.sentiment.is_some() {
            sql.push_str(" AND sentiment = ?");
        }
        sql.push_str(" ORDER BY published_at DESC");

        let mut query = sqlx::query(&sql);
        if let Some(ref category) = filter.category {
            query = query.bind(category);
        }
        if let Some(sentiment) = filter.sentiment {
            query = query.bind(sentiment.as_str());
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;
        rows.iter().map(Self::row_to_article).collect()
    }

    async fn bulk_update_sentiment(&self, updates: &[(String, Sentiment)]) -> Result<usize> {
        let sql = format!(
            "UPDATE {} SET sentiment = ? WHERE url = ? AND sentiment <> ?",
            self.table
        );
        let mut touched = 0usize;
        for (url, sentiment) in updates {
            let result = sqlx::query(&sql)
                .bind(sentiment.as_str())
                .bind(url)
                .bind(sentiment.as_str())
                .execute(&self.pool)
                .await
                .map_err(|e| Error::Storage(e.to_string()))?;
            touched += result.rows_affected() as usize;
        }
        Ok(touched)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        // RFC 3339 UTC strings compare lexicographically in timestamp order
        let sql = format!("DELETE FROM {} WHERE published_at < ?", self.table);
        let result = sqlx::query(&sql)
            .bind(cutoff.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;
        Ok(result.rows_affected() as usize)
    }
}
