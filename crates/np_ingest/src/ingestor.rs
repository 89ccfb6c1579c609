use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use np_core::{Article, ArticleStore, Category, Result, Sentiment};
use serde::Serialize;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::gate::RefreshGate;
use crate::providers::{GeoProvider, NewsProvider, RawHeadline};
use crate::resolver::GeoResolver;

/// Query used for the local sweep when reverse geocoding yields nothing.
pub const FALLBACK_LOCAL_QUERY: &str = "local news";

/// Upstream timestamps are fixed-format UTC.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone)]
pub struct IngestorConfig {
    pub language: String,
    pub country: String,
    /// Pause after a failed category before moving to the next one
    pub backoff: Duration,
}

impl Default for IngestorConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            country: "us".to_string(),
            backoff: Duration::from_secs(5),
        }
    }
}

/// Outcome of one sweep. A sweep with failed categories still completed;
/// `suppressed` means the gate was fresh and nothing ran at all.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub suppressed: bool,
    pub fetched: usize,
    pub inserted: usize,
    pub skipped: usize,
    pub failed_categories: Vec<String>,
}

/// Pulls headlines from the news provider and lands them in the stores.
/// One instance drives both the global category sweep and the
/// coordinate-keyed local sweep.
pub struct NewsIngestor {
    news: Arc<dyn NewsProvider>,
    resolver: GeoResolver,
    gate: Arc<RefreshGate>,
    global_store: Arc<dyn ArticleStore>,
    local_store: Arc<dyn ArticleStore>,
    config: IngestorConfig,
}

impl NewsIngestor {
    pub fn new(
        news: Arc<dyn NewsProvider>,
        geo: Arc<dyn GeoProvider>,
        gate: Arc<RefreshGate>,
        global_store: Arc<dyn ArticleStore>,
        local_store: Arc<dyn ArticleStore>,
        config: IngestorConfig,
    ) -> Self {
        Self {
            news,
            resolver: GeoResolver::new(geo),
            gate,
            global_store,
            local_store,
            config,
        }
    }

    pub fn global_store(&self) -> &dyn ArticleStore {
        self.global_store.as_ref()
    }

    pub fn local_store(&self) -> &dyn ArticleStore {
        self.local_store.as_ref()
    }

    /// Sweep top headlines across the seven categories.
    pub async fn fetch_global(&self) -> Result<IngestReport> {
        let scope = RefreshGate::global_scope();
        if self.gate.is_fresh(&scope) {
            info!("global headlines still fresh, skipping sweep");
            return Ok(IngestReport {
                suppressed: true,
                ..IngestReport::default()
            });
        }

        let mut report = IngestReport::default();
        for category in Category::ALL {
            info!(category = %category, "fetching top headlines");
            match self
                .news
                .top_headlines(category.api_value(), &self.config.language, &self.config.country)
                .await
            {
                Ok(items) if !items.is_empty() => {
                    self.store_items(items, self.global_store.as_ref(), category.as_str(), None, &mut report)
                        .await;
                }
                Ok(_) => {
                    warn!(category = %category, "no headlines returned");
                    self.note_failure(category, &mut report).await;
                }
                Err(e) => {
                    warn!(category = %category, error = %e, "category fetch failed");
                    self.note_failure(category, &mut report).await;
                }
            }
        }

        // Marked even when every category came back empty, so a dry
        // upstream does not trigger a retry stampede
        self.gate.mark_fetched(&scope);
        info!(
            inserted = report.inserted,
            skipped = report.skipped,
            failed = report.failed_categories.len(),
            "global sweep complete"
        );
        Ok(report)
    }

    /// Sweep local headlines for a coordinate pair. The gate is keyed by
    /// the rounded input coordinates, not the resolved place.
    pub async fn fetch_local(&self, lat: f64, lon: f64) -> Result<IngestReport> {
        let scope = RefreshGate::local_scope(lat, lon);
        if self.gate.is_fresh(&scope) {
            info!(scope = %scope, "local headlines still fresh, skipping sweep");
            return Ok(IngestReport {
                suppressed: true,
                ..IngestReport::default()
            });
        }

        let place = self
            .resolver
            .resolve(lat, lon)
            .await
            .unwrap_or_else(|| FALLBACK_LOCAL_QUERY.to_string());
        info!(query = %place, "local sweep query resolved");

        let mut report = IngestReport::default();
        for category in Category::ALL {
            // The category labels results here; the query stays the same
            match self.news.everything(&place, &self.config.language).await {
                Ok(items) if !items.is_empty() => {
                    self.store_items(
                        items,
                        self.local_store.as_ref(),
                        category.as_str(),
                        Some(place.as_str()),
                        &mut report,
                    )
                    .await;
                }
                Ok(_) => {
                    warn!(category = %category, query = %place, "no local results returned");
                    self.note_failure(category, &mut report).await;
                }
                Err(e) => {
                    warn!(category = %category, error = %e, "local fetch failed");
                    self.note_failure(category, &mut report).await;
                }
            }
        }

        self.gate.mark_fetched(&scope);
        info!(
            inserted = report.inserted,
            skipped = report.skipped,
            "local sweep complete"
        );
        Ok(report)
    }

    async fn note_failure(&self, category: Category, report: &mut IngestReport) {
        report.failed_categories.push(category.as_str().to_string());
        sleep(self.config.backoff).await;
    }

    async fn store_items(
        &self,
        items: Vec<RawHeadline>,
        store: &dyn ArticleStore,
        category: &str,
        location: Option<&str>,
        report: &mut IngestReport,
    ) {
        for raw in items {
            report.fetched += 1;
            let article = match normalize(raw, category, location) {
                Some(article) => article,
                None => {
                    debug!(category, "skipping unusable headline");
                    report.skipped += 1;
                    continue;
                }
            };
            match store.get_or_create(article).await {
                Ok((_, true)) => report.inserted += 1,
                Ok((_, false)) => {}
                Err(e) => {
                    error!(error = %e, "failed to store headline");
                    report.skipped += 1;
                }
            }
        }
    }
}

fn normalize(raw: RawHeadline, category: &str, location: Option<&str>) -> Option<Article> {
    let title = raw
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())?
        .to_string();
    let url = raw.url.filter(|u| Url::parse(u).is_ok())?;
    let published_at = parse_timestamp(raw.published_at.as_deref()?)?;

    Some(Article {
        title,
        source: raw.source_name.unwrap_or_else(|| "Unknown".to_string()),
        url,
        published_at,
        category: category.to_string(),
        sentiment: Sentiment::default(),
        location: location.map(str::to_string),
    })
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.and_utc())
}
