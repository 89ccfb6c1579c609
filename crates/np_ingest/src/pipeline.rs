use chrono::{Duration, Utc};
use np_core::{ArticleStore, Result};
use serde::Serialize;
use tracing::info;

use crate::ingestor::{IngestReport, NewsIngestor};

/// One full ingest-and-enrich cycle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CycleReport {
    pub ingest: IngestReport,
    pub sentiment_changes: usize,
}

/// Fetch global headlines, then rerun the sentiment pass over both
/// collections. Plain operation; scheduling is the caller's business.
pub async fn run_global_cycle(ingestor: &NewsIngestor) -> Result<CycleReport> {
    let ingest = ingestor.fetch_global().await?;
    let sentiment_changes =
        np_sentiment::classify_all(ingestor.global_store(), ingestor.local_store()).await?;
    Ok(CycleReport {
        ingest,
        sentiment_changes,
    })
}

/// Fetch local headlines for a coordinate pair, then rerun the sentiment
/// pass over both collections.
pub async fn run_local_cycle(
    ingestor: &NewsIngestor,
    lat: f64,
    lon: f64,
) -> Result<CycleReport> {
    let ingest = ingestor.fetch_local(lat, lon).await?;
    let sentiment_changes =
        np_sentiment::classify_all(ingestor.global_store(), ingestor.local_store()).await?;
    Ok(CycleReport {
        ingest,
        sentiment_changes,
    })
}

/// Drop records older than the retention threshold from both collections.
pub async fn run_retention_sweep(
    global: &dyn ArticleStore,
    local: &dyn ArticleStore,
    max_age_days: i64,
) -> Result<usize> {
    let cutoff = Utc::now() - Duration::days(max_age_days);
    let removed = global.delete_older_than(cutoff).await? + local.delete_older_than(cutoff).await?;
    info!(removed, max_age_days, "retention sweep complete");
    Ok(removed)
}
