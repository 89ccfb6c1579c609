use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use np_core::{Article, ArticleFilter, ArticleStore, Sentiment};
use np_ingest::{run_global_cycle, run_local_cycle, CycleReport};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::AppState;

#[derive(Debug)]
pub struct ApiError(np_core::Error);

impl From<np_core::Error> for ApiError {
    fn from(e: np_core::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub sentiment: Option<String>,
}

impl ListParams {
    /// `None` when the sentiment value matches nothing that can be stored,
    /// so the listing comes back empty instead of erroring.
    fn to_filter(&self) -> Option<ArticleFilter> {
        let sentiment = match self.sentiment.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => Some(raw.parse::<Sentiment>().ok()?),
            None => None,
        };
        Some(ArticleFilter {
            category: self.category.clone().filter(|c| !c.is_empty()),
            sentiment,
        })
    }
}

async fn list_from(
    store: &dyn ArticleStore,
    params: &ListParams,
) -> Result<Json<Vec<Article>>, ApiError> {
    let filter = match params.to_filter() {
        Some(filter) => filter,
        None => return Ok(Json(vec![])),
    };
    Ok(Json(store.list(&filter).await?))
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Article>>, ApiError> {
    list_from(state.global_store.as_ref(), &params).await
}

pub async fn list_local_articles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Article>>, ApiError> {
    list_from(state.local_store.as_ref(), &params).await
}

#[derive(Debug, Serialize)]
pub struct Meta {
    pub categories: Vec<String>,
    pub sentiments: Vec<String>,
}

/// Distinct categories and sentiments present in the global collection,
/// for filter dropdowns.
pub async fn meta(State(state): State<Arc<AppState>>) -> Result<Json<Meta>, ApiError> {
    let articles = state.global_store.all().await?;
    let categories: BTreeSet<String> = articles.iter().map(|a| a.category.clone()).collect();
    let sentiments: BTreeSet<String> = articles
        .iter()
        .map(|a| a.sentiment.as_str().to_string())
        .collect();
    Ok(Json(Meta {
        categories: categories.into_iter().collect(),
        sentiments: sentiments.into_iter().collect(),
    }))
}

/// Coordinates arrive as raw strings so a bad value can be reported
/// without blocking the global refresh.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

enum CoordInput {
    Absent,
    Invalid,
    Pair(f64, f64),
}

fn parse_coords(params: &RefreshParams) -> CoordInput {
    match (params.lat.as_deref(), params.lon.as_deref()) {
        (None, None) => CoordInput::Absent,
        (Some(lat), Some(lon)) => match (lat.parse::<f64>(), lon.parse::<f64>()) {
            (Ok(lat), Ok(lon)) => CoordInput::Pair(lat, lon),
            _ => CoordInput::Invalid,
        },
        _ => CoordInput::Invalid,
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub global: CycleReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<CycleReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RefreshParams>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let global = run_global_cycle(&state.ingestor).await?;

    let (local, message) = match parse_coords(&params) {
        CoordInput::Absent => (None, None),
        CoordInput::Invalid => (
            None,
            Some("latitude and longitude must both be numeric".to_string()),
        ),
        CoordInput::Pair(lat, lon) => (
            Some(run_local_cycle(&state.ingestor, lat, lon).await?),
            None,
        ),
    };

    Ok(Json(RefreshResponse {
        global,
        local,
        message,
    }))
}
