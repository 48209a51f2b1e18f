use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::{Date, OffsetDateTime};
use tracing::{error, instrument, warn};

use crate::{auth::AuthUser, config::AnalyticsConfig, state::AppState};

use super::dto::{DailySummary, RangeQuery, WeeklySummary};
use super::error::AnalyticsError;
use super::services::{get_daily_summaries, get_weekly_summaries};

pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/daily", get(daily_summaries))
        .route("/analytics/weekly", get(weekly_summaries))
}

#[instrument(skip(state))]
pub async fn daily_summaries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<RangeQuery>,
) -> Result<Json<Vec<DailySummary>>, (StatusCode, String)> {
    let cfg = &state.config.analytics;
    let (start, end) = q.resolve(today(cfg), cfg).map_err(rejected)?;
    let summaries = get_daily_summaries(state.store.as_ref(), cfg.utc_offset, user_id, start, end)
        .await
        .map_err(|e| failed(e, user_id))?;
    Ok(Json(summaries))
}

#[instrument(skip(state))]
pub async fn weekly_summaries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<RangeQuery>,
) -> Result<Json<Vec<WeeklySummary>>, (StatusCode, String)> {
    let cfg = &state.config.analytics;
    let (start, end) = q.resolve(today(cfg), cfg).map_err(rejected)?;
    let weeks = get_weekly_summaries(state.store.as_ref(), cfg.utc_offset, user_id, start, end)
        .await
        .map_err(|e| failed(e, user_id))?;
    Ok(Json(weeks))
}

fn today(cfg: &AnalyticsConfig) -> Date {
    OffsetDateTime::now_utc().to_offset(cfg.utc_offset).date()
}

fn rejected(e: AnalyticsError) -> (StatusCode, String) {
    warn!(error = %e, "rejected analytics range");
    (e.status(), e.to_string())
}

fn failed(e: AnalyticsError, user_id: uuid::Uuid) -> (StatusCode, String) {
    error!(error = %e, %user_id, "analytics rollup failed");
    (e.status(), e.to_string())
}
