// HTTP request handlers
use crate::domain::level2::{ProjectMode, ProjectRef, ScanKind, ScanSearchQuery};
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::infrastructure::ndjson_stream::stream_from_receiver;
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, Response},
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Upper bound on periods a single calendar stream may request.
const MAX_CALENDAR_PERIODS: usize = 12;

type ApiResult = Result<Response<Body>, ApiError>;

#[derive(Deserialize)]
pub struct PeriodsQuery {
    pub periods: Option<usize>,
}

#[derive(Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

#[derive(Serialize)]
struct StartView {
    start: NaiveDate,
}

fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("invalid date: {}", raw)))
}

fn parse_project(mode: &str, name: &str) -> Result<ProjectRef, ApiError> {
    let mode: ProjectMode = mode
        .parse()
        .map_err(|e: anyhow::Error| ApiError::BadRequest(e.to_string()))?;
    Ok(ProjectRef::new(mode, name))
}

fn parse_kind(raw: &str) -> Result<ScanKind, ApiError> {
    match raw {
        "scans" => Ok(ScanKind::Scans),
        "failed" => Ok(ScanKind::Failed),
        other => Err(ApiError::BadRequest(format!("unknown scan list: {}", other))),
    }
}

async fn respond<T: Serialize>(headers: &HeaderMap, data: &T) -> ApiResult {
    Ok(json_response(data, accepts_brotli(headers)).await?)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn freqmode_info(headers: HeaderMap, State(state): State<Arc<AppState>>) -> ApiResult {
    respond(&headers, &state.statistics_service.freqmode_info()).await
}

pub async fn calendar_events(
    Path(date): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> ApiResult {
    let date = parse_date(&date)?;
    let events = state.level1_service.calendar_events(date).await?;
    respond(&headers, &events).await
}

pub async fn calendar_start(
    Path(date): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> ApiResult {
    let date = parse_date(&date)?;
    let start = state.level1_service.start_view(date).await?;
    respond(&headers, &StartView { start }).await
}

/// Stream calendar periods as they arrive (progressive loading)
pub async fn stream_calendar(
    Path(date): Path<String>,
    Query(query): Query<PeriodsQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let date = parse_date(&date)?;
    let periods = query
        .periods
        .unwrap_or(state.calendar_periods)
        .clamp(1, MAX_CALENDAR_PERIODS);

    tracing::info!("Streaming {} calendar periods from {}", periods, date);
    let rx = state.level1_service.stream_calendar(date, periods).await;
    Ok(stream_from_receiver(rx))
}

pub async fn day_overview(
    Path(date): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> ApiResult {
    let date = parse_date(&date)?;
    let overview = state.level1_service.day_overview(date).await?;
    respond(&headers, &overview).await
}

pub async fn scan_table(
    Path((date, freqmode)): Path<(String, u32)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> ApiResult {
    let date = parse_date(&date)?;
    let rows = state.level1_service.scan_table(date, freqmode).await?;
    respond(&headers, &rows).await
}

pub async fn scan_plots(
    Path((date, freqmode)): Path<(String, u32)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> ApiResult {
    let date = parse_date(&date)?;
    let plots = state.level1_service.scan_plots(date, freqmode).await?;
    respond(&headers, &plots).await
}

pub async fn project_selector(headers: HeaderMap, State(state): State<Arc<AppState>>) -> ApiResult {
    respond(&headers, &state.level2_service.project_selector().await).await
}

pub async fn freqmode_selector(
    Path((mode, project)): Path<(String, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> ApiResult {
    let project = parse_project(&mode, &project)?;
    respond(&headers, &state.level2_service.freqmode_selector(&project).await).await
}

pub async fn cross_sections(
    Path((mode, project, freqmode, scan_id)): Path<(String, String, u32, u64)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> ApiResult {
    let project = parse_project(&mode, &project)?;
    let sections = state
        .level2_service
        .cross_sections(&project, freqmode, scan_id)
        .await?;
    respond(&headers, &sections).await
}

pub async fn search_scans(
    Path((mode, project, freqmode, kind)): Path<(String, String, u32, String)>,
    Query(query): Query<ScanSearchQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> ApiResult {
    let project = parse_project(&mode, &project)?;
    let kind = parse_kind(&kind)?;
    let result = state
        .level2_service
        .search(&project, freqmode, kind, &query)
        .await?;
    respond(&headers, &result).await
}

/// Map overview of a time and altitude window; `parameter` picks the plotted column
/// and every other query parameter is forwarded to the area endpoint.
pub async fn period_overview(
    Path((mode, project)): Path<(String, String)>,
    Query(mut query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> ApiResult {
    let project = parse_project(&mode, &project)?;
    let parameter = query.remove("parameter").unwrap_or_else(|| "VMR".to_string());
    let mut params: Vec<(String, String)> = query.into_iter().collect();
    params.sort();

    let overview = state
        .level2_service
        .period_overview(&project, &params, &parameter)
        .await?;
    respond(&headers, &overview).await
}

pub async fn statistics(
    Query(query): Query<YearQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> ApiResult {
    let page = state.statistics_service.statistics(query.year).await?;
    respond(&headers, &page).await
}
