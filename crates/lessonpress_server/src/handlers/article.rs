//! Article HTTP handlers.

use crate::{error::HttpError, models::article::*, AppError, AppState};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderMap},
    Json,
};
use serde::Deserialize;

/// Optional file selector shared by the read endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileQuery {
    pub file_location: Option<String>,
}

fn request_origin(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Run blocking store work off the async runtime.
async fn run_blocking<T, F>(work: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| AppError::Unexpected(format!("store task failed: {}", err)))?
}

/// Create or update one article.
///
/// # Arguments
/// - `state`: Application state.
/// - `headers`: Request headers; `Origin` feeds the access gate.
/// - `payload`: Save request body.
///
/// # Returns
/// The save descriptor as JSON.
///
/// # Errors
/// Returns an error when access, validation, lookup or the file write fails.
pub async fn save_article(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<SaveResponse>, HttpError> {
    let origin = request_origin(&headers);
    state.saver.check_access(origin.as_deref())?;
    let Json(request) = payload?;

    let saver = state.saver.clone();
    let response = run_blocking(move || saver.save(origin.as_deref(), request)).await?;
    Ok(Json(response))
}

/// List article summaries in file order.
///
/// # Errors
/// Returns an error when access is denied or the source file cannot be read.
pub async fn list_articles(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<FileQuery>,
) -> Result<Json<Vec<ArticleSummary>>, HttpError> {
    state
        .saver
        .check_access(request_origin(&headers).as_deref())?;
    let saver = state.saver.clone();
    let summaries = run_blocking(move || {
        saver
            .store_for(query.file_location.as_deref())?
            .list()
    })
    .await?;
    Ok(Json(summaries))
}

/// Fetch one article by id.
///
/// # Errors
/// Returns `404` for unknown ids, plus the errors of [`list_articles`].
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Query(query): Query<FileQuery>,
) -> Result<Json<ArticleRecord>, HttpError> {
    state
        .saver
        .check_access(request_origin(&headers).as_deref())?;
    let saver = state.saver.clone();
    let record = run_blocking(move || {
        saver
            .store_for(query.file_location.as_deref())?
            .get(&id)
    })
    .await?;
    Ok(Json(record))
}
