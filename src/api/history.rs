//! Watch-history endpoints

use axum::{
    extract::{Path, Query, State},
    response::Json,
};

use super::dto::{ApiEnvelope, WatchHistoryItemView, WatchHistoryListView};
use super::notifications::PageParams;
use crate::AppState;
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::service::WatchHistoryService;

/// POST /watch-history/:videoId
pub async fn add_to_history(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(video_id): Path<String>,
) -> Result<Json<ApiEnvelope<serde_json::Value>>, AppError> {
    let service = WatchHistoryService::new(state.db.clone());

    service.record_view(&user_id, &video_id).await?;

    Ok(Json(ApiEnvelope::new(
        200,
        serde_json::json!({}),
        "Added to watch history",
    )))
}

/// GET /watch-history?page&limit
pub async fn get_history(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<ApiEnvelope<WatchHistoryListView>>, AppError> {
    let service = WatchHistoryService::new(state.db.clone());

    let page = params.page.unwrap_or(1).max(1);
    let limit = params
        .limit
        .unwrap_or(state.config.pagination.history_limit)
        .clamp(1, state.config.pagination.max_limit);

    let (entries, total) = service.list(&user_id, page, limit).await?;

    let view = WatchHistoryListView {
        data: entries.iter().map(WatchHistoryItemView::from).collect(),
        total,
    };

    Ok(Json(ApiEnvelope::new(200, view, "Watch history fetched")))
}

/// DELETE /watch-history/:videoId
pub async fn remove_from_history(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(video_id): Path<String>,
) -> Result<Json<ApiEnvelope<serde_json::Value>>, AppError> {
    let service = WatchHistoryService::new(state.db.clone());

    service.remove_entry(&user_id, &video_id).await?;

    Ok(Json(ApiEnvelope::new(
        200,
        serde_json::json!({}),
        "Removed from watch history",
    )))
}

/// DELETE /watch-history
pub async fn clear_history(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ApiEnvelope<serde_json::Value>>, AppError> {
    let service = WatchHistoryService::new(state.db.clone());

    service.clear_all(&user_id).await?;

    Ok(Json(ApiEnvelope::new(
        200,
        serde_json::json!({}),
        "Watch history cleared",
    )))
}
