//! Notification endpoints
//!
//! All notification endpoints require an authenticated caller; the
//! recipient scope is always the caller's own notifications.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;

use super::dto::{ApiEnvelope, NotificationListView, NotificationView};
use crate::AppState;
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::service::NotificationService;

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// GET /notifications?page&limit
pub async fn get_notifications(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<ApiEnvelope<NotificationListView>>, AppError> {
    let service = NotificationService::new(state.db.clone());

    let page = params.page.unwrap_or(1).max(1);
    let limit = params
        .limit
        .unwrap_or(state.config.pagination.notification_limit)
        .clamp(1, state.config.pagination.max_limit);

    let (notifications, pagination) = service.list(&user_id, page, limit).await?;

    let view = NotificationListView {
        notifications: notifications.iter().map(NotificationView::from).collect(),
        pagination: pagination.into(),
    };

    Ok(Json(ApiEnvelope::new(
        200,
        view,
        "Notifications retrieved successfully",
    )))
}

/// GET /notifications/unread-count
pub async fn get_unread_count(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ApiEnvelope<serde_json::Value>>, AppError> {
    let service = NotificationService::new(state.db.clone());

    let unread_count = service.unread_count(&user_id).await?;

    Ok(Json(ApiEnvelope::new(
        200,
        serde_json::json!({ "unreadCount": unread_count }),
        "Unread count retrieved",
    )))
}

/// PATCH /notifications/:id/read
pub async fn mark_as_read(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(notification_id): Path<String>,
) -> Result<Json<ApiEnvelope<NotificationView>>, AppError> {
    let service = NotificationService::new(state.db.clone());

    let notification = service.mark_read(&user_id, &notification_id).await?;

    Ok(Json(ApiEnvelope::new(
        200,
        NotificationView::from(&notification),
        "Notification marked as read",
    )))
}

/// PATCH /notifications/read-all
pub async fn mark_all_as_read(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ApiEnvelope<serde_json::Value>>, AppError> {
    let service = NotificationService::new(state.db.clone());

    service.mark_all_read(&user_id).await?;

    Ok(Json(ApiEnvelope::new(
        200,
        serde_json::json!({}),
        "All notifications marked as read",
    )))
}

/// DELETE /notifications/:id
pub async fn delete_notification(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(notification_id): Path<String>,
) -> Result<Json<ApiEnvelope<serde_json::Value>>, AppError> {
    let service = NotificationService::new(state.db.clone());

    service.delete(&user_id, &notification_id).await?;

    Ok(Json(ApiEnvelope::new(
        200,
        serde_json::json!({}),
        "Notification deleted successfully",
    )))
}

/// DELETE /notifications
pub async fn delete_all_notifications(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ApiEnvelope<serde_json::Value>>, AppError> {
    let service = NotificationService::new(state.db.clone());

    service.delete_all(&user_id).await?;

    Ok(Json(ApiEnvelope::new(
        200,
        serde_json::json!({}),
        "All notifications deleted successfully",
    )))
}
