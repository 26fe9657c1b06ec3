//! API layer
//!
//! HTTP handlers for:
//! - Comments, replies, and likes
//! - Notifications
//! - Watch history
//! - Metrics (Prometheus)

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::AppState;

mod comments;
mod dto;
mod history;
pub mod metrics;
mod notifications;

pub use dto::*;
pub use metrics::metrics_router;

/// Create interaction router (comments, replies, likes)
///
/// These endpoints accept an optional caller identity; listing
/// endpoints are fully public.
pub fn interaction_router() -> Router<AppState> {
    Router::new()
        .route("/videos/:video_id/comments", post(comments::add_comment))
        .route("/videos/:video_id/comments", get(comments::get_comments))
        .route("/comments/:comment_id/like", post(comments::like_comment))
        .route(
            "/comments/:comment_id/replies",
            post(comments::reply_to_comment),
        )
        .route("/comments/:comment_id/replies", get(comments::get_replies))
        .route("/replies/:reply_id/like", post(comments::like_reply))
}

/// Create notification router
///
/// Authentication is enforced by the CurrentUser extractor in handlers.
pub fn notification_router() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(notifications::get_notifications))
        .route(
            "/notifications/unread-count",
            get(notifications::get_unread_count),
        )
        .route(
            "/notifications/read-all",
            patch(notifications::mark_all_as_read),
        )
        .route("/notifications/:id/read", patch(notifications::mark_as_read))
        .route(
            "/notifications/:id",
            delete(notifications::delete_notification),
        )
        .route(
            "/notifications",
            delete(notifications::delete_all_notifications),
        )
}

/// Create watch-history router
pub fn history_router() -> Router<AppState> {
    Router::new()
        .route("/watch-history", get(history::get_history))
        .route("/watch-history/:video_id", post(history::add_to_history))
        .route(
            "/watch-history/:video_id",
            delete(history::remove_from_history),
        )
        .route("/watch-history", delete(history::clear_history))
}
