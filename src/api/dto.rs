//! API response DTOs
//!
//! Every response is wrapped in the `{statusCode, data, message}`
//! envelope the clients expect. View structs carry the display
//! projection of entities (author snapshot, avatar fallback, calendar
//! date) rather than raw rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::{Comment, CommentReply, Notification, WatchHistoryView};
use crate::service::Pagination;

/// Standard response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub data: T,
    pub message: String,
}

impl<T> ApiEnvelope<T> {
    pub fn new(status_code: u16, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code,
            data,
            message: message.into(),
        }
    }
}

fn avatar_fallback(name: &str, default: char) -> String {
    name.chars()
        .next()
        .unwrap_or(default)
        .to_string()
}

fn calendar_date(timestamp: DateTime<Utc>) -> String {
    timestamp.date_naive().to_string()
}

/// Comment as displayed to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: String,
    /// Display name of the author snapshot
    pub user: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Avatar URL from the author snapshot
    pub profile: String,
    /// Single-character avatar fallback
    pub avatar: String,
    /// Creation date (calendar-date granularity)
    pub time: String,
    pub text: String,
    pub likes: i64,
    /// Reply count, derived from the replies relation
    pub replies: i64,
}

impl CommentView {
    pub fn from_comment(comment: &Comment, reply_count: i64) -> Self {
        let user = if comment.user_name.is_empty() {
            "Anonymous".to_string()
        } else {
            comment.user_name.clone()
        };
        Self {
            id: comment.id.clone(),
            avatar: avatar_fallback(&user, 'A'),
            user,
            user_id: comment.owner.clone(),
            profile: comment.user_avatar.clone(),
            time: calendar_date(comment.created_at),
            text: comment.content.clone(),
            likes: comment.likes,
            replies: reply_count,
        }
    }
}

/// Reply as displayed to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyView {
    pub id: String,
    pub user: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub profile: String,
    pub avatar: String,
    pub message: String,
    pub likes: i64,
    pub time: String,
}

impl ReplyView {
    pub fn from_reply(reply: &CommentReply) -> Self {
        let user = if reply.user_name.is_empty() {
            "Anonymous".to_string()
        } else {
            reply.user_name.clone()
        };
        Self {
            id: reply.id.clone(),
            avatar: avatar_fallback(&user, 'U'),
            user,
            user_id: reply.owner.clone(),
            profile: reply.user_avatar.clone(),
            message: reply.message.clone(),
            likes: reply.likes,
            time: calendar_date(reply.created_at),
        }
    }
}

/// Outcome of a like toggle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeToggleView {
    pub liked: bool,
    pub likes: i64,
}

/// Notification as displayed to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationView {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub notification_type: String,
    #[serde(rename = "isRead")]
    pub is_read: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<&Notification> for NotificationView {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id.clone(),
            title: notification.title.clone(),
            content: notification.content.clone(),
            notification_type: notification.notification_type.clone(),
            is_read: notification.is_read,
            created_at: notification.created_at,
        }
    }
}

/// Pagination block for notification listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationView {
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub pages: i64,
}

impl From<Pagination> for PaginationView {
    fn from(pagination: Pagination) -> Self {
        Self {
            total: pagination.total,
            page: pagination.page,
            limit: pagination.limit,
            pages: pagination.pages,
        }
    }
}

/// Notification listing payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationListView {
    pub notifications: Vec<NotificationView>,
    pub pagination: PaginationView,
}

/// Video summary joined onto watch-history entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSummaryView {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub views: i64,
    pub owner: String,
}

/// Watch-history entry as displayed to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchHistoryItemView {
    pub id: String,
    pub video: VideoSummaryView,
    #[serde(rename = "watchedAt")]
    pub watched_at: DateTime<Utc>,
}

impl From<&WatchHistoryView> for WatchHistoryItemView {
    fn from(entry: &WatchHistoryView) -> Self {
        Self {
            id: entry.id.clone(),
            video: VideoSummaryView {
                id: entry.video_id.clone(),
                title: entry.title.clone(),
                thumbnail: entry.thumbnail.clone(),
                views: entry.views,
                owner: entry.owner.clone(),
            },
            watched_at: entry.watched_at,
        }
    }
}

/// Watch-history listing payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchHistoryListView {
    pub data: Vec<WatchHistoryItemView>,
    pub total: i64,
}
