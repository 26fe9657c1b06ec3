//! Data models
//!
//! Rust structs representing database entities.
//! All models use ULID for IDs and chrono for timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// ID Types
// =============================================================================

/// Entity ID wrapper (ULID format, 26 characters)
///
/// Example: "01ARZ3NDEKTSV4RRFFQ69G5FAV"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Generate a new ULID
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// Create from existing string
    pub fn from_string(s: String) -> Self {
        Self(s)
    }

    /// Check whether a string is a well-formed entity ID
    pub fn is_valid(s: &str) -> bool {
        ulid::Ulid::from_string(s).is_ok()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// External entities (users, videos)
// =============================================================================

/// A platform user
///
/// Owned by the external account service. The interaction core only
/// reads `full_name` and `avatar` to stamp authored content.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

/// A video
///
/// Owned by the external upload/transcoding pipeline. The interaction
/// core increments `comments_count` and reads `owner`/`title` when
/// building notification text.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Video {
    pub id: String,
    pub owner: String,
    pub title: String,
    pub thumbnail: String,
    pub views: i64,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Comments and replies
// =============================================================================

/// A comment on a video
///
/// `user_name`/`user_avatar` are a denormalized author snapshot captured
/// at creation time and never refreshed. `likes` is a denormalized count
/// maintained by the like toggle.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: String,
    pub video_id: String,
    pub owner: String,
    pub user_name: String,
    pub user_avatar: String,
    pub content: String,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
}

/// A reply to a comment
///
/// `video_id` is copied from the parent comment at creation for
/// denormalized scoping.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentReply {
    pub id: String,
    pub comment_id: String,
    pub video_id: String,
    pub owner: String,
    pub user_name: String,
    pub user_avatar: String,
    pub message: String,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
}

/// Which kind of entity a like applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Comment,
    Reply,
}

impl LikeTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::Reply => "reply",
        }
    }
}

/// Outcome of a like toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeToggle {
    /// true if the toggle ended in the liked state
    pub liked: bool,
    /// The target's like count after the toggle
    pub likes: i64,
}

// =============================================================================
// Notifications
// =============================================================================

/// Notification for user interactions
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: String,
    /// Recipient user ID
    pub owner: String,
    pub title: String,
    pub content: String,
    /// Type: like, comment, reply, subscription, other
    pub notification_type: String,
    /// Whether the recipient has seen this
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Notification types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationType {
    Like,
    Comment,
    Reply,
    Subscription,
    Other,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Comment => "comment",
            Self::Reply => "reply",
            Self::Subscription => "subscription",
            Self::Other => "other",
        }
    }
}

// =============================================================================
// Watch history
// =============================================================================

/// A watch-history entry
///
/// Unique per (user, video); repeat views refresh `watched_at` instead of
/// appending a new row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WatchHistoryEntry {
    pub id: String,
    pub user_id: String,
    pub video_id: String,
    pub watched_at: DateTime<Utc>,
}

/// Watch-history row joined with its video summary for display
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WatchHistoryView {
    pub id: String,
    pub video_id: String,
    pub watched_at: DateTime<Utc>,
    pub title: String,
    pub thumbnail: String,
    pub views: i64,
    pub owner: String,
}
