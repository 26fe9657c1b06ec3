//! Watch-history service
//!
//! Records views with upsert semantics (one row per user/video, repeat
//! views refresh the timestamp) and serves paginated recency-ordered
//! listings with joined video summaries.

use std::sync::Arc;

use crate::data::{Database, EntityId, WatchHistoryView};
use crate::error::AppError;

/// Watch-history service
pub struct WatchHistoryService {
    db: Arc<Database>,
}

impl WatchHistoryService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Record a view of a video
    ///
    /// Fails with Validation for a malformed video ID and NotFound when
    /// the video does not exist. A repeat view moves the entry to the top
    /// of recency ordering rather than duplicating it.
    pub async fn record_view(&self, user_id: &str, video_id: &str) -> Result<(), AppError> {
        if !EntityId::is_valid(video_id) {
            return Err(AppError::Validation("Invalid video ID".to_string()));
        }

        if self.db.get_video(video_id).await?.is_none() {
            return Err(AppError::NotFound);
        }

        self.db
            .upsert_watch_history(user_id, video_id, chrono::Utc::now())
            .await
    }

    /// List watch history, most recently watched first
    ///
    /// Returns the page of entries with joined video summaries and the
    /// total entry count.
    pub async fn list(
        &self,
        user_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<WatchHistoryView>, i64), AppError> {
        let page = page.max(1);
        let offset = i64::from(page - 1) * i64::from(limit);

        let entries = self
            .db
            .get_watch_history(user_id, i64::from(limit), offset)
            .await?;
        let total = self.db.count_watch_history(user_id).await?;

        Ok((entries, total))
    }

    /// Remove a single entry
    pub async fn remove_entry(&self, user_id: &str, video_id: &str) -> Result<(), AppError> {
        self.db.delete_watch_history_entry(user_id, video_id).await
    }

    /// Clear all history for a user
    pub async fn clear_all(&self, user_id: &str) -> Result<(), AppError> {
        self.db.clear_watch_history(user_id).await
    }
}
