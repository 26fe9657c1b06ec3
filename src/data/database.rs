//! SQLite database operations
//!
//! All database access goes through this module.
//! Counter updates are always applied SQL-side (`SET x = x + ?`) so that
//! concurrent increments on the same row never lose updates, and the like
//! toggle runs inside a single transaction backed by a unique index on
//! (target, liked_by).

use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Row, Sqlite, SqlitePool};
use std::path::Path;

use super::models::*;
use crate::error::AppError;

/// Database connection pool wrapper.
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    // =========================================================================
    // Connection
    // =========================================================================

    /// Connect to SQLite database
    ///
    /// Creates the database file if it doesn't exist.
    /// Runs pending migrations automatically.
    ///
    /// # Arguments
    /// * `path` - Path to SQLite database file
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        let connection_string = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&connection_string).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
            })?;

        tracing::info!("Database connected and migrated successfully");

        Ok(Self { pool })
    }

    // =========================================================================
    // Users (externally owned, read for identity projection)
    // =========================================================================

    /// Insert or update a user record
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, full_name, avatar, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                full_name = excluded.full_name,
                avatar = excluded.avatar
            "#,
        )
        .bind(&user.id)
        .bind(&user.full_name)
        .bind(&user.avatar)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    // =========================================================================
    // Videos (externally owned, counter + notification text only)
    // =========================================================================

    /// Insert or update a video record
    pub async fn upsert_video(&self, video: &Video) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO videos (id, owner, title, thumbnail, views, comments_count, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                owner = excluded.owner,
                title = excluded.title,
                thumbnail = excluded.thumbnail,
                views = excluded.views
            "#,
        )
        .bind(&video.id)
        .bind(&video.owner)
        .bind(&video.title)
        .bind(&video.thumbnail)
        .bind(video.views)
        .bind(video.comments_count)
        .bind(video.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a video by ID
    pub async fn get_video(&self, id: &str) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<_, Video>("SELECT * FROM videos WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(video)
    }

    /// Apply an atomic delta to a video's comments_count
    ///
    /// Returns the updated count. The arithmetic happens in SQL so
    /// concurrent increments on the same video cannot lose updates.
    pub async fn increment_video_comments_count(
        &self,
        video_id: &str,
        delta: i64,
    ) -> Result<i64, AppError> {
        sqlx::query("UPDATE videos SET comments_count = comments_count + ? WHERE id = ?")
            .bind(delta)
            .bind(video_id)
            .execute(&self.pool)
            .await?;

        let count: i64 = sqlx::query_scalar("SELECT comments_count FROM videos WHERE id = ?")
            .bind(video_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound)?;

        Ok(count)
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Insert a comment
    pub async fn insert_comment(&self, comment: &Comment) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO comments (
                id, video_id, owner, user_name, user_avatar, content, likes, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&comment.id)
        .bind(&comment.video_id)
        .bind(&comment.owner)
        .bind(&comment.user_name)
        .bind(&comment.user_avatar)
        .bind(&comment.content)
        .bind(comment.likes)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a comment by ID
    pub async fn get_comment(&self, id: &str) -> Result<Option<Comment>, AppError> {
        let comment = sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(comment)
    }

    /// Get all comments for a video with their reply counts, newest first
    ///
    /// Reply counts are derived from the comment_replies relation with a
    /// correlated COUNT, avoiding an N+1 per-comment query.
    pub async fn get_comments_for_video(
        &self,
        video_id: &str,
    ) -> Result<Vec<(Comment, i64)>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT c.*,
                   (SELECT COUNT(*) FROM comment_replies r WHERE r.comment_id = c.id) AS reply_count
            FROM comments c
            WHERE c.video_id = ?
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(video_id)
        .fetch_all(&self.pool)
        .await?;

        let mut comments = Vec::with_capacity(rows.len());
        for row in rows {
            let comment = Comment::from_row(&row)?;
            let reply_count: i64 = row.try_get("reply_count")?;
            comments.push((comment, reply_count));
        }

        Ok(comments)
    }

    /// Count replies for a comment
    pub async fn count_replies(&self, comment_id: &str) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM comment_replies WHERE comment_id = ?")
                .bind(comment_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    // =========================================================================
    // Replies
    // =========================================================================

    /// Insert a reply
    pub async fn insert_reply(&self, reply: &CommentReply) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO comment_replies (
                id, comment_id, video_id, owner, user_name, user_avatar, message, likes, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&reply.id)
        .bind(&reply.comment_id)
        .bind(&reply.video_id)
        .bind(&reply.owner)
        .bind(&reply.user_name)
        .bind(&reply.user_avatar)
        .bind(&reply.message)
        .bind(reply.likes)
        .bind(reply.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a reply by ID
    pub async fn get_reply(&self, id: &str) -> Result<Option<CommentReply>, AppError> {
        let reply = sqlx::query_as::<_, CommentReply>("SELECT * FROM comment_replies WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(reply)
    }

    /// Get all replies for a comment, newest first
    pub async fn get_replies_for_comment(
        &self,
        comment_id: &str,
    ) -> Result<Vec<CommentReply>, AppError> {
        let replies = sqlx::query_as::<_, CommentReply>(
            "SELECT * FROM comment_replies WHERE comment_id = ? ORDER BY created_at DESC",
        )
        .bind(comment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(replies)
    }

    // =========================================================================
    // Likes
    // =========================================================================

    /// Toggle a like on a comment or reply
    ///
    /// Runs as one write transaction per (target, user) pair. The
    /// transaction takes its write lock up front (BEGIN IMMEDIATE), so
    /// two concurrent toggles from the same user serialize on SQLite's
    /// busy timeout rather than deadlocking on a lock upgrade:
    /// 1. Verify the target exists.
    /// 2. Try to insert a like row; the unique index on (target, liked_by)
    ///    turns a racing duplicate insert into a no-op.
    /// 3. If a row was inserted, increment the target's likes; otherwise
    ///    delete the existing row and decrement, clamped at zero.
    /// 4. Read the updated count inside the same transaction.
    pub async fn toggle_like(
        &self,
        target: LikeTarget,
        target_id: &str,
        user_id: &str,
    ) -> Result<LikeToggle, AppError> {
        let mut conn = self.pool.acquire().await?;

        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;

        let result = Self::toggle_like_locked(&mut conn, target, target_id, user_id).await;

        match result {
            Ok(toggle) => {
                sqlx::query("COMMIT").execute(&mut *conn).await?;
                Ok(toggle)
            }
            Err(error) => {
                if let Err(rollback_error) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
                    tracing::error!(%rollback_error, "Failed to roll back like toggle");
                }
                Err(error)
            }
        }
    }

    async fn toggle_like_locked(
        conn: &mut sqlx::SqliteConnection,
        target: LikeTarget,
        target_id: &str,
        user_id: &str,
    ) -> Result<LikeToggle, AppError> {
        let (like_table, like_column, target_table) = match target {
            LikeTarget::Comment => ("comment_likes", "comment_id", "comments"),
            LikeTarget::Reply => ("reply_likes", "reply_id", "comment_replies"),
        };

        let exists: Option<i64> =
            sqlx::query_scalar(&format!("SELECT 1 FROM {} WHERE id = ?", target_table))
                .bind(target_id)
                .fetch_optional(&mut *conn)
                .await?;
        if exists.is_none() {
            return Err(AppError::NotFound);
        }

        let inserted = sqlx::query(&format!(
            "INSERT INTO {} (id, {}, liked_by, created_at) VALUES (?, ?, ?, ?) \
             ON CONFLICT({}, liked_by) DO NOTHING",
            like_table, like_column, like_column
        ))
        .bind(EntityId::new().0)
        .bind(target_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?
        .rows_affected();

        let liked = inserted > 0;

        if liked {
            sqlx::query(&format!(
                "UPDATE {} SET likes = likes + 1 WHERE id = ?",
                target_table
            ))
            .bind(target_id)
            .execute(&mut *conn)
            .await?;
        } else {
            sqlx::query(&format!(
                "DELETE FROM {} WHERE {} = ? AND liked_by = ?",
                like_table, like_column
            ))
            .bind(target_id)
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

            sqlx::query(&format!(
                "UPDATE {} SET likes = MAX(likes - 1, 0) WHERE id = ?",
                target_table
            ))
            .bind(target_id)
            .execute(&mut *conn)
            .await?;
        }

        let likes: i64 = sqlx::query_scalar(&format!(
            "SELECT likes FROM {} WHERE id = ?",
            target_table
        ))
        .bind(target_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(LikeToggle { liked, likes })
    }

    /// Count like rows for a target
    ///
    /// Used by tests to check the like rows always match the denormalized
    /// counter when no toggle is in flight.
    pub async fn count_likes(&self, target: LikeTarget, target_id: &str) -> Result<i64, AppError> {
        let (like_table, like_column) = match target {
            LikeTarget::Comment => ("comment_likes", "comment_id"),
            LikeTarget::Reply => ("reply_likes", "reply_id"),
        };

        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {} WHERE {} = ?",
            like_table, like_column
        ))
        .bind(target_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Insert notification
    pub async fn insert_notification(&self, notification: &Notification) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO notifications (
                id, owner, title, content, notification_type, is_read, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&notification.id)
        .bind(&notification.owner)
        .bind(&notification.title)
        .bind(&notification.content)
        .bind(&notification.notification_type)
        .bind(notification.is_read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get notifications for a recipient (paginated, newest first)
    pub async fn get_notifications(
        &self,
        owner: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, AppError> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE owner = ? ORDER BY created_at DESC LIMIT ? OFFSET ?",
        )
        .bind(owner)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    /// Count all notifications for a recipient
    pub async fn count_notifications(&self, owner: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE owner = ?")
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Count unread notifications for a recipient
    pub async fn count_unread_notifications(&self, owner: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE owner = ? AND is_read = 0",
        )
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Mark a notification as read, scoped to its owner
    ///
    /// Returns the updated notification, or None if it does not exist or
    /// belongs to a different recipient.
    pub async fn mark_notification_read(
        &self,
        owner: &str,
        id: &str,
    ) -> Result<Option<Notification>, AppError> {
        let updated = sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ? AND owner = ?")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if updated == 0 {
            return Ok(None);
        }

        let notification =
            sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(notification)
    }

    /// Mark all notifications as read for a recipient
    pub async fn mark_all_notifications_read(&self, owner: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE notifications SET is_read = 1 WHERE owner = ?")
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a notification, scoped to its owner
    ///
    /// Returns false if it does not exist or belongs to a different recipient.
    pub async fn delete_notification(&self, owner: &str, id: &str) -> Result<bool, AppError> {
        let deleted = sqlx::query("DELETE FROM notifications WHERE id = ? AND owner = ?")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    /// Delete all notifications for a recipient
    pub async fn delete_all_notifications(&self, owner: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM notifications WHERE owner = ?")
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // =========================================================================
    // Watch history
    // =========================================================================

    /// Record a view, refreshing the timestamp on repeat views
    ///
    /// The unique index on (user_id, video_id) makes this an upsert; a
    /// repeat view moves the entry to the top of recency ordering rather
    /// than duplicating it.
    pub async fn upsert_watch_history(
        &self,
        user_id: &str,
        video_id: &str,
        watched_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO watch_history (id, user_id, video_id, watched_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id, video_id) DO UPDATE SET watched_at = excluded.watched_at
            "#,
        )
        .bind(EntityId::new().0)
        .bind(user_id)
        .bind(video_id)
        .bind(watched_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get watch history with joined video summaries, most recent first
    pub async fn get_watch_history(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WatchHistoryView>, AppError> {
        let entries = sqlx::query_as::<_, WatchHistoryView>(
            r#"
            SELECT h.id, h.video_id, h.watched_at,
                   v.title, v.thumbnail, v.views, v.owner
            FROM watch_history h
            JOIN videos v ON v.id = h.video_id
            WHERE h.user_id = ?
            ORDER BY h.watched_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Count watch-history entries for a user
    pub async fn count_watch_history(&self, user_id: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM watch_history WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Remove a single watch-history entry
    pub async fn delete_watch_history_entry(
        &self,
        user_id: &str,
        video_id: &str,
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM watch_history WHERE user_id = ? AND video_id = ?")
            .bind(user_id)
            .bind(video_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Clear all watch history for a user
    pub async fn clear_watch_history(&self, user_id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM watch_history WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
