//! Comment service
//!
//! Creates comments on videos and replies on comments, keeps the video's
//! denormalized comments_count in step, and triggers notification fan-out
//! after the primary write has committed.

use std::sync::Arc;

use crate::data::{Comment, CommentReply, Database, EntityId, NotificationType};
use crate::error::AppError;
use crate::metrics::INTERACTIONS_TOTAL;
use crate::service::identity::{IdentityResolver, ResolvedIdentity};
use crate::service::notification::NotificationService;

/// Comment service
pub struct CommentService {
    db: Arc<Database>,
    identity: IdentityResolver,
}

/// Actor name used in notification text
///
/// The author snapshot falls back to "Anonymous" for display, but
/// notification copy reads better with "Someone".
fn notification_actor(identity: &ResolvedIdentity) -> &str {
    if identity.display_name == "Anonymous" {
        "Someone"
    } else {
        &identity.display_name
    }
}

impl CommentService {
    pub fn new(db: Arc<Database>) -> Self {
        let identity = IdentityResolver::new(db.clone());
        Self { db, identity }
    }

    /// Add a comment to a video
    ///
    /// Increments the video's comments_count and dispatches a
    /// comment-type notification to the video owner. The notification is
    /// fire-and-forget: the comment is durably committed before dispatch
    /// and a dispatch failure never fails the creation.
    pub async fn add_comment(
        &self,
        video_id: &str,
        text: &str,
        caller_user_id: Option<&str>,
        caller_name: Option<&str>,
    ) -> Result<Comment, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("Comment text is required".to_string()));
        }

        let video = self.db.get_video(video_id).await?.ok_or(AppError::NotFound)?;
        let identity = self.identity.resolve(caller_user_id, caller_name).await?;

        let comment = Comment {
            id: EntityId::new().0,
            video_id: video_id.to_string(),
            owner: identity.user_id.clone(),
            user_name: identity.display_name.clone(),
            user_avatar: identity.avatar.clone(),
            content: text.to_string(),
            likes: 0,
            created_at: chrono::Utc::now(),
        };

        self.db.insert_comment(&comment).await?;
        self.db.increment_video_comments_count(video_id, 1).await?;

        INTERACTIONS_TOTAL.with_label_values(&["comment"]).inc();

        NotificationService::dispatch(
            self.db.clone(),
            video.owner,
            format!("{} commented on your video", notification_actor(&identity)),
            format!("\"{}\" has a new comment", video.title),
            NotificationType::Comment,
        );

        Ok(comment)
    }

    /// Get all comments for a video with reply counts, newest first
    pub async fn get_comments(&self, video_id: &str) -> Result<Vec<(Comment, i64)>, AppError> {
        self.db.get_comments_for_video(video_id).await
    }

    /// Reply to a comment
    ///
    /// The reply copies the parent comment's video reference. The parent
    /// comment's owner receives a reply-type notification unless they are
    /// replying to themselves.
    pub async fn reply_to_comment(
        &self,
        comment_id: &str,
        message: &str,
        caller_user_id: Option<&str>,
        caller_name: Option<&str>,
    ) -> Result<CommentReply, AppError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::Validation("Reply message is required".to_string()));
        }

        let comment = self
            .db
            .get_comment(comment_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let identity = self.identity.resolve(caller_user_id, caller_name).await?;

        let reply = CommentReply {
            id: EntityId::new().0,
            comment_id: comment_id.to_string(),
            video_id: comment.video_id.clone(),
            owner: identity.user_id.clone(),
            user_name: identity.display_name.clone(),
            user_avatar: identity.avatar.clone(),
            message: message.to_string(),
            likes: 0,
            created_at: chrono::Utc::now(),
        };

        self.db.insert_reply(&reply).await?;

        INTERACTIONS_TOTAL.with_label_values(&["reply"]).inc();

        if comment.owner != identity.user_id {
            NotificationService::dispatch(
                self.db.clone(),
                comment.owner,
                format!(
                    "{} replied to your comment",
                    notification_actor(&identity)
                ),
                "Your comment has a new reply".to_string(),
                NotificationType::Reply,
            );
        }

        Ok(reply)
    }

    /// Get all replies for a comment, newest first
    pub async fn get_replies(&self, comment_id: &str) -> Result<Vec<CommentReply>, AppError> {
        self.db.get_replies_for_comment(comment_id).await
    }
}
