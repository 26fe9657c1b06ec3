//! Notification service
//!
//! Records notification events for a recipient and exposes read/unread
//! state transitions and deletion. Dispatch is best-effort: it runs after
//! the triggering interaction has committed and its failure is logged,
//! never propagated.

use std::sync::Arc;

use crate::data::{Database, EntityId, Notification, NotificationType};
use crate::error::AppError;
use crate::metrics::NOTIFICATIONS_DISPATCHED_TOTAL;

/// Pagination metadata for notification listings
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub pages: i64,
}

/// Notification service
pub struct NotificationService {
    db: Arc<Database>,
}

impl NotificationService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Record a notification for a recipient
    ///
    /// This is the write half of dispatch; callers that must not fail on
    /// dispatch errors go through [`NotificationService::dispatch`].
    pub async fn record(
        &self,
        recipient: &str,
        title: &str,
        content: &str,
        notification_type: NotificationType,
    ) -> Result<(), AppError> {
        let notification = Notification {
            id: EntityId::new().0,
            owner: recipient.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            notification_type: notification_type.as_str().to_string(),
            is_read: false,
            created_at: chrono::Utc::now(),
        };

        self.db.insert_notification(&notification).await
    }

    /// Fan out a notification without affecting the caller's error channel
    ///
    /// Spawned onto the runtime so it may complete after the triggering
    /// response is returned. The primary mutation must already be durably
    /// committed before this is called; a failed dispatch only loses the
    /// notification.
    pub fn dispatch(
        db: Arc<Database>,
        recipient: String,
        title: String,
        content: String,
        notification_type: NotificationType,
    ) {
        tokio::spawn(async move {
            let service = NotificationService::new(db);
            match service
                .record(&recipient, &title, &content, notification_type)
                .await
            {
                Ok(()) => {
                    NOTIFICATIONS_DISPATCHED_TOTAL
                        .with_label_values(&["ok"])
                        .inc();
                    tracing::debug!(recipient = %recipient, "Notification dispatched");
                }
                Err(error) => {
                    NOTIFICATIONS_DISPATCHED_TOTAL
                        .with_label_values(&["error"])
                        .inc();
                    tracing::warn!(
                        recipient = %recipient,
                        %error,
                        "Failed to dispatch notification"
                    );
                }
            }
        });
    }

    /// List notifications for a recipient, newest first
    pub async fn list(
        &self,
        recipient: &str,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<Notification>, Pagination), AppError> {
        let page = page.max(1);
        let offset = i64::from(page - 1) * i64::from(limit);

        let notifications = self
            .db
            .get_notifications(recipient, i64::from(limit), offset)
            .await?;
        let total = self.db.count_notifications(recipient).await?;
        let pages = (total + i64::from(limit) - 1) / i64::from(limit);

        Ok((
            notifications,
            Pagination {
                total,
                page,
                limit,
                pages,
            },
        ))
    }

    /// Count unread notifications for a recipient
    pub async fn unread_count(&self, recipient: &str) -> Result<i64, AppError> {
        self.db.count_unread_notifications(recipient).await
    }

    /// Mark a notification as read
    ///
    /// Fails with NotFound if the notification does not exist or is owned
    /// by a different recipient.
    pub async fn mark_read(&self, recipient: &str, id: &str) -> Result<Notification, AppError> {
        self.db
            .mark_notification_read(recipient, id)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Mark all notifications as read for a recipient
    pub async fn mark_all_read(&self, recipient: &str) -> Result<(), AppError> {
        self.db.mark_all_notifications_read(recipient).await
    }

    /// Delete a notification, with the same ownership check as mark_read
    pub async fn delete(&self, recipient: &str, id: &str) -> Result<(), AppError> {
        if !self.db.delete_notification(recipient, id).await? {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// Delete all notifications for a recipient
    pub async fn delete_all(&self, recipient: &str) -> Result<(), AppError> {
        self.db.delete_all_notifications(recipient).await
    }
}
