//! Like service
//!
//! A single idempotent toggle per (target, user) pair rather than
//! separate like/unlike operations. The at-most-one-like invariant is
//! enforced by the database's unique index plus a per-toggle transaction,
//! not by an application-level check.

use std::sync::Arc;

use crate::data::{Database, LikeTarget, LikeToggle};
use crate::error::AppError;
use crate::metrics::INTERACTIONS_TOTAL;
use crate::service::identity::IdentityResolver;

/// Like service
pub struct LikeService {
    db: Arc<Database>,
    identity: IdentityResolver,
}

impl LikeService {
    pub fn new(db: Arc<Database>) -> Self {
        let identity = IdentityResolver::new(db.clone());
        Self { db, identity }
    }

    /// Toggle a like on a comment or reply
    ///
    /// Only the caller's identifier is resolved; no display fields are
    /// needed for a like. Two toggles in sequence from the same user
    /// return to the original state and count.
    pub async fn toggle(
        &self,
        target: LikeTarget,
        target_id: &str,
        caller_user_id: Option<&str>,
    ) -> Result<LikeToggle, AppError> {
        let user_id = self.identity.effective_user_id(caller_user_id);

        let toggle = self.db.toggle_like(target, target_id, &user_id).await?;

        INTERACTIONS_TOTAL.with_label_values(&["like"]).inc();
        tracing::debug!(
            target = target.as_str(),
            target_id,
            liked = toggle.liked,
            likes = toggle.likes,
            "Like toggled"
        );

        Ok(toggle)
    }
}
