//! Identity resolution
//!
//! Resolves a caller-supplied (or absent) user identifier into the
//! display identity stamped onto authored content. Resolution always
//! succeeds; a missing user record falls back to "Anonymous".

use std::sync::Arc;

use crate::data::{Database, EntityId};
use crate::error::AppError;

/// Display identity resolved for an interaction
#[derive(Debug, Clone)]
pub struct ResolvedIdentity {
    /// Effective user ID (supplied or freshly minted)
    pub user_id: String,
    pub display_name: String,
    pub avatar: String,
}

/// Identity resolver
pub struct IdentityResolver {
    db: Arc<Database>,
}

impl IdentityResolver {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Resolve the effective caller identifier
    ///
    /// When no identifier is supplied a fresh one is minted, permitting
    /// anonymous interaction. Whether anonymous writes should survive to
    /// production is a product decision; the behavior is preserved as-is
    /// and minted identities are logged at debug.
    pub fn effective_user_id(&self, supplied: Option<&str>) -> String {
        match supplied.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => id.to_string(),
            None => {
                let minted = EntityId::new().0;
                tracing::debug!(user_id = %minted, "Minted anonymous caller identity");
                minted
            }
        }
    }

    /// Resolve a full display identity
    ///
    /// The display name prefers the caller-supplied name, then the user
    /// record's profile name, then "Anonymous". The avatar comes from the
    /// user record or falls back to empty.
    pub async fn resolve(
        &self,
        supplied_user_id: Option<&str>,
        supplied_name: Option<&str>,
    ) -> Result<ResolvedIdentity, AppError> {
        let user_id = self.effective_user_id(supplied_user_id);
        let user = self.db.get_user(&user_id).await?;

        let supplied_name = supplied_name.map(str::trim).filter(|s| !s.is_empty());
        let display_name = supplied_name
            .map(ToOwned::to_owned)
            .or_else(|| user.as_ref().map(|u| u.full_name.clone()))
            .unwrap_or_else(|| "Anonymous".to_string());
        let avatar = user.map(|u| u.avatar).unwrap_or_default();

        Ok(ResolvedIdentity {
            user_id,
            display_name,
            avatar,
        })
    }
}
