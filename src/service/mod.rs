//! Service layer
//!
//! Contains business logic separated from HTTP handlers.
//! Services orchestrate database mutations, counter updates,
//! and notification fan-out.

mod comment;
mod history;
mod identity;
mod like;
mod notification;

pub use comment::CommentService;
pub use history::WatchHistoryService;
pub use identity::{IdentityResolver, ResolvedIdentity};
pub use like::LikeService;
pub use notification::{NotificationService, Pagination};
