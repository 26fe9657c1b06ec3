//! Comment, reply, and like endpoints
//!
//! These endpoints permit anonymous interaction: the caller identity is
//! taken from the Authorization header when present, falling back to a
//! `userId` field in the request body, falling back to a minted identity.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;

use super::dto::{ApiEnvelope, CommentView, LikeToggleView, ReplyView};
use crate::AppState;
use crate::auth::MaybeUser;
use crate::data::LikeTarget;
use crate::error::AppError;
use crate::service::{CommentService, LikeService};

#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "userName")]
    pub user_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "userName")]
    pub user_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LikeRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

fn caller_id<'a>(header_user: &'a Option<String>, body_user: &'a Option<String>) -> Option<&'a str> {
    header_user.as_deref().or(body_user.as_deref())
}

/// POST /videos/:videoId/comments
pub async fn add_comment(
    State(state): State<AppState>,
    MaybeUser(header_user): MaybeUser,
    Path(video_id): Path<String>,
    Json(request): Json<AddCommentRequest>,
) -> Result<(StatusCode, Json<ApiEnvelope<CommentView>>), AppError> {
    let service = CommentService::new(state.db.clone());

    let comment = service
        .add_comment(
            &video_id,
            &request.text,
            caller_id(&header_user, &request.user_id),
            request.user_name.as_deref(),
        )
        .await?;

    let view = CommentView::from_comment(&comment, 0);
    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::new(201, view, "Comment added successfully")),
    ))
}

/// GET /videos/:videoId/comments
pub async fn get_comments(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<Json<ApiEnvelope<Vec<CommentView>>>, AppError> {
    let service = CommentService::new(state.db.clone());

    let comments = service.get_comments(&video_id).await?;
    let views = comments
        .iter()
        .map(|(comment, reply_count)| CommentView::from_comment(comment, *reply_count))
        .collect();

    Ok(Json(ApiEnvelope::new(
        200,
        views,
        "Comments fetched successfully",
    )))
}

/// POST /comments/:commentId/like
pub async fn like_comment(
    State(state): State<AppState>,
    MaybeUser(header_user): MaybeUser,
    Path(comment_id): Path<String>,
    request: Option<Json<LikeRequest>>,
) -> Result<Json<ApiEnvelope<LikeToggleView>>, AppError> {
    let service = LikeService::new(state.db.clone());
    let body_user = request.map(|Json(r)| r.user_id).unwrap_or_default();

    let toggle = service
        .toggle(
            LikeTarget::Comment,
            &comment_id,
            caller_id(&header_user, &body_user),
        )
        .await?;

    let message = if toggle.liked {
        "Comment liked"
    } else {
        "Like removed"
    };
    Ok(Json(ApiEnvelope::new(
        200,
        LikeToggleView {
            liked: toggle.liked,
            likes: toggle.likes,
        },
        message,
    )))
}

/// POST /comments/:commentId/replies
pub async fn reply_to_comment(
    State(state): State<AppState>,
    MaybeUser(header_user): MaybeUser,
    Path(comment_id): Path<String>,
    Json(request): Json<ReplyRequest>,
) -> Result<(StatusCode, Json<ApiEnvelope<ReplyView>>), AppError> {
    let service = CommentService::new(state.db.clone());

    let reply = service
        .reply_to_comment(
            &comment_id,
            &request.message,
            caller_id(&header_user, &request.user_id),
            request.user_name.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::new(
            201,
            ReplyView::from_reply(&reply),
            "Reply added successfully",
        )),
    ))
}

/// GET /comments/:commentId/replies
pub async fn get_replies(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> Result<Json<ApiEnvelope<Vec<ReplyView>>>, AppError> {
    let service = CommentService::new(state.db.clone());

    let replies = service.get_replies(&comment_id).await?;
    let views = replies.iter().map(ReplyView::from_reply).collect();

    Ok(Json(ApiEnvelope::new(200, views, "Replies fetched")))
}

/// POST /replies/:replyId/like
pub async fn like_reply(
    State(state): State<AppState>,
    MaybeUser(header_user): MaybeUser,
    Path(reply_id): Path<String>,
    request: Option<Json<LikeRequest>>,
) -> Result<Json<ApiEnvelope<LikeToggleView>>, AppError> {
    let service = LikeService::new(state.db.clone());
    let body_user = request.map(|Json(r)| r.user_id).unwrap_or_default();

    let toggle = service
        .toggle(
            LikeTarget::Reply,
            &reply_id,
            caller_id(&header_user, &body_user),
        )
        .await?;

    let message = if toggle.liked {
        "Reply liked"
    } else {
        "Like removed"
    };
    Ok(Json(ApiEnvelope::new(
        200,
        LikeToggleView {
            liked: toggle.liked,
            likes: toggle.likes,
        },
        message,
    )))
}
