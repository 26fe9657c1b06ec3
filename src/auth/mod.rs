//! Caller identity extraction
//!
//! Authentication itself is an external collaborator: by the time a
//! request reaches this service, real credentials have been resolved to
//! an opaque subject carried in the Authorization header. This module
//! only extracts that subject.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};

use crate::error::AppError;

fn extract_subject_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

/// Extractor for the authenticated caller
///
/// Rejects with 401 when no subject is present. Use on endpoints the
/// contract marks as requiring auth.
///
/// # Usage
/// ```ignore
/// async fn handler(
///     CurrentUser(user_id): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}", user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let subject =
            extract_subject_from_headers(&parts.headers).ok_or(AppError::Unauthorized)?;
        Ok(CurrentUser(subject))
    }
}

/// Optional caller extractor
///
/// Returns None if not authenticated, instead of error. Used on the
/// endpoints that permit anonymous interaction.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(extract_subject_from_headers(&parts.headers)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_subject_is_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            HeaderValue::from_static("Bearer 01ARZ3NDEKTSV4RRFFQ69G5FAV"),
        );
        assert_eq!(
            extract_subject_from_headers(&headers).as_deref(),
            Some("01ARZ3NDEKTSV4RRFFQ69G5FAV")
        );
    }

    #[test]
    fn missing_or_empty_subject_is_none() {
        assert_eq!(extract_subject_from_headers(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer "));
        assert_eq!(extract_subject_from_headers(&headers), None);
    }

    #[test]
    fn non_bearer_scheme_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Basic abc123"));
        assert_eq!(extract_subject_from_headers(&headers), None);
    }
}
