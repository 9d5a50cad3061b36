//! Request extractors.

use agora_common::AppError;
use agora_db::visibility::Viewer;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Extractor for endpoints that require an authenticated viewer.
///
/// Yields the verified user id placed in the request extensions by
/// [`crate::middleware::viewer_middleware`]; anonymous requests are
/// rejected with 401.
#[derive(Debug, Clone)]
pub struct AuthViewer(pub String);

impl<S> FromRequestParts<S> for AuthViewer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Viewer>() {
            Some(Viewer::User(user_id)) => Ok(Self(user_id.clone())),
            _ => Err(AppError::Unauthorized),
        }
    }
}

/// Extractor for endpoints where anonymous viewers are allowed.
#[derive(Debug, Clone)]
pub struct MaybeViewer(pub Viewer);

impl<S> FromRequestParts<S> for MaybeViewer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            parts
                .extensions
                .get::<Viewer>()
                .cloned()
                .unwrap_or_default(),
        ))
    }
}
