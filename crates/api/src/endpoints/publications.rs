//! Publication endpoints.

use agora_common::AppResult;
use agora_core::{CreatePublicationInput, FeedPage, FeedRequest, PublicationView};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::{
    extractors::{AuthViewer, MaybeViewer},
    middleware::AppState,
    response::ApiResponse,
};

/// Get the visibility-scoped feed.
async fn feed(
    MaybeViewer(viewer): MaybeViewer,
    State(state): State<AppState>,
    Query(request): Query<FeedRequest>,
) -> AppResult<ApiResponse<FeedPage>> {
    let page = state.feed_service.get_feed(&viewer, request).await?;
    Ok(ApiResponse::ok(page))
}

/// Get a single publication.
async fn get_publication(
    MaybeViewer(viewer): MaybeViewer,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PublicationView>> {
    let publication = state.publication_service.get(&id, &viewer).await?;
    Ok(ApiResponse::ok(PublicationView::from(publication)))
}

/// Create a publication.
async fn create_publication(
    AuthViewer(user_id): AuthViewer,
    State(state): State<AppState>,
    Json(input): Json<CreatePublicationInput>,
) -> AppResult<ApiResponse<PublicationView>> {
    let created = state.publication_service.create(&user_id, input).await?;
    Ok(ApiResponse::ok(PublicationView::from(created)))
}

/// Soft-delete a publication.
async fn delete_publication(
    AuthViewer(user_id): AuthViewer,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.publication_service.delete(&id, &user_id).await?;
    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(feed).post(create_publication))
        .route("/{id}", get(get_publication).delete(delete_publication))
}
