//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, http::Request, middleware::Next, response::Response};

use agora_core::{
    CommunityService, FeedService, FriendshipService, PublicationService, ReactionService,
};
use agora_db::visibility::Viewer;

/// Header carrying the verified viewer identity, injected by the fronting
/// auth gateway. Requests without it are treated as anonymous.
pub const VIEWER_HEADER: &str = "x-viewer-id";

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub feed_service: FeedService,
    pub publication_service: PublicationService,
    pub friendship_service: FriendshipService,
    pub community_service: CommunityService,
    pub reaction_service: ReactionService,
}

/// Viewer resolution middleware.
///
/// Translates the gateway header into a [`Viewer`] request extension.
/// No authentication happens here; the gateway has already verified the
/// identity it forwards.
pub async fn viewer_middleware(mut req: Request<Body>, next: Next) -> Response {
    let viewer = req
        .headers()
        .get(VIEWER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map_or(Viewer::Anonymous, |id| Viewer::User(id.to_string()));

    req.extensions_mut().insert(viewer);
    next.run(req).await
}
