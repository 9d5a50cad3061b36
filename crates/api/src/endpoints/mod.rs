//! API endpoints.

mod communities;
mod friendships;
mod publications;
mod reactions;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/publications", publications::router())
        .nest("/friendships", friendships::router())
        .nest("/communities", communities::router())
        .nest("/reactions", reactions::router())
}
