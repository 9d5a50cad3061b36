//! HTTP API layer for agora.
//!
//! This crate provides the REST API surface:
//!
//! - **Endpoints**: publications (feed), friendships, communities, reactions
//! - **Extractors**: viewer identity (required and optional)
//! - **Middleware**: trusted-header viewer resolution
//!
//! Built on Axum 0.8. The fronting gateway authenticates callers and
//! forwards the verified identity; this crate only authorizes.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{viewer_middleware, AppState, VIEWER_HEADER};
