//! Friendship endpoints.

use agora_common::AppResult;
use agora_db::entities::{friendship, user_profile};
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthViewer, middleware::AppState, response::ApiResponse};

/// Friend request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequestBody {
    pub addressee_id: String,
}

/// Body for responding to a pending request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondRequestBody {
    pub requester_id: String,
}

/// Body for blocking a user.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockBody {
    pub user_id: String,
}

/// Friendship edge response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipResponse {
    pub id: String,
    pub requester_id: String,
    pub addressee_id: String,
    pub status: friendship::FriendshipStatus,
    pub created_at: String,
}

impl From<friendship::Model> for FriendshipResponse {
    fn from(f: friendship::Model) -> Self {
        Self {
            id: f.id,
            requester_id: f.requester_id,
            addressee_id: f.addressee_id,
            status: f.status,
            created_at: f.created_at.to_rfc3339(),
        }
    }
}

/// Friend profile response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub friends_count: i32,
    pub posts_count: i32,
}

impl From<user_profile::Model> for ProfileResponse {
    fn from(p: user_profile::Model) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            username: p.username,
            display_name: p.display_name,
            bio: p.bio,
            avatar_url: p.avatar_url,
            friends_count: p.friends_count,
            posts_count: p.posts_count,
        }
    }
}

/// List pagination params.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    10
}

/// Send a friend request.
async fn send_request(
    AuthViewer(user_id): AuthViewer,
    State(state): State<AppState>,
    Json(body): Json<SendRequestBody>,
) -> AppResult<ApiResponse<FriendshipResponse>> {
    let edge = state
        .friendship_service
        .send_request(&user_id, &body.addressee_id)
        .await?;
    Ok(ApiResponse::ok(edge.into()))
}

/// Accept a pending friend request.
async fn accept(
    AuthViewer(user_id): AuthViewer,
    State(state): State<AppState>,
    Json(body): Json<RespondRequestBody>,
) -> AppResult<ApiResponse<FriendshipResponse>> {
    let edge = state
        .friendship_service
        .accept_request(&user_id, &body.requester_id)
        .await?;
    Ok(ApiResponse::ok(edge.into()))
}

/// Reject a pending friend request.
async fn reject(
    AuthViewer(user_id): AuthViewer,
    State(state): State<AppState>,
    Json(body): Json<RespondRequestBody>,
) -> AppResult<ApiResponse<FriendshipResponse>> {
    let edge = state
        .friendship_service
        .reject_request(&user_id, &body.requester_id)
        .await?;
    Ok(ApiResponse::ok(edge.into()))
}

/// Block a user.
async fn block(
    AuthViewer(user_id): AuthViewer,
    State(state): State<AppState>,
    Json(body): Json<BlockBody>,
) -> AppResult<ApiResponse<FriendshipResponse>> {
    let edge = state
        .friendship_service
        .block(&user_id, &body.user_id)
        .await?;
    Ok(ApiResponse::ok(edge.into()))
}

/// Remove an accepted friendship.
async fn unfriend(
    AuthViewer(user_id): AuthViewer,
    State(state): State<AppState>,
    Path(other_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.friendship_service.unfriend(&user_id, &other_id).await?;
    Ok(ApiResponse::ok(()))
}

/// List pending friend requests addressed to the viewer.
async fn incoming_requests(
    AuthViewer(user_id): AuthViewer,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<ApiResponse<Vec<FriendshipResponse>>> {
    let limit = params.limit.min(100);
    let requests = state
        .friendship_service
        .incoming_requests(&user_id, limit, params.offset)
        .await?;
    Ok(ApiResponse::ok(
        requests.into_iter().map(Into::into).collect(),
    ))
}

/// List the viewer's friends.
async fn friends(
    AuthViewer(user_id): AuthViewer,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<ApiResponse<Vec<ProfileResponse>>> {
    let limit = params.limit.min(100);
    let profiles = state
        .friendship_service
        .friends_of(&user_id, limit, params.offset)
        .await?;
    Ok(ApiResponse::ok(
        profiles.into_iter().map(Into::into).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(friends).post(send_request))
        .route("/accept", post(accept))
        .route("/reject", post(reject))
        .route("/block", post(block))
        .route("/requests", get(incoming_requests))
        .route("/{user_id}", delete(unfriend))
}
