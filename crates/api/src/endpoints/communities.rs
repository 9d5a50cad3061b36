//! Community endpoints.

use agora_common::AppResult;
use agora_core::{CommunityResponse, CreateCommunityInput};
use agora_db::entities::community::{self, CommunityCategory};
use agora_db::entities::community_member::{self, MemberRole};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthViewer, MaybeViewer},
    middleware::AppState,
    response::ApiResponse,
};

/// Community list item.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunitySummaryResponse {
    pub id: String,
    pub creator_id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: CommunityCategory,
    pub tags: Option<serde_json::Value>,
    pub image_url: Option<String>,
    pub members_count: i32,
    pub created_at: String,
}

impl From<community::Model> for CommunitySummaryResponse {
    fn from(c: community::Model) -> Self {
        Self {
            id: c.id,
            creator_id: c.creator_id,
            name: c.name,
            description: c.description,
            category: c.category,
            tags: c.tags,
            image_url: c.image_url,
            members_count: c.members_count,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// Community detail with the viewer's membership.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityDetailResponse {
    pub id: String,
    pub creator_id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: CommunityCategory,
    pub tags: Option<serde_json::Value>,
    pub image_url: Option<String>,
    pub members_count: i32,
    pub created_at: String,
    pub is_member: bool,
    pub my_role: Option<MemberRole>,
}

impl From<CommunityResponse> for CommunityDetailResponse {
    fn from(c: CommunityResponse) -> Self {
        Self {
            id: c.id,
            creator_id: c.creator_id,
            name: c.name,
            description: c.description,
            category: c.category,
            tags: c.tags,
            image_url: c.image_url,
            members_count: c.members_count,
            created_at: c.created_at.to_rfc3339(),
            is_member: c.is_member,
            my_role: c.my_role,
        }
    }
}

/// Membership row response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: String,
    pub community_id: String,
    pub user_id: String,
    pub role: MemberRole,
    pub joined_at: String,
}

impl From<community_member::Model> for MemberResponse {
    fn from(m: community_member::Model) -> Self {
        Self {
            id: m.id,
            community_id: m.community_id,
            user_id: m.user_id,
            role: m.role,
            joined_at: m.joined_at.to_rfc3339(),
        }
    }
}

/// Community list params.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub category: Option<CommunityCategory>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// Member list params.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberListParams {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    10
}

/// Create a community.
async fn create_community(
    AuthViewer(user_id): AuthViewer,
    State(state): State<AppState>,
    Json(input): Json<CreateCommunityInput>,
) -> AppResult<ApiResponse<CommunitySummaryResponse>> {
    let created = state.community_service.create(&user_id, input).await?;
    Ok(ApiResponse::ok(created.into()))
}

/// List active communities.
async fn list_communities(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<ApiResponse<Vec<CommunitySummaryResponse>>> {
    let limit = params.limit.min(100);
    let communities = state
        .community_service
        .list(params.category, limit, params.offset)
        .await?;
    Ok(ApiResponse::ok(
        communities.into_iter().map(Into::into).collect(),
    ))
}

/// Get a community with the viewer's membership.
async fn get_community(
    MaybeViewer(viewer): MaybeViewer,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CommunityDetailResponse>> {
    let community = state
        .community_service
        .get_with_membership(&id, &viewer)
        .await?;
    Ok(ApiResponse::ok(community.into()))
}

/// Join a community.
async fn join_community(
    AuthViewer(user_id): AuthViewer,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<MemberResponse>> {
    let member = state.community_service.join(&user_id, &id).await?;
    Ok(ApiResponse::ok(member.into()))
}

/// Leave a community.
async fn leave_community(
    AuthViewer(user_id): AuthViewer,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.community_service.leave(&user_id, &id).await?;
    Ok(ApiResponse::ok(()))
}

/// List members of a community.
async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<MemberListParams>,
) -> AppResult<ApiResponse<Vec<MemberResponse>>> {
    let limit = params.limit.min(100);
    let members = state
        .community_service
        .members(&id, limit, params.offset)
        .await?;
    Ok(ApiResponse::ok(
        members.into_iter().map(Into::into).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_communities).post(create_community))
        .route("/{id}", get(get_community))
        .route("/{id}/join", post(join_community))
        .route("/{id}/leave", post(leave_community))
        .route("/{id}/members", get(list_members))
}
