//! Reaction endpoints.

use agora_common::AppResult;
use agora_db::entities::reaction::{self, ReactionSubject};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthViewer, MaybeViewer},
    middleware::AppState,
    response::ApiResponse,
};

/// Body for creating a reaction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactBody {
    pub subject_type: ReactionSubject,
    pub subject_id: String,
}

/// Subject selector for removal and listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectParams {
    pub subject_type: ReactionSubject,
    pub subject_id: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    10
}

/// Reaction response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionResponse {
    pub id: String,
    pub user_id: String,
    pub subject_type: ReactionSubject,
    pub subject_id: String,
    pub created_at: String,
}

impl From<reaction::Model> for ReactionResponse {
    fn from(r: reaction::Model) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            subject_type: r.subject_type,
            subject_id: r.subject_id,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// React to a publication or comment.
async fn react(
    AuthViewer(user_id): AuthViewer,
    State(state): State<AppState>,
    Json(body): Json<ReactBody>,
) -> AppResult<ApiResponse<ReactionResponse>> {
    let created = state
        .reaction_service
        .react(&user_id, body.subject_type, &body.subject_id)
        .await?;
    Ok(ApiResponse::ok(created.into()))
}

/// Remove the viewer's reaction.
async fn unreact(
    AuthViewer(user_id): AuthViewer,
    State(state): State<AppState>,
    Query(params): Query<SubjectParams>,
) -> AppResult<ApiResponse<()>> {
    state
        .reaction_service
        .unreact(&user_id, params.subject_type, &params.subject_id)
        .await?;
    Ok(ApiResponse::ok(()))
}

/// One page of reactions on a subject, with the overall total and, for an
/// authenticated viewer, whether they are among the reactors.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionListResponse {
    pub items: Vec<ReactionResponse>,
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_reacted: Option<bool>,
}

/// List reactions on a subject.
async fn list_reactions(
    MaybeViewer(viewer): MaybeViewer,
    State(state): State<AppState>,
    Query(params): Query<SubjectParams>,
) -> AppResult<ApiResponse<ReactionListResponse>> {
    let limit = params.limit.min(100);
    let total = state
        .reaction_service
        .count_for(params.subject_type, &params.subject_id)
        .await?;
    let reactions = state
        .reaction_service
        .list_for(params.subject_type, &params.subject_id, limit, params.offset)
        .await?;

    let has_reacted = match viewer.user_id() {
        Some(user_id) => Some(
            state
                .reaction_service
                .has_reacted(user_id, params.subject_type, &params.subject_id)
                .await?,
        ),
        None => None,
    };

    Ok(ApiResponse::ok(ReactionListResponse {
        items: reactions.into_iter().map(Into::into).collect(),
        total,
        has_reacted,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_reactions).post(react).delete(unreact))
}
