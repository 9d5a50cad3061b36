//! Feed service.
//!
//! Orchestrates one feed request end to end: resolve the viewer's friend
//! set, build the visibility filter, run the counted paginated read, and
//! shape the rows for the wire. Each call is stateless; the friend set is
//! read fresh every time, so a friendship change is reflected no later
//! than the next request.

use agora_common::AppResult;
use agora_db::{
    entities::publication::{self, Visibility},
    repositories::{FriendshipRepository, PublicationRepository},
    visibility::{Viewer, VisibilityFilter},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Upper bound on page size. Larger requests are clamped rather than
/// rejected; everything else about pagination is validated strictly.
pub const MAX_PAGE_SIZE: u64 = 100;

const fn default_page() -> u64 {
    1
}

const fn default_page_size() -> u64 {
    10
}

/// Feed query parameters.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeedRequest {
    /// 1-based page number.
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u64,

    /// Items per page.
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1))]
    pub page_size: u64,

    /// Restrict the feed to a single author.
    pub author_id: Option<String>,
}

impl Default for FeedRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            author_id: None,
        }
    }
}

/// Pagination envelope returned with every feed page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Total matching publications across all pages.
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    /// Number of pages at this page size.
    pub page_count: u64,
}

/// Publication as exposed to clients.
///
/// Carries exactly the public surface of a publication. Rows are shaped
/// through this type so internal-only columns can never leak.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationView {
    pub id: String,
    pub author_id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub visibility: Visibility,
    pub like_count: i32,
    pub comment_count: i32,
    pub share_count: i32,
    pub metadata: Option<serde_json::Value>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<publication::Model> for PublicationView {
    fn from(model: publication::Model) -> Self {
        Self {
            id: model.id,
            author_id: model.author_id,
            content: model.content,
            kind: model.kind,
            visibility: model.visibility,
            like_count: model.likes_count,
            comment_count: model.comments_count,
            share_count: model.shares_count,
            metadata: model.metadata,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

/// A single page of the feed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub items: Vec<PublicationView>,
    pub pagination: PageInfo,
}

/// Feed service: resolves which publications a viewer may see and serves
/// them in stable pages.
#[derive(Clone)]
pub struct FeedService {
    publication_repo: PublicationRepository,
    friendship_repo: FriendshipRepository,
}

impl FeedService {
    /// Create a new feed service.
    #[must_use]
    pub const fn new(
        publication_repo: PublicationRepository,
        friendship_repo: FriendshipRepository,
    ) -> Self {
        Self {
            publication_repo,
            friendship_repo,
        }
    }

    /// Resolve one page of the feed for a viewer.
    ///
    /// A nonexistent author filter or a page past the end both yield an
    /// empty page with an accurate total, indistinguishable from a feed
    /// with nothing visible. Storage failures surface as errors; the feed
    /// never degrades to a silently empty page.
    pub async fn get_feed(&self, viewer: &Viewer, request: FeedRequest) -> AppResult<FeedPage> {
        request.validate()?;

        let page_size = request.page_size.min(MAX_PAGE_SIZE);

        let friend_ids = match viewer.user_id() {
            Some(user_id) => self.friendship_repo.friend_ids_of(user_id).await?,
            None => Vec::new(),
        };

        let filter = VisibilityFilter::for_viewer(viewer, &friend_ids);

        let (models, total) = self
            .publication_repo
            .find_visible(&filter, request.author_id.as_deref(), request.page, page_size)
            .await?;

        tracing::debug!(
            page = request.page,
            page_size,
            total,
            returned = models.len(),
            friends = friend_ids.len(),
            "Resolved feed page"
        );

        Ok(FeedPage {
            items: models.into_iter().map(PublicationView::from).collect(),
            pagination: PageInfo {
                total,
                page: request.page,
                page_size,
                page_count: total.div_ceil(page_size),
            },
        })
    }
}
