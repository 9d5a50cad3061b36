//! Community service.

use agora_common::{AppError, AppResult, IdGenerator};
use agora_db::{
    entities::community::{self, CommunityCategory},
    entities::community_member::{self, MemberRole},
    repositories::{CommunityRepository, UserProfileRepository},
    visibility::Viewer,
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Input for creating a community.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommunityInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(max = 2048))]
    pub description: Option<String>,
    #[serde(default)]
    pub category: CommunityCategory,
    pub tags: Option<serde_json::Value>,
    #[validate(length(max = 512))]
    pub image_url: Option<String>,
}

/// Community response with membership info for the viewer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityResponse {
    pub id: String,
    pub creator_id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: CommunityCategory,
    pub tags: Option<serde_json::Value>,
    pub image_url: Option<String>,
    pub members_count: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub is_member: bool,
    pub my_role: Option<MemberRole>,
}

impl CommunityResponse {
    #[must_use]
    pub fn from_model(model: community::Model, is_member: bool, my_role: Option<MemberRole>) -> Self {
        Self {
            id: model.id,
            creator_id: model.creator_id,
            name: model.name,
            description: model.description,
            category: model.category,
            tags: model.tags,
            image_url: model.image_url,
            members_count: model.members_count,
            created_at: model.created_at.into(),
            is_member,
            my_role,
        }
    }
}

/// Service for managing communities.
#[derive(Clone)]
pub struct CommunityService {
    community_repo: CommunityRepository,
    user_profile_repo: UserProfileRepository,
    id_gen: IdGenerator,
}

impl CommunityService {
    /// Create a new community service.
    #[must_use]
    pub fn new(
        community_repo: CommunityRepository,
        user_profile_repo: UserProfileRepository,
    ) -> Self {
        Self {
            community_repo,
            user_profile_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new community with its creator as the first member.
    pub async fn create(
        &self,
        creator_id: &str,
        input: CreateCommunityInput,
    ) -> AppResult<community::Model> {
        input.validate()?;

        self.user_profile_repo.get_by_user_id(creator_id).await?;

        let community_id = self.id_gen.generate();

        let model = community::ActiveModel {
            id: Set(community_id.clone()),
            creator_id: Set(creator_id.to_string()),
            name: Set(input.name),
            description: Set(input.description),
            category: Set(input.category),
            tags: Set(input.tags),
            image_url: Set(input.image_url),
            members_count: Set(1),
            is_active: Set(true),
            ..Default::default()
        };

        let created = self.community_repo.create(model).await?;

        // The creator row is seeded here and nowhere else; members_count
        // already accounts for it, so no counter bump.
        let creator_member = community_member::ActiveModel {
            id: Set(self.id_gen.generate()),
            community_id: Set(community_id),
            user_id: Set(creator_id.to_string()),
            role: Set(MemberRole::Creator),
            ..Default::default()
        };
        self.community_repo.insert_member(creator_member).await?;

        tracing::debug!(
            community_id = %created.id,
            creator_id = %creator_id,
            "Created community"
        );

        Ok(created)
    }

    /// Join a community as a regular member.
    pub async fn join(
        &self,
        user_id: &str,
        community_id: &str,
    ) -> AppResult<community_member::Model> {
        let found = self.get(community_id).await?;

        if self.community_repo.is_member(user_id, community_id).await? {
            return Err(AppError::Conflict(
                "Already a member of this community".to_string(),
            ));
        }

        let member = community_member::ActiveModel {
            id: Set(self.id_gen.generate()),
            community_id: Set(found.id),
            user_id: Set(user_id.to_string()),
            role: Set(MemberRole::Member),
            ..Default::default()
        };

        self.community_repo.add_member(member).await
    }

    /// Leave a community.
    pub async fn leave(&self, user_id: &str, community_id: &str) -> AppResult<()> {
        self.get(community_id).await?;

        let member = self
            .community_repo
            .get_member(user_id, community_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Not a member of this community".to_string()))?;

        if member.role == MemberRole::Creator {
            return Err(AppError::BadRequest(
                "The creator cannot leave their community".to_string(),
            ));
        }

        self.community_repo.remove_member(user_id, community_id).await
    }

    /// Get an active community by ID.
    ///
    /// Deactivated communities are reported as not found.
    pub async fn get(&self, id: &str) -> AppResult<community::Model> {
        let found = self.community_repo.get_by_id(id).await?;

        if !found.is_active {
            return Err(AppError::CommunityNotFound(id.to_string()));
        }

        Ok(found)
    }

    /// Get a community together with the viewer's membership.
    pub async fn get_with_membership(
        &self,
        id: &str,
        viewer: &Viewer,
    ) -> AppResult<CommunityResponse> {
        let found = self.get(id).await?;

        let member = match viewer.user_id() {
            Some(user_id) => self.community_repo.get_member(user_id, id).await?,
            None => None,
        };
        let is_member = member.is_some();
        let my_role = member.map(|m| m.role);

        Ok(CommunityResponse::from_model(found, is_member, my_role))
    }

    /// List active communities, optionally filtered by category.
    pub async fn list(
        &self,
        category: Option<CommunityCategory>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<community::Model>> {
        self.community_repo.list(category, limit, offset).await
    }

    /// List members of a community, oldest first.
    pub async fn members(
        &self,
        community_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<community_member::Model>> {
        self.get(community_id).await?;
        self.community_repo
            .list_members(community_id, limit, offset)
            .await
    }

    /// Whether a user is a member of a community.
    pub async fn is_member(&self, user_id: &str, community_id: &str) -> AppResult<bool> {
        self.community_repo.is_member(user_id, community_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use agora_db::entities::user_profile;
    use chrono::Utc;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_profile(user_id: &str) -> user_profile::Model {
        user_profile::Model {
            id: format!("profile-{user_id}"),
            user_id: user_id.to_string(),
            username: user_id.to_string(),
            display_name: "Test User".to_string(),
            bio: None,
            avatar_url: None,
            friends_count: 0,
            posts_count: 0,
            is_active: true,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn create_test_community(id: &str, creator_id: &str) -> community::Model {
        community::Model {
            id: id.to_string(),
            creator_id: creator_id.to_string(),
            name: "Rustaceans".to_string(),
            description: Some("A place to talk".to_string()),
            category: CommunityCategory::Technology,
            tags: None,
            image_url: None,
            members_count: 1,
            is_active: true,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn create_test_member(community_id: &str, user_id: &str, role: MemberRole) -> community_member::Model {
        community_member::Model {
            id: format!("member-{user_id}"),
            community_id: community_id.to_string(),
            user_id: user_id.to_string(),
            role,
            joined_at: Utc::now().into(),
        }
    }

    fn member_count(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
        btreemap! { "num_items" => sea_orm::Value::BigInt(Some(n)) }
    }

    fn empty_conn() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    fn service(
        community_db: Arc<sea_orm::DatabaseConnection>,
        profile_db: Arc<sea_orm::DatabaseConnection>,
    ) -> CommunityService {
        CommunityService::new(
            CommunityRepository::new(community_db),
            UserProfileRepository::new(profile_db),
        )
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name() {
        let service = service(empty_conn(), empty_conn());

        let input = CreateCommunityInput {
            name: String::new(),
            description: None,
            category: CommunityCategory::Technology,
            tags: None,
            image_url: None,
        };

        let result = service.create("u1", input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_seeds_creator_membership() {
        let community = create_test_community("c1", "u1");
        let creator_row = create_test_member("c1", "u1", MemberRole::Creator);

        let community_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![community]])
                .append_query_results([vec![creator_row]])
                .append_exec_results([exec_ok(), exec_ok()])
                .into_connection(),
        );
        let profile_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_profile("u1")]])
                .into_connection(),
        );

        let service = service(Arc::clone(&community_db), profile_db);

        let input = CreateCommunityInput {
            name: "Rustaceans".to_string(),
            description: Some("A place to talk".to_string()),
            category: CommunityCategory::Technology,
            tags: None,
            image_url: None,
        };

        let result = service.create("u1", input).await.unwrap();
        assert_eq!(result.members_count, 1);
        drop(service);

        let log = Arc::try_unwrap(community_db).ok().unwrap().into_transaction_log();
        // Community insert plus the creator membership row, nothing else.
        assert_eq!(log.len(), 2);
        let rendered = format!("{log:?}");
        assert!(rendered.contains("creator"));
    }

    #[tokio::test]
    async fn test_join_inactive_community_not_found() {
        let mut inactive = create_test_community("c1", "u1");
        inactive.is_active = false;

        let community_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[inactive]])
                .into_connection(),
        );

        let service = service(community_db, empty_conn());

        let result = service.join("u2", "c1").await;
        assert!(matches!(result, Err(AppError::CommunityNotFound(_))));
    }

    #[tokio::test]
    async fn test_join_duplicate_membership_conflicts() {
        let community_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![create_test_community("c1", "u1")]])
                .append_query_results([vec![member_count(1)]])
                .into_connection(),
        );

        let service = service(community_db, empty_conn());

        let result = service.join("u2", "c1").await;
        match result {
            Err(AppError::Conflict(msg)) => assert!(msg.contains("Already a member")),
            _ => panic!("Expected Conflict error"),
        }
    }

    #[tokio::test]
    async fn test_join_bumps_members_count() {
        let new_member = create_test_member("c1", "u2", MemberRole::Member);

        let community_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![create_test_community("c1", "u1")]])
                .append_query_results([vec![member_count(0)]])
                .append_query_results([vec![new_member]])
                .append_exec_results([exec_ok(), exec_ok()])
                .into_connection(),
        );

        let service = service(Arc::clone(&community_db), empty_conn());

        let result = service.join("u2", "c1").await.unwrap();
        assert_eq!(result.role, MemberRole::Member);
        drop(service);

        let log = Arc::try_unwrap(community_db).ok().unwrap().into_transaction_log();
        let rendered = format!("{log:?}");
        assert!(rendered.contains("members_count"));
    }

    #[tokio::test]
    async fn test_leave_creator_is_rejected() {
        let community_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![create_test_community("c1", "u1")]])
                .append_query_results([vec![create_test_member("c1", "u1", MemberRole::Creator)]])
                .into_connection(),
        );

        let service = service(community_db, empty_conn());

        let result = service.leave("u1", "c1").await;
        match result {
            Err(AppError::BadRequest(msg)) => assert!(msg.contains("creator")),
            _ => panic!("Expected BadRequest error"),
        }
    }

    #[tokio::test]
    async fn test_leave_non_member_not_found() {
        let community_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![create_test_community("c1", "u1")]])
                .append_query_results([Vec::<community_member::Model>::new()])
                .into_connection(),
        );

        let service = service(community_db, empty_conn());

        let result = service.leave("u3", "c1").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_leave_removes_member_and_decrements() {
        let community_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![create_test_community("c1", "u1")]])
                .append_query_results([vec![create_test_member("c1", "u2", MemberRole::Member)]])
                .append_exec_results([exec_ok(), exec_ok()])
                .into_connection(),
        );

        let service = service(Arc::clone(&community_db), empty_conn());
        service.leave("u2", "c1").await.unwrap();
        drop(service);

        let log = Arc::try_unwrap(community_db).ok().unwrap().into_transaction_log();
        let rendered = format!("{log:?}");
        assert!(rendered.contains("GREATEST(members_count - 1, 0)"));
    }

    #[tokio::test]
    async fn test_get_with_membership_anonymous_skips_member_lookup() {
        let community_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_community("c1", "u1")]])
                .into_connection(),
        );

        let service = service(Arc::clone(&community_db), empty_conn());

        let response = service
            .get_with_membership("c1", &Viewer::Anonymous)
            .await
            .unwrap();
        assert!(!response.is_member);
        assert!(response.my_role.is_none());
        drop(service);

        let log = Arc::try_unwrap(community_db).ok().unwrap().into_transaction_log();
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn test_get_with_membership_reports_role() {
        let community_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![create_test_community("c1", "u1")]])
                .append_query_results([vec![create_test_member("c1", "u1", MemberRole::Creator)]])
                .into_connection(),
        );

        let service = service(community_db, empty_conn());
        let viewer = Viewer::User("u1".to_string());

        let response = service.get_with_membership("c1", &viewer).await.unwrap();
        assert!(response.is_member);
        assert_eq!(response.my_role, Some(MemberRole::Creator));
    }
}
