//! Community repository.

use std::sync::Arc;

use agora_common::{AppError, AppResult};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::community::CommunityCategory;
use crate::entities::{community, community_member, Community, CommunityMember};

/// Repository for community operations.
#[derive(Clone)]
pub struct CommunityRepository {
    db: Arc<DatabaseConnection>,
}

impl CommunityRepository {
    /// Create a new community repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // ==================== Community Operations ====================

    /// Find community by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<community::Model>> {
        Community::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get community by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<community::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::CommunityNotFound(id.to_string()))
    }

    /// List active communities, optionally filtered by category.
    pub async fn list(
        &self,
        category: Option<CommunityCategory>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<community::Model>> {
        let mut query = Community::find().filter(community::Column::IsActive.eq(true));

        if let Some(cat) = category {
            query = query.filter(community::Column::Category.eq(cat));
        }

        query
            .order_by(community::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new community.
    pub async fn create(&self, model: community::ActiveModel) -> AppResult<community::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment members count atomically.
    pub async fn increment_members_count(&self, id: &str) -> AppResult<()> {
        Community::update_many()
            .col_expr(
                community::Column::MembersCount,
                Expr::col(community::Column::MembersCount).add(1),
            )
            .filter(community::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Decrement members count atomically.
    pub async fn decrement_members_count(&self, id: &str) -> AppResult<()> {
        Community::update_many()
            .col_expr(
                community::Column::MembersCount,
                Expr::cust("GREATEST(members_count - 1, 0)"),
            )
            .filter(community::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    // ==================== Member Operations ====================

    /// Check if user is a member of a community.
    pub async fn is_member(&self, user_id: &str, community_id: &str) -> AppResult<bool> {
        let count = CommunityMember::find()
            .filter(community_member::Column::UserId.eq(user_id))
            .filter(community_member::Column::CommunityId.eq(community_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    /// Get member record.
    pub async fn get_member(
        &self,
        user_id: &str,
        community_id: &str,
    ) -> AppResult<Option<community_member::Model>> {
        CommunityMember::find()
            .filter(community_member::Column::UserId.eq(user_id))
            .filter(community_member::Column::CommunityId.eq(community_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Add a member to a community and bump the counter.
    pub async fn add_member(
        &self,
        model: community_member::ActiveModel,
    ) -> AppResult<community_member::Model> {
        let member = model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.increment_members_count(&member.community_id).await?;

        Ok(member)
    }

    /// Insert a member row without touching the counter.
    ///
    /// Used when the community row is created with the creator already
    /// counted in `members_count`.
    pub async fn insert_member(
        &self,
        model: community_member::ActiveModel,
    ) -> AppResult<community_member::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove a member from a community.
    pub async fn remove_member(&self, user_id: &str, community_id: &str) -> AppResult<()> {
        let deleted = CommunityMember::delete_many()
            .filter(community_member::Column::UserId.eq(user_id))
            .filter(community_member::Column::CommunityId.eq(community_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if deleted.rows_affected > 0 {
            self.decrement_members_count(community_id).await?;
        }

        Ok(())
    }

    /// List members of a community, oldest first.
    pub async fn list_members(
        &self,
        community_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<community_member::Model>> {
        CommunityMember::find()
            .filter(community_member::Column::CommunityId.eq(community_id))
            .order_by(community_member::Column::JoinedAt, Order::Asc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::community_member::MemberRole;
    use chrono::Utc;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_community(id: &str, creator_id: &str, name: &str) -> community::Model {
        community::Model {
            id: id.to_string(),
            creator_id: creator_id.to_string(),
            name: name.to_string(),
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

    #[tokio::test]
    async fn test_find_by_id() {
        let community = create_test_community("c1", "u1", "Rustaceans");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[community]])
                .into_connection(),
        );

        let repo = CommunityRepository::new(db);
        let result = repo.find_by_id("c1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().name, "Rustaceans");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<community::Model>::new()])
                .into_connection(),
        );

        let repo = CommunityRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        match result {
            Err(AppError::CommunityNotFound(id)) => assert_eq!(id, "nonexistent"),
            _ => panic!("Expected CommunityNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_is_member_true() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1)),
                }]])
                .into_connection(),
        );

        let repo = CommunityRepository::new(db);
        assert!(repo.is_member("u1", "c1").await.unwrap());
    }

    #[tokio::test]
    async fn test_is_member_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(0)),
                }]])
                .into_connection(),
        );

        let repo = CommunityRepository::new(db);
        assert!(!repo.is_member("u2", "c1").await.unwrap());
    }

    #[tokio::test]
    async fn test_add_member_bumps_counter() {
        let member = create_test_member("c1", "u2", MemberRole::Member);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[member]])
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let repo = CommunityRepository::new(Arc::clone(&db));
        let active = community_member::ActiveModel {
            id: sea_orm::Set("member-u2".to_string()),
            community_id: sea_orm::Set("c1".to_string()),
            user_id: sea_orm::Set("u2".to_string()),
            ..Default::default()
        };

        let result = repo.add_member(active).await.unwrap();
        assert_eq!(result.user_id, "u2");
        drop(repo);

        // Insert then counter update.
        let log = Arc::try_unwrap(db).ok().unwrap().into_transaction_log();
        let rendered = format!("{log:?}");
        assert!(rendered.contains("members_count"));
    }

    #[tokio::test]
    async fn test_remove_member_skips_decrement_when_absent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = CommunityRepository::new(Arc::clone(&db));
        repo.remove_member("u9", "c1").await.unwrap();
        drop(repo);

        // Only the DELETE ran; no counter update followed.
        let log = Arc::try_unwrap(db).ok().unwrap().into_transaction_log();
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn test_list_filters_by_category() {
        let community = create_test_community("c1", "u1", "Trail Runners");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[community]])
                .into_connection(),
        );

        let repo = CommunityRepository::new(Arc::clone(&db));
        let result = repo
            .list(Some(CommunityCategory::Sports), 10, 0)
            .await
            .unwrap();
        assert_eq!(result.len(), 1);
        drop(repo);

        let log = Arc::try_unwrap(db).ok().unwrap().into_transaction_log();
        let rendered = format!("{log:?}");
        assert!(rendered.contains("sports"));
        assert!(rendered.contains("is_active"));
    }
}
