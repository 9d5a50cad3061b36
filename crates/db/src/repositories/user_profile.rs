//! User profile repository.

use std::sync::Arc;

use crate::entities::{user_profile, UserProfile};
use agora_common::{AppError, AppResult};
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// User profile repository for database operations.
#[derive(Clone)]
pub struct UserProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl UserProfileRepository {
    /// Create a new user profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a profile by the owning user's ID.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<user_profile::Model>> {
        UserProfile::find()
            .filter(user_profile::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a profile by user ID, returning an error if not found.
    pub async fn get_by_user_id(&self, user_id: &str) -> AppResult<user_profile::Model> {
        self.find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(user_id.to_string()))
    }

    /// Find profiles for a set of user IDs, ordered by username.
    pub async fn find_by_user_ids(
        &self,
        user_ids: &[String],
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<user_profile::Model>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        UserProfile::find()
            .filter(user_profile::Column::UserId.is_in(user_ids.iter().map(String::as_str)))
            .order_by_asc(user_profile::Column::Username)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment posts count atomically (single UPDATE query, no fetch).
    pub async fn increment_posts_count(&self, user_id: &str) -> AppResult<()> {
        UserProfile::update_many()
            .col_expr(
                user_profile::Column::PostsCount,
                Expr::col(user_profile::Column::PostsCount).add(1),
            )
            .filter(user_profile::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Decrement posts count atomically (single UPDATE query, no fetch).
    pub async fn decrement_posts_count(&self, user_id: &str) -> AppResult<()> {
        UserProfile::update_many()
            .col_expr(
                user_profile::Column::PostsCount,
                Expr::cust("GREATEST(posts_count - 1, 0)"),
            )
            .filter(user_profile::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Increment friends count atomically (single UPDATE query, no fetch).
    pub async fn increment_friends_count(&self, user_id: &str) -> AppResult<()> {
        UserProfile::update_many()
            .col_expr(
                user_profile::Column::FriendsCount,
                Expr::col(user_profile::Column::FriendsCount).add(1),
            )
            .filter(user_profile::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Decrement friends count atomically (single UPDATE query, no fetch).
    pub async fn decrement_friends_count(&self, user_id: &str) -> AppResult<()> {
        UserProfile::update_many()
            .col_expr(
                user_profile::Column::FriendsCount,
                Expr::cust("GREATEST(friends_count - 1, 0)"),
            )
            .filter(user_profile::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
