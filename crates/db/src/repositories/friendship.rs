//! Friendship repository.

use std::sync::Arc;

use crate::entities::friendship::FriendshipStatus;
use crate::entities::{friendship, Friendship};
use agora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// Friendship repository for database operations.
///
/// This is the friend half of the social graph store. Friendship is an
/// undirected relation stored as a single directed row: every query here
/// therefore looks at both edge directions.
#[derive(Clone)]
pub struct FriendshipRepository {
    db: Arc<DatabaseConnection>,
}

impl FriendshipRepository {
    /// Create a new friendship repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the edge sent by `requester_id` to `addressee_id`, if any.
    pub async fn find_directed(
        &self,
        requester_id: &str,
        addressee_id: &str,
    ) -> AppResult<Option<friendship::Model>> {
        Friendship::find()
            .filter(friendship::Column::RequesterId.eq(requester_id))
            .filter(friendship::Column::AddresseeId.eq(addressee_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the edge between two users in either direction, any status.
    ///
    /// At most one row can exist per unordered pair, so a single `one()`
    /// read is enough.
    pub async fn find_between(&self, a: &str, b: &str) -> AppResult<Option<friendship::Model>> {
        Friendship::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(friendship::Column::RequesterId.eq(a))
                            .add(friendship::Column::AddresseeId.eq(b)),
                    )
                    .add(
                        Condition::all()
                            .add(friendship::Column::RequesterId.eq(b))
                            .add(friendship::Column::AddresseeId.eq(a)),
                    ),
            )
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether two users are friends (accepted edge in either direction).
    pub async fn are_friends(&self, a: &str, b: &str) -> AppResult<bool> {
        let edge = self.find_between(a, b).await?;
        Ok(edge.is_some_and(|e| e.status.is_friends()))
    }

    /// All user ids with an accepted edge touching `user_id`, either
    /// direction, sorted and deduplicated.
    ///
    /// An unknown user or a user with no accepted edges yields an empty set,
    /// never an error; the feed must keep working for such viewers as
    /// public-only viewers. Pending, rejected, and blocked edges are excluded
    /// at the storage layer.
    pub async fn friend_ids_of(&self, user_id: &str) -> AppResult<Vec<String>> {
        let edges = Friendship::find()
            .filter(
                Condition::all()
                    .add(friendship::Column::Status.eq(FriendshipStatus::Accepted))
                    .add(
                        Condition::any()
                            .add(friendship::Column::RequesterId.eq(user_id))
                            .add(friendship::Column::AddresseeId.eq(user_id)),
                    ),
            )
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut ids: Vec<String> = edges
            .into_iter()
            .map(|edge| {
                if edge.requester_id == user_id {
                    edge.addressee_id
                } else {
                    edge.requester_id
                }
            })
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    /// Pending requests addressed to `user_id` (paginated, newest first).
    pub async fn find_pending_addressed_to(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<friendship::Model>> {
        Friendship::find()
            .filter(friendship::Column::AddresseeId.eq(user_id))
            .filter(friendship::Column::Status.eq(FriendshipStatus::Pending))
            .order_by_desc(friendship::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new friendship edge.
    pub async fn create(&self, model: friendship::ActiveModel) -> AppResult<friendship::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a friendship edge (status transitions).
    pub async fn update(&self, model: friendship::ActiveModel) -> AppResult<friendship::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a friendship edge.
    pub async fn delete(&self, edge: friendship::Model) -> AppResult<()> {
        edge.delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
