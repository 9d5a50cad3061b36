//! Reaction repository.

use std::sync::Arc;

use crate::entities::reaction::ReactionSubject;
use crate::entities::{reaction, Reaction};
use agora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// Reaction repository for database operations.
///
/// Reactions point at a `(subject_type, subject_id)` pair rather than a
/// foreign key, so the same table serves publications and comments.
#[derive(Clone)]
pub struct ReactionRepository {
    db: Arc<DatabaseConnection>,
}

impl ReactionRepository {
    /// Create a new reaction repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user's reaction on a subject.
    pub async fn find_by_user_and_subject(
        &self,
        user_id: &str,
        subject: ReactionSubject,
        subject_id: &str,
    ) -> AppResult<Option<reaction::Model>> {
        Reaction::find()
            .filter(reaction::Column::UserId.eq(user_id))
            .filter(reaction::Column::SubjectType.eq(subject))
            .filter(reaction::Column::SubjectId.eq(subject_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user has reacted to a subject.
    pub async fn has_reacted(
        &self,
        user_id: &str,
        subject: ReactionSubject,
        subject_id: &str,
    ) -> AppResult<bool> {
        Ok(self
            .find_by_user_and_subject(user_id, subject, subject_id)
            .await?
            .is_some())
    }

    /// Create a new reaction.
    pub async fn create(&self, model: reaction::ActiveModel) -> AppResult<reaction::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a user's reaction on a subject.
    ///
    /// Returns whether a reaction existed and was removed, so callers can
    /// decide whether a counter needs adjusting.
    pub async fn delete_by_user_and_subject(
        &self,
        user_id: &str,
        subject: ReactionSubject,
        subject_id: &str,
    ) -> AppResult<bool> {
        let reaction = self
            .find_by_user_and_subject(user_id, subject, subject_id)
            .await?;

        match reaction {
            Some(r) => {
                r.delete(self.db.as_ref())
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Get reactions on a subject (paginated, newest first).
    pub async fn find_by_subject(
        &self,
        subject: ReactionSubject,
        subject_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<reaction::Model>> {
        Reaction::find()
            .filter(reaction::Column::SubjectType.eq(subject))
            .filter(reaction::Column::SubjectId.eq(subject_id))
            .order_by_desc(reaction::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count reactions on a subject.
    pub async fn count_by_subject(
        &self,
        subject: ReactionSubject,
        subject_id: &str,
    ) -> AppResult<u64> {
        Reaction::find()
            .filter(reaction::Column::SubjectType.eq(subject))
            .filter(reaction::Column::SubjectId.eq(subject_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
