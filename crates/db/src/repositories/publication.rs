//! Publication repository.

use std::sync::Arc;

use crate::entities::{publication, Publication};
use crate::visibility::VisibilityFilter;
use agora_common::{AppError, AppResult};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// Publication repository for database operations.
#[derive(Clone)]
pub struct PublicationRepository {
    db: Arc<DatabaseConnection>,
}

impl PublicationRepository {
    /// Create a new publication repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a publication by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<publication::Model>> {
        Publication::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a publication by ID, or fail with not-found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<publication::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PublicationNotFound(id.to_string()))
    }

    /// Create a new publication.
    pub async fn create(&self, model: publication::ActiveModel) -> AppResult<publication::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Soft-delete a publication. The row stays; every read path skips it.
    pub async fn soft_delete(&self, id: &str) -> AppResult<()> {
        Publication::update_many()
            .col_expr(publication::Column::IsActive, Expr::value(false))
            .col_expr(
                publication::Column::UpdatedAt,
                Expr::value(DateTimeWithTimeZone::from(Utc::now())),
            )
            .filter(publication::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Counted, paginated feed read.
    ///
    /// The visibility filter is pushed down as a storage predicate, conjoined
    /// with the active flag and the optional author filter, so the returned
    /// total is computed over the post-authorization row set. Rows are ordered
    /// by `created_at` descending with `id` ascending as the tie-break; both
    /// keys together give a total order, which is what keeps page boundaries
    /// stable across requests.
    ///
    /// `page` is 1-based.
    pub async fn find_visible(
        &self,
        filter: &VisibilityFilter,
        author_id: Option<&str>,
        page: u64,
        page_size: u64,
    ) -> AppResult<(Vec<publication::Model>, u64)> {
        let mut condition = Condition::all()
            .add(publication::Column::IsActive.eq(true))
            .add(filter.to_condition());

        if let Some(author) = author_id {
            condition = condition.add(publication::Column::AuthorId.eq(author));
        }

        let query = Publication::find().filter(condition);

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let items = query
            .order_by_desc(publication::Column::CreatedAt)
            .order_by_asc(publication::Column::Id)
            .limit(page_size)
            .offset(page.saturating_sub(1) * page_size)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((items, total))
    }

    /// Atomically increment the like count.
    pub async fn increment_likes_count(&self, id: &str) -> AppResult<()> {
        Publication::update_many()
            .col_expr(
                publication::Column::LikesCount,
                Expr::col(publication::Column::LikesCount).add(1),
            )
            .filter(publication::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Atomically decrement the like count (floored at zero).
    pub async fn decrement_likes_count(&self, id: &str) -> AppResult<()> {
        Publication::update_many()
            .col_expr(
                publication::Column::LikesCount,
                Expr::cust("GREATEST(likes_count - 1, 0)"),
            )
            .filter(publication::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

}
