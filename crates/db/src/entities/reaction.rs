//! Reaction entity (polymorphic likes on publications and comments).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What kind of object a reaction targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ReactionSubject {
    #[sea_orm(string_value = "publication")]
    Publication,
    #[sea_orm(string_value = "comment")]
    Comment,
}

/// A user's reaction to a publication or comment.
///
/// The target is polymorphic: `subject_id` carries no foreign key, the pair
/// (`subject_type`, `subject_id`) identifies the liked object. One reaction
/// per user per target.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reaction")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The user who reacted
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Target object kind
    pub subject_type: ReactionSubject,

    /// Target object ID (no FK; resolved through `subject_type`)
    #[sea_orm(indexed)]
    pub subject_id: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_profile::Entity",
        from = "Column::UserId",
        to = "super::user_profile::Column::UserId",
        on_delete = "Cascade"
    )]
    User,
}

impl ActiveModelBehavior for ActiveModel {}
