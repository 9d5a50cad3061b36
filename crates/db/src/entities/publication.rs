//! Publication entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Publication visibility levels.
///
/// The enum is closed: a stored value outside these three levels has no
/// representation here, so it can never be decoded into a visible row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible to anyone, including anonymous viewers.
    #[sea_orm(string_value = "public")]
    Public,
    /// Visible to the author and the author's accepted friends.
    #[sea_orm(string_value = "friends")]
    Friends,
    /// Visible to the author only.
    #[sea_orm(string_value = "private")]
    Private,
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Public
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "publication")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Author user ID
    #[sea_orm(indexed)]
    pub author_id: String,

    /// Publication text content
    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// Publication kind (free-form, e.g. "text", "image", "link")
    #[sea_orm(column_name = "type")]
    pub kind: String,

    /// Visibility level
    pub visibility: Visibility,

    /// Like count (denormalized)
    #[sea_orm(default_value = 0)]
    pub likes_count: i32,

    /// Comment count (denormalized)
    #[sea_orm(default_value = 0)]
    pub comments_count: i32,

    /// Share count (denormalized)
    #[sea_orm(default_value = 0)]
    pub shares_count: i32,

    /// Free-form metadata
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub metadata: Option<Json>,

    /// Soft-delete flag; inactive publications are invisible to every read path
    #[sea_orm(default_value = true)]
    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_profile::Entity",
        from = "Column::AuthorId",
        to = "super::user_profile::Column::UserId"
    )]
    Author,
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
