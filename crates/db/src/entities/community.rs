//! Community entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Community category.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
pub enum CommunityCategory {
    #[default]
    #[sea_orm(string_value = "sports")]
    Sports,
    #[sea_orm(string_value = "art")]
    Art,
    #[sea_orm(string_value = "music")]
    Music,
    #[sea_orm(string_value = "reading")]
    Reading,
    #[sea_orm(string_value = "technology")]
    Technology,
    #[sea_orm(string_value = "nature")]
    Nature,
    #[sea_orm(string_value = "volunteering")]
    Volunteering,
    #[sea_orm(string_value = "gaming")]
    Gaming,
    #[sea_orm(string_value = "photography")]
    Photography,
    #[sea_orm(string_value = "cooking")]
    Cooking,
    #[sea_orm(string_value = "dance")]
    Dance,
    #[sea_orm(string_value = "meditation")]
    Meditation,
}

/// Community entity - an interest group users join.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "community")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// User who created the community
    #[sea_orm(indexed)]
    pub creator_id: String,

    /// Community name
    pub name: String,

    /// Community description
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Category
    pub category: CommunityCategory,

    /// Free-form tags
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub tags: Option<Json>,

    /// Cover image URL
    #[sea_orm(nullable)]
    pub image_url: Option<String>,

    /// Member count (denormalized, seeded to 1 by the creator's membership)
    #[sea_orm(default_value = 1)]
    pub members_count: i32,

    /// Whether the community is active
    #[sea_orm(default_value = true)]
    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_profile::Entity",
        from = "Column::CreatorId",
        to = "super::user_profile::Column::UserId"
    )]
    Creator,

    #[sea_orm(has_many = "super::community_member::Entity")]
    Members,
}

impl Related<super::community_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
