//! User profile entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User profile - the anchor the social graph hangs off.
///
/// `user_id` is the identity handed over by the fronting auth layer; this
/// service never issues or verifies credentials, it only stores the profile
/// attached to an already-verified identity.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Verified identity this profile belongs to (1:1)
    #[sea_orm(unique, indexed)]
    pub user_id: String,

    /// Unique handle
    #[sea_orm(unique, indexed)]
    pub username: String,

    /// Display name
    pub display_name: String,

    /// Profile bio
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,

    /// Avatar image URL
    #[sea_orm(nullable)]
    pub avatar_url: Option<String>,

    /// Accepted friendship count (denormalized)
    #[sea_orm(default_value = 0)]
    pub friends_count: i32,

    /// Active publication count (denormalized)
    #[sea_orm(default_value = 0)]
    pub posts_count: i32,

    /// Whether the profile is active
    #[sea_orm(default_value = true)]
    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::publication::Entity")]
    Publications,
}

impl Related<super::publication::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Publications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
