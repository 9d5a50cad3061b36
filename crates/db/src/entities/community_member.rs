//! Community member entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Member role within a community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Founded the community; assigned exactly once, at creation.
    #[sea_orm(string_value = "creator")]
    Creator,
    /// Full management rights.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Can moderate content and members.
    #[sea_orm(string_value = "moderator")]
    Moderator,
    /// Regular member.
    #[sea_orm(string_value = "member")]
    Member,
}

impl Default for MemberRole {
    fn default() -> Self {
        Self::Member
    }
}

/// Membership of a user in a community; unique per (community, user) pair.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "community_member")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Community joined
    #[sea_orm(indexed)]
    pub community_id: String,

    /// Member user ID
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Role within the community
    pub role: MemberRole,

    pub joined_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::community::Entity",
        from = "Column::CommunityId",
        to = "super::community::Column::Id"
    )]
    Community,

    #[sea_orm(
        belongs_to = "super::user_profile::Entity",
        from = "Column::UserId",
        to = "super::user_profile::Column::UserId"
    )]
    User,
}

impl Related<super::community::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Community.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
