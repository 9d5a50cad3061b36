//! Friendship entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Friendship edge status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    /// Request sent, not yet answered.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Both sides are friends.
    #[sea_orm(string_value = "accepted")]
    Accepted,
    /// Request declined by the addressee.
    #[sea_orm(string_value = "rejected")]
    Rejected,
    /// One side blocked the other.
    #[sea_orm(string_value = "blocked")]
    Blocked,
}

impl FriendshipStatus {
    /// Whether this edge makes the pair friends.
    ///
    /// Only accepted edges do; pending, rejected, and blocked edges confer
    /// no visibility rights.
    #[must_use]
    pub const fn is_friends(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Friendship edge between two users.
///
/// At most one edge exists per unordered pair; "A and B are friends" means
/// an accepted edge exists in either direction. Symmetry is derived, never
/// stored twice.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "friendship")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// User who sent the request
    #[sea_orm(indexed)]
    pub requester_id: String,

    /// User who received the request
    #[sea_orm(indexed)]
    pub addressee_id: String,

    /// Edge status
    pub status: FriendshipStatus,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_profile::Entity",
        from = "Column::RequesterId",
        to = "super::user_profile::Column::UserId"
    )]
    Requester,

    #[sea_orm(
        belongs_to = "super::user_profile::Entity",
        from = "Column::AddresseeId",
        to = "super::user_profile::Column::UserId"
    )]
    Addressee,
}

impl ActiveModelBehavior for ActiveModel {}
