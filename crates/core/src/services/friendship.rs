//! Friendship service.

use agora_common::{AppError, AppResult, IdGenerator};
use agora_db::{
    entities::friendship::{self, FriendshipStatus},
    entities::user_profile,
    repositories::{FriendshipRepository, UserProfileRepository},
};
use chrono::Utc;
use sea_orm::Set;

/// Friendship service for business logic.
#[derive(Clone)]
pub struct FriendshipService {
    friendship_repo: FriendshipRepository,
    user_profile_repo: UserProfileRepository,
    id_gen: IdGenerator,
}

impl FriendshipService {
    /// Create a new friendship service.
    #[must_use]
    pub fn new(
        friendship_repo: FriendshipRepository,
        user_profile_repo: UserProfileRepository,
    ) -> Self {
        Self {
            friendship_repo,
            user_profile_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Send a friend request from one user to another.
    ///
    /// At most one edge may exist per pair of users, in either direction.
    /// Any existing edge, whatever its status, makes a new request a
    /// conflict.
    pub async fn send_request(
        &self,
        requester_id: &str,
        addressee_id: &str,
    ) -> AppResult<friendship::Model> {
        if requester_id == addressee_id {
            return Err(AppError::BadRequest(
                "Cannot send a friend request to yourself".to_string(),
            ));
        }

        self.user_profile_repo.get_by_user_id(requester_id).await?;
        self.user_profile_repo.get_by_user_id(addressee_id).await?;

        if let Some(existing) = self
            .friendship_repo
            .find_between(requester_id, addressee_id)
            .await?
        {
            let message = match existing.status {
                FriendshipStatus::Accepted => "Users are already friends",
                FriendshipStatus::Pending => "A friend request is already pending",
                FriendshipStatus::Rejected | FriendshipStatus::Blocked => {
                    "A friendship record already exists between these users"
                }
            };
            return Err(AppError::Conflict(message.to_string()));
        }

        let edge = friendship::ActiveModel {
            id: Set(self.id_gen.generate()),
            requester_id: Set(requester_id.to_string()),
            addressee_id: Set(addressee_id.to_string()),
            status: Set(FriendshipStatus::Pending),
            ..Default::default()
        };

        let created = self.friendship_repo.create(edge).await?;

        tracing::debug!(
            requester_id = %requester_id,
            addressee_id = %addressee_id,
            "Sent friend request"
        );

        Ok(created)
    }

    /// Accept a pending friend request addressed to `addressee_id`.
    pub async fn accept_request(
        &self,
        addressee_id: &str,
        requester_id: &str,
    ) -> AppResult<friendship::Model> {
        let edge = self.pending_request(requester_id, addressee_id).await?;

        let mut active: friendship::ActiveModel = edge.into();
        active.status = Set(FriendshipStatus::Accepted);
        active.updated_at = Set(Utc::now().into());
        let updated = self.friendship_repo.update(active).await?;

        self.increment_pair_counts(requester_id, addressee_id).await?;

        tracing::debug!(
            requester_id = %requester_id,
            addressee_id = %addressee_id,
            "Accepted friend request"
        );

        Ok(updated)
    }

    /// Reject a pending friend request addressed to `addressee_id`.
    pub async fn reject_request(
        &self,
        addressee_id: &str,
        requester_id: &str,
    ) -> AppResult<friendship::Model> {
        let edge = self.pending_request(requester_id, addressee_id).await?;

        let mut active: friendship::ActiveModel = edge.into();
        active.status = Set(FriendshipStatus::Rejected);
        active.updated_at = Set(Utc::now().into());
        let updated = self.friendship_repo.update(active).await?;

        tracing::debug!(
            requester_id = %requester_id,
            addressee_id = %addressee_id,
            "Rejected friend request"
        );

        Ok(updated)
    }

    /// Remove an accepted friendship between two users.
    pub async fn unfriend(&self, user_id: &str, other_id: &str) -> AppResult<()> {
        let edge = self
            .friendship_repo
            .find_between(user_id, other_id)
            .await?
            .filter(|e| e.status.is_friends())
            .ok_or_else(|| AppError::NotFound("Friendship not found".to_string()))?;

        self.friendship_repo.delete(edge).await?;
        self.decrement_pair_counts(user_id, other_id).await?;

        tracing::debug!(user_id = %user_id, other_id = %other_id, "Removed friendship");

        Ok(())
    }

    /// Block another user.
    ///
    /// An existing edge between the pair is converted in place; otherwise a
    /// new blocked edge is created with the blocker as requester.
    pub async fn block(&self, blocker_id: &str, other_id: &str) -> AppResult<friendship::Model> {
        if blocker_id == other_id {
            return Err(AppError::BadRequest("Cannot block yourself".to_string()));
        }

        self.user_profile_repo.get_by_user_id(other_id).await?;

        let blocked = match self.friendship_repo.find_between(blocker_id, other_id).await? {
            Some(edge) => {
                let was_friends = edge.status.is_friends();
                let mut active: friendship::ActiveModel = edge.into();
                active.status = Set(FriendshipStatus::Blocked);
                active.updated_at = Set(Utc::now().into());
                let updated = self.friendship_repo.update(active).await?;

                if was_friends {
                    self.decrement_pair_counts(blocker_id, other_id).await?;
                }

                updated
            }
            None => {
                let edge = friendship::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    requester_id: Set(blocker_id.to_string()),
                    addressee_id: Set(other_id.to_string()),
                    status: Set(FriendshipStatus::Blocked),
                    ..Default::default()
                };
                self.friendship_repo.create(edge).await?
            }
        };

        tracing::debug!(blocker_id = %blocker_id, other_id = %other_id, "Blocked user");

        Ok(blocked)
    }

    /// IDs of all users the given user is friends with.
    pub async fn friend_ids_of(&self, user_id: &str) -> AppResult<Vec<String>> {
        self.friendship_repo.friend_ids_of(user_id).await
    }

    /// Whether two users have an accepted friendship.
    pub async fn are_friends(&self, a: &str, b: &str) -> AppResult<bool> {
        self.friendship_repo.are_friends(a, b).await
    }

    /// Pending friend requests addressed to the given user, newest first.
    pub async fn incoming_requests(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<friendship::Model>> {
        self.friendship_repo
            .find_pending_addressed_to(user_id, limit, offset)
            .await
    }

    /// Profiles of the given user's friends, ordered by username.
    pub async fn friends_of(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<user_profile::Model>> {
        let friend_ids = self.friendship_repo.friend_ids_of(user_id).await?;
        self.user_profile_repo
            .find_by_user_ids(&friend_ids, limit, offset)
            .await
    }

    /// Fetch the pending request sent by `requester_id` to `addressee_id`.
    async fn pending_request(
        &self,
        requester_id: &str,
        addressee_id: &str,
    ) -> AppResult<friendship::Model> {
        let edge = self
            .friendship_repo
            .find_directed(requester_id, addressee_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Friend request not found".to_string()))?;

        if edge.status != FriendshipStatus::Pending {
            return Err(AppError::BadRequest(
                "Friend request is not pending".to_string(),
            ));
        }

        Ok(edge)
    }

    async fn increment_pair_counts(&self, a: &str, b: &str) -> AppResult<()> {
        self.user_profile_repo.increment_friends_count(a).await?;
        self.user_profile_repo.increment_friends_count(b).await?;
        Ok(())
    }

    async fn decrement_pair_counts(&self, a: &str, b: &str) -> AppResult<()> {
        self.user_profile_repo.decrement_friends_count(a).await?;
        self.user_profile_repo.decrement_friends_count(b).await?;
        Ok(())
    }
}
