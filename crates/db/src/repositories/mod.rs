//! Repository layer.
//!
//! Each repository wraps the shared [`sea_orm::DatabaseConnection`] and is
//! handed to services explicitly. Nothing in this crate reaches for global
//! state; tests construct repositories over a mock connection.

pub mod community;
pub mod friendship;
pub mod publication;
pub mod reaction;
pub mod user_profile;

pub use community::CommunityRepository;
pub use friendship::FriendshipRepository;
pub use publication::PublicationRepository;
pub use reaction::ReactionRepository;
pub use user_profile::UserProfileRepository;
