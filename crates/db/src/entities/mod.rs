//! Database entities.

pub mod community;
pub mod community_member;
pub mod friendship;
pub mod publication;
pub mod reaction;
pub mod user_profile;

pub use community::Entity as Community;
pub use community_member::Entity as CommunityMember;
pub use friendship::Entity as Friendship;
pub use publication::Entity as Publication;
pub use reaction::Entity as Reaction;
pub use user_profile::Entity as UserProfile;
