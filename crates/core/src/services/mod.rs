//! Business logic services.

#![allow(missing_docs)]

pub mod community;
pub mod feed;
pub mod friendship;
pub mod publication;
pub mod reaction;

pub use community::{CommunityResponse, CommunityService, CreateCommunityInput};
pub use feed::{FeedPage, FeedRequest, FeedService, PageInfo, PublicationView, MAX_PAGE_SIZE};
pub use friendship::FriendshipService;
pub use publication::{CreatePublicationInput, PublicationService};
pub use reaction::ReactionService;
