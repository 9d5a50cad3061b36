//! Reaction service.

use agora_common::{AppError, AppResult, IdGenerator};
use agora_db::{
    entities::publication::Visibility,
    entities::reaction::{self, ReactionSubject},
    repositories::{FriendshipRepository, PublicationRepository, ReactionRepository},
    visibility::{can_view, Viewer},
};
use sea_orm::Set;

/// Reaction service for business logic.
#[derive(Clone)]
pub struct ReactionService {
    reaction_repo: ReactionRepository,
    publication_repo: PublicationRepository,
    friendship_repo: FriendshipRepository,
    id_gen: IdGenerator,
}

impl ReactionService {
    /// Create a new reaction service.
    #[must_use]
    pub fn new(
        reaction_repo: ReactionRepository,
        publication_repo: PublicationRepository,
        friendship_repo: FriendshipRepository,
    ) -> Self {
        Self {
            reaction_repo,
            publication_repo,
            friendship_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// React to a publication or comment.
    ///
    /// Publication targets must exist, be active, and be visible to the
    /// reacting user; a target the user cannot see is reported as not found.
    /// Comment targets live outside this service and are recorded as-is.
    pub async fn react(
        &self,
        user_id: &str,
        subject: ReactionSubject,
        subject_id: &str,
    ) -> AppResult<reaction::Model> {
        if subject == ReactionSubject::Publication {
            self.require_visible_publication(subject_id, user_id).await?;
        }

        if self
            .reaction_repo
            .has_reacted(user_id, subject, subject_id)
            .await?
        {
            return Err(AppError::Conflict(
                "Already reacted to this subject".to_string(),
            ));
        }

        let model = reaction::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            subject_type: Set(subject),
            subject_id: Set(subject_id.to_string()),
            ..Default::default()
        };

        let created = self.reaction_repo.create(model).await?;

        if subject == ReactionSubject::Publication {
            self.publication_repo.increment_likes_count(subject_id).await?;
        }

        tracing::debug!(
            user_id = %user_id,
            subject = ?subject,
            subject_id = %subject_id,
            "Created reaction"
        );

        Ok(created)
    }

    /// Remove the caller's reaction from a subject.
    pub async fn unreact(
        &self,
        user_id: &str,
        subject: ReactionSubject,
        subject_id: &str,
    ) -> AppResult<()> {
        let removed = self
            .reaction_repo
            .delete_by_user_and_subject(user_id, subject, subject_id)
            .await?;

        if !removed {
            return Err(AppError::NotFound("Reaction not found".to_string()));
        }

        if subject == ReactionSubject::Publication {
            self.publication_repo.decrement_likes_count(subject_id).await?;
        }

        tracing::debug!(
            user_id = %user_id,
            subject = ?subject,
            subject_id = %subject_id,
            "Removed reaction"
        );

        Ok(())
    }

    /// List reactions on a subject, newest first.
    pub async fn list_for(
        &self,
        subject: ReactionSubject,
        subject_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<reaction::Model>> {
        self.reaction_repo
            .find_by_subject(subject, subject_id, limit, offset)
            .await
    }

    /// Total number of reactions on a subject.
    pub async fn count_for(&self, subject: ReactionSubject, subject_id: &str) -> AppResult<u64> {
        self.reaction_repo.count_by_subject(subject, subject_id).await
    }

    /// Whether a user has reacted to a subject.
    pub async fn has_reacted(
        &self,
        user_id: &str,
        subject: ReactionSubject,
        subject_id: &str,
    ) -> AppResult<bool> {
        self.reaction_repo
            .has_reacted(user_id, subject, subject_id)
            .await
    }

    /// Fetch a publication and check the reacting user may see it.
    async fn require_visible_publication(
        &self,
        publication_id: &str,
        user_id: &str,
    ) -> AppResult<()> {
        let publication = self.publication_repo.get_by_id(publication_id).await?;

        if !publication.is_active {
            return Err(AppError::PublicationNotFound(publication_id.to_string()));
        }

        let viewer = Viewer::from_user_id(Some(user_id.to_string()));
        let friend_ids = if publication.visibility == Visibility::Friends
            && publication.author_id != user_id
        {
            self.friendship_repo.friend_ids_of(user_id).await?
        } else {
            Vec::new()
        };

        if !can_view(&publication, &viewer, &friend_ids) {
            return Err(AppError::PublicationNotFound(publication_id.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use agora_db::entities::{friendship, publication};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_publication(id: &str, author_id: &str, visibility: Visibility) -> publication::Model {
        publication::Model {
            id: id.to_string(),
            author_id: author_id.to_string(),
            content: "hello".to_string(),
            kind: "text".to_string(),
            visibility,
            likes_count: 0,
            comments_count: 0,
            shares_count: 0,
            metadata: None,
            is_active: true,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn create_test_reaction(id: &str, user_id: &str, subject_id: &str) -> reaction::Model {
        reaction::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            subject_type: ReactionSubject::Publication,
            subject_id: subject_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn empty_conn() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    fn service(
        reaction_db: Arc<sea_orm::DatabaseConnection>,
        publication_db: Arc<sea_orm::DatabaseConnection>,
        friendship_db: Arc<sea_orm::DatabaseConnection>,
    ) -> ReactionService {
        ReactionService::new(
            ReactionRepository::new(reaction_db),
            PublicationRepository::new(publication_db),
            FriendshipRepository::new(friendship_db),
        )
    }

    #[tokio::test]
    async fn test_react_publication_not_found() {
        let publication_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<publication::Model>::new()])
                .into_connection(),
        );

        let service = service(empty_conn(), publication_db, empty_conn());

        let result = service
            .react("u1", ReactionSubject::Publication, "ghost")
            .await;
        match result {
            Err(AppError::PublicationNotFound(id)) => assert_eq!(id, "ghost"),
            _ => panic!("Expected PublicationNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_react_hidden_publication_reported_as_not_found() {
        let private_post = create_test_publication("p1", "u1", Visibility::Private);

        let publication_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[private_post]])
                .into_connection(),
        );

        let service = service(empty_conn(), publication_db, empty_conn());

        let result = service
            .react("u2", ReactionSubject::Publication, "p1")
            .await;
        assert!(matches!(result, Err(AppError::PublicationNotFound(_))));
    }

    #[tokio::test]
    async fn test_react_duplicate_conflicts() {
        let post = create_test_publication("p1", "u1", Visibility::Public);
        let existing = create_test_reaction("r1", "u2", "p1");

        let publication_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .into_connection(),
        );
        let reaction_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let service = service(reaction_db, publication_db, empty_conn());

        let result = service
            .react("u2", ReactionSubject::Publication, "p1")
            .await;
        match result {
            Err(AppError::Conflict(msg)) => assert!(msg.contains("Already reacted")),
            _ => panic!("Expected Conflict error"),
        }
    }

    #[tokio::test]
    async fn test_react_friend_on_friends_post_increments_likes() {
        let post = create_test_publication("p1", "u1", Visibility::Friends);
        let edge = friendship::Model {
            id: "f1".to_string(),
            requester_id: "u1".to_string(),
            addressee_id: "u2".to_string(),
            status: friendship::FriendshipStatus::Accepted,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };
        let created = create_test_reaction("r1", "u2", "p1");

        let publication_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .append_exec_results([exec_ok()])
                .into_connection(),
        );
        let friendship_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge]])
                .into_connection(),
        );
        let reaction_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<reaction::Model>::new()])
                .append_query_results([vec![created]])
                .append_exec_results([exec_ok()])
                .into_connection(),
        );

        let service = service(reaction_db, Arc::clone(&publication_db), friendship_db);

        let result = service
            .react("u2", ReactionSubject::Publication, "p1")
            .await
            .unwrap();
        assert_eq!(result.subject_id, "p1");
        drop(service);

        let log = Arc::try_unwrap(publication_db).ok().unwrap().into_transaction_log();
        let rendered = format!("{log:?}");
        assert!(rendered.contains("likes_count"));
    }

    #[tokio::test]
    async fn test_react_comment_skips_target_validation() {
        let created = reaction::Model {
            id: "r1".to_string(),
            user_id: "u1".to_string(),
            subject_type: ReactionSubject::Comment,
            subject_id: "comment-1".to_string(),
            created_at: Utc::now().into(),
        };

        let reaction_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<reaction::Model>::new()])
                .append_query_results([vec![created]])
                .append_exec_results([exec_ok()])
                .into_connection(),
        );
        let publication_db = empty_conn();

        let service = service(reaction_db, Arc::clone(&publication_db), empty_conn());

        let result = service
            .react("u1", ReactionSubject::Comment, "comment-1")
            .await
            .unwrap();
        assert_eq!(result.subject_type, ReactionSubject::Comment);
        drop(service);

        let log = Arc::try_unwrap(publication_db).ok().unwrap().into_transaction_log();
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn test_unreact_missing_reaction_not_found() {
        let reaction_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<reaction::Model>::new()])
                .into_connection(),
        );

        let service = service(reaction_db, empty_conn(), empty_conn());

        let result = service
            .unreact("u1", ReactionSubject::Publication, "p1")
            .await;
        match result {
            Err(AppError::NotFound(msg)) => assert!(msg.contains("Reaction not found")),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[tokio::test]
    async fn test_unreact_decrements_publication_likes() {
        let existing = create_test_reaction("r1", "u1", "p1");

        let reaction_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .append_exec_results([exec_ok()])
                .into_connection(),
        );
        let publication_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec_ok()])
                .into_connection(),
        );

        let service = service(reaction_db, Arc::clone(&publication_db), empty_conn());
        service
            .unreact("u1", ReactionSubject::Publication, "p1")
            .await
            .unwrap();
        drop(service);

        let log = Arc::try_unwrap(publication_db).ok().unwrap().into_transaction_log();
        let rendered = format!("{log:?}");
        assert!(rendered.contains("GREATEST(likes_count - 1, 0)"));
    }

    #[tokio::test]
    async fn test_unreact_comment_leaves_publication_db_alone() {
        let existing = reaction::Model {
            id: "r1".to_string(),
            user_id: "u1".to_string(),
            subject_type: ReactionSubject::Comment,
            subject_id: "comment-1".to_string(),
            created_at: Utc::now().into(),
        };

        let reaction_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .append_exec_results([exec_ok()])
                .into_connection(),
        );
        let publication_db = empty_conn();

        let service = service(reaction_db, Arc::clone(&publication_db), empty_conn());
        service
            .unreact("u1", ReactionSubject::Comment, "comment-1")
            .await
            .unwrap();
        drop(service);

        let log = Arc::try_unwrap(publication_db).ok().unwrap().into_transaction_log();
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn test_list_for_returns_reactions() {
        let r1 = create_test_reaction("r1", "u1", "p1");
        let r2 = create_test_reaction("r2", "u2", "p1");

        let reaction_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1, r2]])
                .into_connection(),
        );

        let service = service(reaction_db, empty_conn(), empty_conn());

        let result = service
            .list_for(ReactionSubject::Publication, "p1", 10, 0)
            .await
            .unwrap();
        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_count_for_returns_total() {
        use maplit::btreemap;

        let reaction_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(5)),
                }]])
                .into_connection(),
        );

        let service = service(reaction_db, empty_conn(), empty_conn());

        let count = service
            .count_for(ReactionSubject::Publication, "p1")
            .await
            .unwrap();
        assert_eq!(count, 5);
    }

    #[tokio::test]
    async fn test_has_reacted() {
        let existing = create_test_reaction("r1", "u1", "p1");

        let reaction_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .append_query_results([Vec::<reaction::Model>::new()])
                .into_connection(),
        );

        let service = service(reaction_db, empty_conn(), empty_conn());

        assert!(service
            .has_reacted("u1", ReactionSubject::Publication, "p1")
            .await
            .unwrap());
        assert!(!service
            .has_reacted("u2", ReactionSubject::Publication, "p1")
            .await
            .unwrap());
    }
}
