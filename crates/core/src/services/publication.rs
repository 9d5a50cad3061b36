//! Publication service.

use agora_common::{AppError, AppResult, IdGenerator};
use agora_db::{
    entities::publication::{self, Visibility},
    repositories::{FriendshipRepository, PublicationRepository, UserProfileRepository},
    visibility::{can_view, Viewer},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Publication service for business logic.
#[derive(Clone)]
pub struct PublicationService {
    publication_repo: PublicationRepository,
    user_profile_repo: UserProfileRepository,
    friendship_repo: FriendshipRepository,
    id_gen: IdGenerator,
}

/// Input for creating a publication.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePublicationInput {
    #[validate(length(min = 1, max = 5000))]
    pub content: String,

    /// Content kind, e.g. "text" or "image".
    #[serde(rename = "type", default = "default_kind")]
    #[validate(length(min = 1, max = 32))]
    pub kind: String,

    #[serde(default)]
    pub visibility: Visibility,

    pub metadata: Option<serde_json::Value>,
}

fn default_kind() -> String {
    "text".to_string()
}

impl PublicationService {
    /// Create a new publication service.
    #[must_use]
    pub fn new(
        publication_repo: PublicationRepository,
        user_profile_repo: UserProfileRepository,
        friendship_repo: FriendshipRepository,
    ) -> Self {
        Self {
            publication_repo,
            user_profile_repo,
            friendship_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new publication.
    pub async fn create(
        &self,
        author_id: &str,
        input: CreatePublicationInput,
    ) -> AppResult<publication::Model> {
        input.validate()?;

        // The author must have a profile in this service.
        let profile = self.user_profile_repo.get_by_user_id(author_id).await?;

        let model = publication::ActiveModel {
            id: Set(self.id_gen.generate()),
            author_id: Set(author_id.to_string()),
            content: Set(input.content),
            kind: Set(input.kind),
            visibility: Set(input.visibility),
            metadata: Set(Some(
                input.metadata.unwrap_or_else(|| serde_json::json!({})),
            )),
            ..Default::default()
        };

        let created = self.publication_repo.create(model).await?;

        self.user_profile_repo
            .increment_posts_count(&profile.user_id)
            .await?;

        tracing::debug!(
            publication_id = %created.id,
            author_id = %created.author_id,
            visibility = ?created.visibility,
            "Created publication"
        );

        Ok(created)
    }

    /// Get a single publication as seen by a viewer.
    ///
    /// A publication the viewer is not allowed to see is reported as not
    /// found, exactly like one that does not exist. Deactivated rows are
    /// treated as absent too.
    pub async fn get(&self, id: &str, viewer: &Viewer) -> AppResult<publication::Model> {
        let found = self.publication_repo.get_by_id(id).await?;

        if !found.is_active {
            return Err(AppError::PublicationNotFound(id.to_string()));
        }

        // Friends are only resolved when the decision needs them.
        let friend_ids = match (found.visibility, viewer) {
            (Visibility::Friends, Viewer::User(viewer_id)) if *viewer_id != found.author_id => {
                self.friendship_repo.friend_ids_of(viewer_id).await?
            }
            _ => Vec::new(),
        };

        if !can_view(&found, viewer, &friend_ids) {
            return Err(AppError::PublicationNotFound(id.to_string()));
        }

        Ok(found)
    }

    /// Soft-delete a publication.
    pub async fn delete(&self, id: &str, user_id: &str) -> AppResult<()> {
        let found = self.publication_repo.get_by_id(id).await?;

        if !found.is_active {
            return Err(AppError::PublicationNotFound(id.to_string()));
        }

        if found.author_id != user_id {
            return Err(AppError::Forbidden(
                "Cannot delete another user's publication".to_string(),
            ));
        }

        self.publication_repo.soft_delete(id).await?;
        self.user_profile_repo.decrement_posts_count(user_id).await?;

        tracing::debug!(publication_id = %id, "Deleted publication");

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use agora_db::entities::friendship::{self, FriendshipStatus};
    use agora_db::entities::user_profile;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_profile(user_id: &str) -> user_profile::Model {
        user_profile::Model {
            id: format!("profile-{user_id}"),
            user_id: user_id.to_string(),
            username: user_id.to_string(),
            display_name: "Test User".to_string(),
            bio: None,
            avatar_url: None,
            friends_count: 0,
            posts_count: 0,
            is_active: true,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn create_test_publication(
        id: &str,
        author_id: &str,
        visibility: Visibility,
    ) -> publication::Model {
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

    fn empty_conn() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn service(
        publication_db: Arc<sea_orm::DatabaseConnection>,
        profile_db: Arc<sea_orm::DatabaseConnection>,
        friendship_db: Arc<sea_orm::DatabaseConnection>,
    ) -> PublicationService {
        PublicationService::new(
            PublicationRepository::new(publication_db),
            UserProfileRepository::new(profile_db),
            FriendshipRepository::new(friendship_db),
        )
    }

    #[tokio::test]
    async fn test_create_rejects_empty_content() {
        let service = service(empty_conn(), empty_conn(), empty_conn());

        let input = CreatePublicationInput {
            content: String::new(),
            kind: "text".to_string(),
            visibility: Visibility::Public,
            metadata: None,
        };

        let result = service.create("u1", input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_requires_author_profile() {
        let profile_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user_profile::Model>::new()])
                .into_connection(),
        );

        let service = service(empty_conn(), profile_db, empty_conn());

        let input = CreatePublicationInput {
            content: "hello".to_string(),
            kind: "text".to_string(),
            visibility: Visibility::Public,
            metadata: None,
        };

        let result = service.create("ghost", input).await;
        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_bumps_posts_count() {
        let created = create_test_publication("p1", "u1", Visibility::Public);

        let publication_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[created]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let profile_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_profile("u1")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = service(publication_db, Arc::clone(&profile_db), empty_conn());

        let input = CreatePublicationInput {
            content: "hello".to_string(),
            kind: "text".to_string(),
            visibility: Visibility::Public,
            metadata: None,
        };

        let result = service.create("u1", input).await.unwrap();
        assert_eq!(result.author_id, "u1");
        drop(service);

        let log = Arc::try_unwrap(profile_db).ok().unwrap().into_transaction_log();
        let rendered = format!("{log:?}");
        assert!(rendered.contains("posts_count"));
    }

    #[tokio::test]
    async fn test_get_hides_private_from_stranger() {
        let private_post = create_test_publication("p1", "u1", Visibility::Private);

        let publication_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[private_post]])
                .into_connection(),
        );

        let service = service(publication_db, empty_conn(), empty_conn());
        let viewer = Viewer::User("u2".to_string());

        let result = service.get("p1", &viewer).await;
        assert!(matches!(result, Err(AppError::PublicationNotFound(_))));
    }

    #[tokio::test]
    async fn test_get_allows_friend_on_friends_post() {
        let friends_post = create_test_publication("p1", "u1", Visibility::Friends);
        let edge = friendship::Model {
            id: "f1".to_string(),
            requester_id: "u1".to_string(),
            addressee_id: "u2".to_string(),
            status: FriendshipStatus::Accepted,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };

        let publication_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[friends_post]])
                .into_connection(),
        );
        let friendship_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge]])
                .into_connection(),
        );

        let service = service(publication_db, empty_conn(), friendship_db);
        let viewer = Viewer::User("u2".to_string());

        let result = service.get("p1", &viewer).await.unwrap();
        assert_eq!(result.id, "p1");
    }

    #[tokio::test]
    async fn test_get_denies_stranger_on_friends_post() {
        let friends_post = create_test_publication("p1", "u1", Visibility::Friends);

        let publication_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[friends_post]])
                .into_connection(),
        );
        let friendship_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<friendship::Model>::new()])
                .into_connection(),
        );

        let service = service(publication_db, empty_conn(), friendship_db);
        let viewer = Viewer::User("u3".to_string());

        let result = service.get("p1", &viewer).await;
        assert!(matches!(result, Err(AppError::PublicationNotFound(_))));
    }

    #[tokio::test]
    async fn test_get_treats_inactive_as_absent() {
        let mut hidden = create_test_publication("p1", "u1", Visibility::Public);
        hidden.is_active = false;

        let publication_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[hidden]])
                .into_connection(),
        );

        let service = service(publication_db, empty_conn(), empty_conn());

        let result = service.get("p1", &Viewer::Anonymous).await;
        assert!(matches!(result, Err(AppError::PublicationNotFound(_))));
    }

    #[tokio::test]
    async fn test_get_author_sees_own_private_post() {
        let private_post = create_test_publication("p1", "u1", Visibility::Private);

        let publication_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[private_post]])
                .into_connection(),
        );

        let service = service(publication_db, empty_conn(), empty_conn());
        let viewer = Viewer::User("u1".to_string());

        let result = service.get("p1", &viewer).await.unwrap();
        assert_eq!(result.author_id, "u1");
    }

    #[tokio::test]
    async fn test_delete_wrong_owner_returns_forbidden() {
        let post = create_test_publication("p1", "u1", Visibility::Public);

        let publication_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .into_connection(),
        );

        let service = service(publication_db, empty_conn(), empty_conn());

        let result = service.delete("p1", "u2").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_soft_deletes_and_decrements() {
        let post = create_test_publication("p1", "u1", Visibility::Public);

        let publication_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let profile_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = service(Arc::clone(&publication_db), profile_db, empty_conn());
        service.delete("p1", "u1").await.unwrap();
        drop(service);

        let log = Arc::try_unwrap(publication_db)
            .ok()
            .unwrap()
            .into_transaction_log();
        let rendered = format!("{log:?}");
        assert!(rendered.contains("is_active"));
    }
}
