use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::token::Claims;
use crate::errors::AppError;
use crate::models::ack::InsertAck;
use crate::models::artifact::Artifact;
use crate::models::like::{LikeSubmission, NewLike};
use crate::models::parse_id;
use crate::store::{ArtifactStore, LikeStore};

/// Likes collection access plus the likes-to-artifacts join.
#[derive(Clone)]
pub struct LikeAggregator {
    artifacts: Arc<dyn ArtifactStore>,
    likes: Arc<dyn LikeStore>,
}

impl LikeAggregator {
    pub fn new(artifacts: Arc<dyn ArtifactStore>, likes: Arc<dyn LikeStore>) -> Self {
        Self { artifacts, likes }
    }

    /// Records `user_email`'s like of the artifact at `like_id`.
    ///
    /// All-or-nothing: a malformed id or a missing artifact writes no like and
    /// leaves every counter unchanged. Returns the like insertion ack, not the artifact.
    pub async fn record_like(&self, submission: LikeSubmission) -> Result<InsertAck, AppError> {
        let raw_id = submission
            .like_id
            .ok_or_else(|| AppError::BadRequest("like_id is required".to_string()))?;
        let artifact_id = parse_id(&raw_id)?;
        let user_email = submission
            .user_email
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("user_email is required".to_string()))?;

        let like = NewLike {
            artifact_id,
            user_email,
        };
        let inserted = self
            .likes
            .record_like(&like)
            .await?
            .ok_or_else(|| AppError::ArtifactNotFound(artifact_id.to_string()))?;

        info!("Recorded like {inserted} on artifact {artifact_id}");
        Ok(InsertAck::new(inserted))
    }

    /// Artifacts liked by `user_email`, in the order the likes were stored.
    ///
    /// With a `requester`, only that identity's own likes may be listed.
    /// Likes with a malformed or dangling `like_id` are skipped and logged.
    pub async fn list_liked_artifacts(
        &self,
        user_email: Option<&str>,
        requester: Option<&Claims>,
    ) -> Result<Vec<Artifact>, AppError> {
        let user_email = user_email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::BadRequest("Email is required".to_string()))?;

        if let Some(claims) = requester {
            if claims.email != user_email {
                return Err(AppError::Forbidden);
            }
        }

        let likes = self.likes.find_likes_by_email(user_email).await?;
        let mut resolved = Vec::with_capacity(likes.len());

        for like in likes {
            let Some(artifact_id) = like.like_id.as_deref().and_then(|raw| parse_id(raw).ok())
            else {
                warn!(
                    like = %like.id,
                    like_id = ?like.like_id,
                    user_email,
                    "Skipping like with invalid artifact id"
                );
                continue;
            };

            match self.artifacts.find_artifact(artifact_id).await? {
                Some(artifact) => resolved.push(artifact),
                None => warn!(
                    like = %like.id,
                    %artifact_id,
                    user_email,
                    "Skipping like for deleted artifact"
                ),
            }
        }

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::artifact::ArtifactFilter;
    use crate::models::like::Like;
    use crate::store::MemoryStore;
    use serde_json::{json, Map};
    use uuid::Uuid;

    struct Fixture {
        store: Arc<MemoryStore>,
        aggregator: LikeAggregator,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let aggregator = LikeAggregator::new(store.clone(), store.clone());
        Fixture { store, aggregator }
    }

    async fn create_artifact(store: &MemoryStore, title: &str) -> Uuid {
        let update = crate::models::artifact::ArtifactUpdate {
            title: Some(title.to_string()),
            ..Default::default()
        };
        let id = Uuid::new_v4();
        store.upsert_artifact(id, &update).await.unwrap();
        id
    }

    fn like(id: impl ToString, email: &str) -> LikeSubmission {
        LikeSubmission {
            like_id: Some(id.to_string()),
            user_email: Some(email.to_string()),
        }
    }

    fn claims(email: &str) -> Claims {
        Claims {
            email: email.to_string(),
            iat: 0,
            exp: i64::MAX,
            extra: Map::new(),
        }
    }

    #[tokio::test]
    async fn test_sequential_likes_increment_count_exactly() {
        let f = fixture();
        let id = create_artifact(&f.store, "Rosetta Stone").await;

        for _ in 0..4 {
            f.aggregator
                .record_like(like(id, "u@example.com"))
                .await
                .unwrap();
        }

        let artifact = f.store.find_artifact(id).await.unwrap().unwrap();
        assert_eq!(artifact.like_count, 4);
    }

    #[tokio::test]
    async fn test_record_like_returns_like_ack_not_artifact() {
        let f = fixture();
        let id = create_artifact(&f.store, "Rosetta Stone").await;
        let ack = f
            .aggregator
            .record_like(like(id, "u@example.com"))
            .await
            .unwrap();
        assert!(ack.acknowledged);
        assert_ne!(ack.inserted_id, id);
    }

    #[tokio::test]
    async fn test_like_on_missing_artifact_fails_without_orphan() {
        let f = fixture();
        let missing = Uuid::new_v4();
        let err = f
            .aggregator
            .record_like(like(missing, "u@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ArtifactNotFound(_)));

        let liked = f
            .aggregator
            .list_liked_artifacts(Some("u@example.com"), None)
            .await
            .unwrap();
        assert!(liked.is_empty());
        assert!(f
            .store
            .find_likes_by_email("u@example.com")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_like_with_malformed_id_is_invalid_identifier() {
        let f = fixture();
        let err = f
            .aggregator
            .record_like(like("zzz", "u@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidIdentifier(_)));
    }

    #[tokio::test]
    async fn test_like_requires_fields() {
        let f = fixture();
        let id = create_artifact(&f.store, "Rosetta Stone").await;
        let missing_id = LikeSubmission {
            like_id: None,
            user_email: Some("u@example.com".to_string()),
        };
        let missing_email = LikeSubmission {
            like_id: Some(id.to_string()),
            user_email: None,
        };
        assert!(matches!(
            f.aggregator.record_like(missing_id).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            f.aggregator.record_like(missing_email).await,
            Err(AppError::BadRequest(_))
        ));
        let artifact = f.store.find_artifact(id).await.unwrap().unwrap();
        assert_eq!(artifact.like_count, 0);
    }

    #[tokio::test]
    async fn test_liked_artifacts_resolves_only_users_likes() {
        let f = fixture();
        let a = create_artifact(&f.store, "Rosetta Stone").await;
        let b = create_artifact(&f.store, "Terracotta Army").await;
        let c = create_artifact(&f.store, "Gundestrup cauldron").await;

        f.aggregator.record_like(like(a, "u@example.com")).await.unwrap();
        f.aggregator.record_like(like(b, "other@example.com")).await.unwrap();
        f.aggregator.record_like(like(c, "u@example.com")).await.unwrap();

        let liked = f
            .aggregator
            .list_liked_artifacts(Some("u@example.com"), None)
            .await
            .unwrap();
        let ids: Vec<Uuid> = liked.iter().map(|x| x.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[tokio::test]
    async fn test_liked_artifacts_skips_malformed_and_dangling() {
        let f = fixture();
        let kept = create_artifact(&f.store, "Rosetta Stone").await;
        let deleted = create_artifact(&f.store, "Lost idol").await;

        f.aggregator.record_like(like(kept, "u@example.com")).await.unwrap();
        f.aggregator.record_like(like(deleted, "u@example.com")).await.unwrap();
        f.store.delete_artifact(deleted).await.unwrap();
        f.store
            .seed_like(Like {
                id: Uuid::new_v4(),
                like_id: Some("507f1f77bcf86cd799439011".to_string()),
                user_email: Some("u@example.com".to_string()),
            })
            .await;
        f.store
            .seed_like(Like {
                id: Uuid::new_v4(),
                like_id: None,
                user_email: Some("u@example.com".to_string()),
            })
            .await;

        let liked = f
            .aggregator
            .list_liked_artifacts(Some("u@example.com"), None)
            .await
            .unwrap();
        assert_eq!(liked.len(), 1);
        assert_eq!(liked[0].id, kept);
    }

    #[tokio::test]
    async fn test_padded_like_id_still_resolves() {
        let f = fixture();
        let id = create_artifact(&f.store, "Rosetta Stone").await;
        f.store
            .seed_like(Like {
                id: Uuid::new_v4(),
                like_id: Some(format!("  {id} ")),
                user_email: Some("u@example.com".to_string()),
            })
            .await;

        let liked = f
            .aggregator
            .list_liked_artifacts(Some("u@example.com"), None)
            .await
            .unwrap();
        assert_eq!(liked.len(), 1);
        assert_eq!(liked[0].id, id);
    }

    #[tokio::test]
    async fn test_repeat_likes_return_artifact_once_per_like() {
        let f = fixture();
        let id = create_artifact(&f.store, "Rosetta Stone").await;
        f.aggregator.record_like(like(id, "u@example.com")).await.unwrap();
        f.aggregator.record_like(like(id, "u@example.com")).await.unwrap();

        let liked = f
            .aggregator
            .list_liked_artifacts(Some("u@example.com"), None)
            .await
            .unwrap();
        assert_eq!(liked.len(), 2);
        assert_eq!(liked[1].like_count, 2);
    }

    #[tokio::test]
    async fn test_mismatched_identity_is_forbidden() {
        let f = fixture();
        let err = f
            .aggregator
            .list_liked_artifacts(Some("bob@example.com"), Some(&claims("alice@example.com")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn test_matching_identity_is_allowed() {
        let f = fixture();
        let liked = f
            .aggregator
            .list_liked_artifacts(Some("alice@example.com"), Some(&claims("alice@example.com")))
            .await
            .unwrap();
        assert!(liked.is_empty());
    }

    #[tokio::test]
    async fn test_missing_email_is_bad_request_even_with_identity() {
        let f = fixture();
        for email in [None, Some("")] {
            let err = f
                .aggregator
                .list_liked_artifacts(email, Some(&claims("alice@example.com")))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
        }
    }

    #[tokio::test]
    async fn test_likes_do_not_touch_unrelated_artifacts() {
        let f = fixture();
        let liked = create_artifact(&f.store, "Rosetta Stone").await;
        create_artifact(&f.store, "Elgin Marbles").await;
        f.aggregator
            .record_like(like(liked, "u@example.com"))
            .await
            .unwrap();

        let all = f
            .store
            .find_artifacts(&ArtifactFilter::default())
            .await
            .unwrap();
        let total: i64 = all.iter().map(|a| a.like_count).sum();
        assert_eq!(total, 1);
        assert_eq!(
            serde_json::to_value(&all[0]).unwrap()["like_count"],
            json!(1)
        );
    }
}
