use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::artifacts::validation::validate_submission;
use crate::errors::AppError;
use crate::models::ack::{DeleteAck, InsertAck, UpdateAck};
use crate::models::artifact::{Artifact, ArtifactFilter, ArtifactSubmission, ArtifactUpdate};
use crate::models::parse_id;
use crate::store::ArtifactStore;

/// Size of the "most liked" showcase.
pub const TOP_LIKED_LIMIT: usize = 6;

/// Data-access contract over the artifacts collection.
#[derive(Clone)]
pub struct ArtifactRepository {
    store: Arc<dyn ArtifactStore>,
}

impl ArtifactRepository {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: &ArtifactFilter) -> Result<Vec<Artifact>, AppError> {
        Ok(self.store.find_artifacts(filter).await?)
    }

    pub async fn list_top_liked(&self, limit: usize) -> Result<Vec<Artifact>, AppError> {
        Ok(self.store.find_top_liked(limit).await?)
    }

    pub async fn get(&self, id: &str) -> Result<Artifact, AppError> {
        let id = parse_id(id)?;
        self.store
            .find_artifact(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Artifact {id} not found")))
    }

    pub async fn create(&self, submission: ArtifactSubmission) -> Result<InsertAck, AppError> {
        let artifact =
            validate_submission(submission).map_err(|e| AppError::Validation(e.to_string()))?;
        let id = Uuid::new_v4();
        self.store.insert_artifact(id, &artifact).await?;
        info!("Created artifact {id} for {}", artifact.added_email);
        Ok(InsertAck::new(id))
    }

    pub async fn upsert(&self, id: &str, update: &ArtifactUpdate) -> Result<UpdateAck, AppError> {
        let id = parse_id(id)?;
        let ack = self.store.upsert_artifact(id, update).await?;
        if ack.upserted_count > 0 {
            info!("Upsert created artifact {id}");
        }
        Ok(ack)
    }

    pub async fn delete(&self, id: &str) -> Result<DeleteAck, AppError> {
        let id = parse_id(id)?;
        Ok(self.store.delete_artifact(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn repository() -> ArtifactRepository {
        ArtifactRepository::new(Arc::new(MemoryStore::new()))
    }

    fn submission(title: &str, email: &str) -> ArtifactSubmission {
        serde_json::from_value(json!({
            "title": title,
            "artifact_image": "https://img.example.com/a.jpg",
            "context": "Found in a field",
            "created_at": "c. 1300 BC",
            "discovered_at": "1922",
            "discovered_by": "Howard Carter",
            "location": "Egyptian Museum",
            "added_email": email
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_after_create_returns_submitted_fields() {
        let repo = repository();
        let ack = repo
            .create(submission("Mask of Tutankhamun", "a@example.com"))
            .await
            .unwrap();
        assert!(ack.acknowledged);

        let artifact = repo.get(&ack.inserted_id.to_string()).await.unwrap();
        assert_eq!(artifact.id, ack.inserted_id);
        assert_eq!(artifact.title.as_deref(), Some("Mask of Tutankhamun"));
        assert_eq!(artifact.discovered_by.as_deref(), Some("Howard Carter"));
        assert_eq!(artifact.location.as_deref(), Some("Egyptian Museum"));
        assert_eq!(artifact.added_email.as_deref(), Some("a@example.com"));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_submission() {
        let repo = repository();
        let err = repo
            .create(ArtifactSubmission::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(repo.list(&ArtifactFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_by_submitter() {
        let repo = repository();
        repo.create(submission("Bust of Nefertiti", "a@example.com"))
            .await
            .unwrap();
        repo.create(submission("Ishtar Gate", "b@example.com"))
            .await
            .unwrap();

        assert_eq!(repo.list(&ArtifactFilter::default()).await.unwrap().len(), 2);
        let mine = repo
            .list(&ArtifactFilter::submitted_by("b@example.com"))
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title.as_deref(), Some("Ishtar Gate"));
    }

    #[tokio::test]
    async fn test_upsert_missing_id_creates_retrievable_document() {
        let repo = repository();
        let id = Uuid::new_v4().to_string();
        let update = ArtifactUpdate {
            title: Some("Phaistos Disc".to_string()),
            location: Some("Heraklion".to_string()),
            ..Default::default()
        };

        let ack = repo.upsert(&id, &update).await.unwrap();
        assert_eq!(ack.upserted_count, 1);

        let artifact = repo.get(&id).await.unwrap();
        assert_eq!(artifact.title.as_deref(), Some("Phaistos Disc"));
    }

    #[tokio::test]
    async fn test_upsert_existing_replaces_fields_and_keeps_like_count() {
        let store = Arc::new(MemoryStore::new());
        let repo = ArtifactRepository::new(store.clone());
        let ack = repo
            .create(submission("Baghdad Battery", "a@example.com"))
            .await
            .unwrap();
        let like = crate::models::like::NewLike {
            artifact_id: ack.inserted_id,
            user_email: "u@example.com".to_string(),
        };
        crate::store::LikeStore::record_like(store.as_ref(), &like)
            .await
            .unwrap();

        let id = ack.inserted_id.to_string();
        let update = ArtifactUpdate {
            title: Some("Parthian Battery".to_string()),
            ..Default::default()
        };
        let result = repo.upsert(&id, &update).await.unwrap();
        assert_eq!(result.matched_count, 1);
        assert_eq!(result.modified_count, 1);

        let artifact = repo.get(&id).await.unwrap();
        assert_eq!(artifact.title.as_deref(), Some("Parthian Battery"));
        assert_eq!(artifact.context, None);
        assert_eq!(artifact.like_count, 1);
        assert_eq!(artifact.added_email.as_deref(), Some("a@example.com"));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found_and_repeat_delete_succeeds() {
        let repo = repository();
        let ack = repo
            .create(submission("Sword of Goujian", "a@example.com"))
            .await
            .unwrap();
        let id = ack.inserted_id.to_string();

        assert_eq!(repo.delete(&id).await.unwrap().deleted_count, 1);
        assert!(matches!(repo.get(&id).await, Err(AppError::NotFound(_))));
        assert_eq!(repo.delete(&id).await.unwrap().deleted_count, 0);
    }

    #[tokio::test]
    async fn test_malformed_identifier_is_rejected() {
        let repo = repository();
        assert!(matches!(
            repo.get("not-an-id").await,
            Err(AppError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            repo.delete("42").await,
            Err(AppError::InvalidIdentifier(_))
        ));
    }

    #[tokio::test]
    async fn test_top_liked_never_exceeds_limit() {
        let repo = repository();
        for i in 0..8 {
            repo.create(submission(&format!("Coin {i}"), "a@example.com"))
                .await
                .unwrap();
        }
        let top = repo.list_top_liked(TOP_LIKED_LIMIT).await.unwrap();
        assert_eq!(top.len(), TOP_LIKED_LIMIT);
    }
}
