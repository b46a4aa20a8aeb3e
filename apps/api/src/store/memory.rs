use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ArtifactStore, LikeStore, StoreError};
use crate::models::ack::{DeleteAck, UpdateAck};
use crate::models::artifact::{Artifact, ArtifactFilter, ArtifactUpdate, NewArtifact};
use crate::models::like::{Like, NewLike};

/// In-process store. Documents live in insertion order; nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

#[derive(Default)]
struct Collections {
    artifacts: Vec<Artifact>,
    likes: Vec<Like>,
}

impl Collections {
    fn artifact_mut(&mut self, id: Uuid) -> Option<&mut Artifact> {
        self.artifacts.iter_mut().find(|a| a.id == id)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a like document verbatim, bypassing validation and the counter.
    #[cfg(test)]
    pub async fn seed_like(&self, like: Like) {
        self.inner.write().await.likes.push(like);
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn insert_artifact(&self, id: Uuid, artifact: &NewArtifact) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.artifacts.iter().any(|a| a.id == id) {
            return Err(StoreError::DuplicateId(id));
        }
        inner.artifacts.push(artifact.clone().into_artifact(id));
        Ok(())
    }

    async fn find_artifacts(&self, filter: &ArtifactFilter) -> Result<Vec<Artifact>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .artifacts
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect())
    }

    async fn find_top_liked(&self, limit: usize) -> Result<Vec<Artifact>, StoreError> {
        let mut artifacts = self.inner.read().await.artifacts.clone();
        artifacts.sort_by(|a, b| b.like_count.cmp(&a.like_count));
        artifacts.truncate(limit);
        Ok(artifacts)
    }

    async fn find_artifact(&self, id: Uuid) -> Result<Option<Artifact>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.artifacts.iter().find(|a| a.id == id).cloned())
    }

    async fn upsert_artifact(
        &self,
        id: Uuid,
        update: &ArtifactUpdate,
    ) -> Result<UpdateAck, StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.artifact_mut(id) {
            let modified = update.apply_to(existing);
            return Ok(UpdateAck::matched(modified));
        }
        inner.artifacts.push(Artifact::from_update(id, update));
        Ok(UpdateAck::upserted(id))
    }

    async fn delete_artifact(&self, id: Uuid) -> Result<DeleteAck, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.artifacts.len();
        inner.artifacts.retain(|a| a.id != id);
        Ok(DeleteAck::new((before - inner.artifacts.len()) as u64))
    }
}

#[async_trait]
impl LikeStore for MemoryStore {
    async fn record_like(&self, like: &NewLike) -> Result<Option<Uuid>, StoreError> {
        // One write guard covers both collections, so the increment and insert are atomic.
        let mut inner = self.inner.write().await;
        let Some(artifact) = inner.artifact_mut(like.artifact_id) else {
            return Ok(None);
        };
        artifact.like_count += 1;

        let id = Uuid::new_v4();
        inner.likes.push(Like {
            id,
            like_id: Some(like.artifact_id.to_string()),
            user_email: Some(like.user_email.clone()),
        });
        Ok(Some(id))
    }

    async fn find_likes_by_email(&self, user_email: &str) -> Result<Vec<Like>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .likes
            .iter()
            .filter(|l| l.user_email.as_deref() == Some(user_email))
            .cloned()
            .collect())
    }
}
