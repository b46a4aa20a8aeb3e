//! Persistent store seam.
//!
//! Handlers and services only ever see `Arc<dyn ArtifactStore>` and
//! `Arc<dyn LikeStore>`. `PgStore` backs production; `MemoryStore` backs
//! local runs (`STORE_BACKEND=memory`) and tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::ack::{DeleteAck, UpdateAck};
use crate::models::artifact::{Artifact, ArtifactFilter, ArtifactUpdate, NewArtifact};
use crate::models::like::{Like, NewLike};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("document {0} already exists")]
    DuplicateId(Uuid),
}

/// Data access over the artifacts collection.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Persists a new artifact under `id` with `like_count = 0`. Never overwrites.
    async fn insert_artifact(&self, id: Uuid, artifact: &NewArtifact) -> Result<(), StoreError>;

    async fn find_artifacts(&self, filter: &ArtifactFilter) -> Result<Vec<Artifact>, StoreError>;

    /// Artifacts ordered by `like_count` descending. Order among equal counts is unspecified.
    async fn find_top_liked(&self, limit: usize) -> Result<Vec<Artifact>, StoreError>;

    async fn find_artifact(&self, id: Uuid) -> Result<Option<Artifact>, StoreError>;

    /// Replaces the updatable fields at `id`, creating the artifact if absent.
    async fn upsert_artifact(&self, id: Uuid, update: &ArtifactUpdate)
        -> Result<UpdateAck, StoreError>;

    async fn delete_artifact(&self, id: Uuid) -> Result<DeleteAck, StoreError>;
}

/// Data access over the likes collection.
#[async_trait]
pub trait LikeStore: Send + Sync {
    /// Records a like and increments the target's `like_count` as one atomic unit.
    /// Returns the new like's id, or `None` (writing nothing) when the artifact does not exist.
    async fn record_like(&self, like: &NewLike) -> Result<Option<Uuid>, StoreError>;

    /// Likes by `user_email`, in insertion order.
    async fn find_likes_by_email(&self, user_email: &str) -> Result<Vec<Like>, StoreError>;
}
