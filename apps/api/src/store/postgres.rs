use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{ArtifactStore, LikeStore, StoreError};
use crate::models::ack::{DeleteAck, UpdateAck};
use crate::models::artifact::{Artifact, ArtifactFilter, ArtifactRow, ArtifactUpdate, NewArtifact};
use crate::models::like::{Like, LikeRow, NewLike};

/// PostgreSQL-backed store. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArtifactStore for PgStore {
    async fn insert_artifact(&self, id: Uuid, artifact: &NewArtifact) -> Result<(), StoreError> {
        let extra = Value::Object(artifact.extra.clone());
        sqlx::query(
            r#"
            INSERT INTO artifacts
                (id, title, artifact_image, context, created_at, discovered_at,
                 discovered_by, location, added_email, like_count, extra)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 0, $10)
            "#,
        )
        .bind(id)
        .bind(&artifact.title)
        .bind(&artifact.artifact_image)
        .bind(&artifact.context)
        .bind(&artifact.created_at)
        .bind(&artifact.discovered_at)
        .bind(&artifact.discovered_by)
        .bind(&artifact.location)
        .bind(&artifact.added_email)
        .bind(extra)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_artifacts(&self, filter: &ArtifactFilter) -> Result<Vec<Artifact>, StoreError> {
        let rows = match &filter.submitter_email {
            Some(email) => {
                sqlx::query_as::<_, ArtifactRow>(
                    "SELECT * FROM artifacts WHERE added_email = $1 ORDER BY inserted_at, id",
                )
                .bind(email)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ArtifactRow>("SELECT * FROM artifacts ORDER BY inserted_at, id")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows.into_iter().map(Artifact::from).collect())
    }

    async fn find_top_liked(&self, limit: usize) -> Result<Vec<Artifact>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, ArtifactRow>(
            "SELECT * FROM artifacts ORDER BY like_count DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Artifact::from).collect())
    }

    async fn find_artifact(&self, id: Uuid) -> Result<Option<Artifact>, StoreError> {
        let row = sqlx::query_as::<_, ArtifactRow>("SELECT * FROM artifacts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Artifact::from))
    }

    async fn upsert_artifact(
        &self,
        id: Uuid,
        update: &ArtifactUpdate,
    ) -> Result<UpdateAck, StoreError> {
        // No row back means the conflict branch ran but nothing differed.
        // `xmax = 0` distinguishes a fresh insert from an update.
        let inserted: Option<bool> = sqlx::query_scalar(
            r#"
            INSERT INTO artifacts
                (id, title, artifact_image, context, created_at, discovered_at,
                 discovered_by, location)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                artifact_image = EXCLUDED.artifact_image,
                context = EXCLUDED.context,
                created_at = EXCLUDED.created_at,
                discovered_at = EXCLUDED.discovered_at,
                discovered_by = EXCLUDED.discovered_by,
                location = EXCLUDED.location
            WHERE (artifacts.title, artifacts.artifact_image, artifacts.context,
                   artifacts.created_at, artifacts.discovered_at,
                   artifacts.discovered_by, artifacts.location)
                IS DISTINCT FROM
                  (EXCLUDED.title, EXCLUDED.artifact_image, EXCLUDED.context,
                   EXCLUDED.created_at, EXCLUDED.discovered_at,
                   EXCLUDED.discovered_by, EXCLUDED.location)
            RETURNING (xmax = 0)
            "#,
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.artifact_image)
        .bind(&update.context)
        .bind(&update.created_at)
        .bind(&update.discovered_at)
        .bind(&update.discovered_by)
        .bind(&update.location)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match inserted {
            Some(true) => UpdateAck::upserted(id),
            Some(false) => UpdateAck::matched(true),
            None => UpdateAck::matched(false),
        })
    }

    async fn delete_artifact(&self, id: Uuid) -> Result<DeleteAck, StoreError> {
        let result = sqlx::query("DELETE FROM artifacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(DeleteAck::new(result.rows_affected()))
    }
}

#[async_trait]
impl LikeStore for PgStore {
    async fn record_like(&self, like: &NewLike) -> Result<Option<Uuid>, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Single-statement increment: concurrent likes cannot lose updates.
        let bumped = sqlx::query("UPDATE artifacts SET like_count = like_count + 1 WHERE id = $1")
            .bind(like.artifact_id)
            .execute(&mut *tx)
            .await?;

        if bumped.rows_affected() == 0 {
            tx.rollback().await?;
            debug!("Like for missing artifact {} rolled back", like.artifact_id);
            return Ok(None);
        }

        let like_id = Uuid::new_v4();
        sqlx::query("INSERT INTO artifact_likes (id, like_id, user_email) VALUES ($1, $2, $3)")
            .bind(like_id)
            .bind(like.artifact_id.to_string())
            .bind(&like.user_email)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(like_id))
    }

    async fn find_likes_by_email(&self, user_email: &str) -> Result<Vec<Like>, StoreError> {
        let rows = sqlx::query_as::<_, LikeRow>(
            "SELECT * FROM artifact_likes WHERE user_email = $1 ORDER BY inserted_at, id",
        )
        .bind(user_email)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Like::from).collect())
    }
}
