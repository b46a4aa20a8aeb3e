use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One user's like of one artifact. `like_id` is the artifact id as a string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Like {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub like_id: Option<String>,
    pub user_email: Option<String>,
}

/// Raw body of `POST /artifactLikes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LikeSubmission {
    pub like_id: Option<String>,
    pub user_email: Option<String>,
}

/// A validated like, ready to record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLike {
    pub artifact_id: Uuid,
    pub user_email: String,
}

/// Row shape of the `artifact_likes` table.
#[derive(Debug, Clone, FromRow)]
pub struct LikeRow {
    pub id: Uuid,
    pub like_id: Option<String>,
    pub user_email: Option<String>,
}

impl From<LikeRow> for Like {
    fn from(row: LikeRow) -> Self {
        Like {
            id: row.id,
            like_id: row.like_id,
            user_email: row.user_email,
        }
    }
}
