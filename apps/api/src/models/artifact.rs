use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

/// A catalogued artifact as returned to clients.
///
/// Serialized with the identifier under `_id` and any fields the API does not
/// model flattened in beside the known ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artifact {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: Option<String>,
    pub artifact_image: Option<String>,
    pub context: Option<String>,
    pub created_at: Option<String>,
    pub discovered_at: Option<String>,
    pub discovered_by: Option<String>,
    pub location: Option<String>,
    pub added_email: Option<String>,
    /// Denormalized count of likes referencing this artifact.
    #[serde(default)]
    pub like_count: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Artifact {
    /// Builds the document created when an upsert targets an unknown id.
    pub fn from_update(id: Uuid, update: &ArtifactUpdate) -> Self {
        let mut artifact = Artifact {
            id,
            title: None,
            artifact_image: None,
            context: None,
            created_at: None,
            discovered_at: None,
            discovered_by: None,
            location: None,
            added_email: None,
            like_count: 0,
            extra: Map::new(),
        };
        update.apply_to(&mut artifact);
        artifact
    }
}

/// Raw body of `POST /artifacts`, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtifactSubmission {
    pub title: Option<String>,
    pub artifact_image: Option<String>,
    pub context: Option<String>,
    pub created_at: Option<String>,
    pub discovered_at: Option<String>,
    pub discovered_by: Option<String>,
    pub location: Option<String>,
    pub added_email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A submission that passed validation and is ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArtifact {
    pub title: String,
    pub artifact_image: Option<String>,
    pub context: Option<String>,
    pub created_at: Option<String>,
    pub discovered_at: Option<String>,
    pub discovered_by: Option<String>,
    pub location: Option<String>,
    pub added_email: String,
    pub extra: Map<String, Value>,
}

impl NewArtifact {
    pub fn into_artifact(self, id: Uuid) -> Artifact {
        Artifact {
            id,
            title: Some(self.title),
            artifact_image: self.artifact_image,
            context: self.context,
            created_at: self.created_at,
            discovered_at: self.discovered_at,
            discovered_by: self.discovered_by,
            location: self.location,
            added_email: Some(self.added_email),
            like_count: 0,
            extra: self.extra,
        }
    }
}

/// Body of `PUT /artifacts/:id`. Every field is replaced, absent ones with null.
/// `like_count` and `added_email` are never touched.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ArtifactUpdate {
    pub title: Option<String>,
    pub artifact_image: Option<String>,
    pub context: Option<String>,
    pub created_at: Option<String>,
    pub discovered_at: Option<String>,
    pub discovered_by: Option<String>,
    pub location: Option<String>,
}

impl ArtifactUpdate {
    /// Overwrites the replaceable fields of `artifact`. Returns whether anything changed.
    pub fn apply_to(&self, artifact: &mut Artifact) -> bool {
        let changed = !self.matches(artifact);
        artifact.title = self.title.clone();
        artifact.artifact_image = self.artifact_image.clone();
        artifact.context = self.context.clone();
        artifact.created_at = self.created_at.clone();
        artifact.discovered_at = self.discovered_at.clone();
        artifact.discovered_by = self.discovered_by.clone();
        artifact.location = self.location.clone();
        changed
    }

    fn matches(&self, artifact: &Artifact) -> bool {
        self.title == artifact.title
            && self.artifact_image == artifact.artifact_image
            && self.context == artifact.context
            && self.created_at == artifact.created_at
            && self.discovered_at == artifact.discovered_at
            && self.discovered_by == artifact.discovered_by
            && self.location == artifact.location
    }
}

/// Optional filter for listing artifacts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtifactFilter {
    pub submitter_email: Option<String>,
}

impl ArtifactFilter {
    pub fn submitted_by(email: impl Into<String>) -> Self {
        Self {
            submitter_email: Some(email.into()),
        }
    }

    pub fn matches(&self, artifact: &Artifact) -> bool {
        match &self.submitter_email {
            Some(email) => artifact.added_email.as_deref() == Some(email.as_str()),
            None => true,
        }
    }
}

/// Row shape of the `artifacts` table.
#[derive(Debug, Clone, FromRow)]
pub struct ArtifactRow {
    pub id: Uuid,
    pub title: Option<String>,
    pub artifact_image: Option<String>,
    pub context: Option<String>,
    pub created_at: Option<String>,
    pub discovered_at: Option<String>,
    pub discovered_by: Option<String>,
    pub location: Option<String>,
    pub added_email: Option<String>,
    pub like_count: i64,
    pub extra: Value,
}

impl From<ArtifactRow> for Artifact {
    fn from(row: ArtifactRow) -> Self {
        let extra = match row.extra {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Artifact {
            id: row.id,
            title: row.title,
            artifact_image: row.artifact_image,
            context: row.context,
            created_at: row.created_at,
            discovered_at: row.discovered_at,
            discovered_by: row.discovered_by,
            location: row.location,
            added_email: row.added_email,
            like_count: row.like_count,
            extra,
        }
    }
}
