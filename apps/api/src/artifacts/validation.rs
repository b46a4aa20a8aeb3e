use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::artifact::{ArtifactSubmission, NewArtifact};

/// Keys a client may send but never controls on create.
const STORE_MANAGED_KEYS: &[&str] = &["_id", "like_count"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldIssue {
    pub field: String,
    pub reason: String,
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("{}", describe(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

fn describe(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.field, i.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Checks a create submission and strips store-managed keys.
///
/// Required:
/// - `title`: non-blank
/// - `added_email`: non-blank, contains `@`
///
/// Everything else, including unknown fields, is kept verbatim.
pub fn validate_submission(submission: ArtifactSubmission) -> Result<NewArtifact, ValidationError> {
    let mut issues = Vec::new();

    let title = match submission.title {
        Some(t) if !t.trim().is_empty() => Some(t),
        _ => {
            issues.push(FieldIssue {
                field: "title".to_string(),
                reason: "is required".to_string(),
            });
            None
        }
    };

    let added_email = match submission.added_email {
        Some(e) if e.trim().is_empty() => {
            issues.push(FieldIssue {
                field: "added_email".to_string(),
                reason: "is required".to_string(),
            });
            None
        }
        Some(e) if !e.contains('@') => {
            issues.push(FieldIssue {
                field: "added_email".to_string(),
                reason: "must be an email address".to_string(),
            });
            None
        }
        Some(e) => Some(e),
        None => {
            issues.push(FieldIssue {
                field: "added_email".to_string(),
                reason: "is required".to_string(),
            });
            None
        }
    };

    let (Some(title), Some(added_email)) = (title, added_email) else {
        return Err(ValidationError { issues });
    };

    let mut extra = submission.extra;
    for key in STORE_MANAGED_KEYS {
        extra.remove(*key);
    }

    Ok(NewArtifact {
        title,
        artifact_image: submission.artifact_image,
        context: submission.context,
        created_at: submission.created_at,
        discovered_at: submission.discovered_at,
        discovered_by: submission.discovered_by,
        location: submission.location,
        added_email,
        extra,
    })
}
