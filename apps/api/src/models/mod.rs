pub mod ack;
pub mod artifact;
pub mod like;

use uuid::Uuid;

use crate::errors::AppError;

/// Parses a store identifier supplied by a client.
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::InvalidIdentifier(raw.to_string()))
}
