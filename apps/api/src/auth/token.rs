//! Identity credentials: HS256 JWTs keyed by `ACCESS_TOKEN_SECRET`.
//!
//! Claims carry whatever the client posted to `/jwt` (at least `email`) plus
//! `iat` / `exp` in epoch seconds. Expiry is checked against a caller-supplied
//! clock so it can be tested without sleeping.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::errors::AppError;

/// Credential lifetime.
pub const TOKEN_TTL_HOURS: i64 = 10;
/// Claim names set by the verifier; client-supplied values for these are dropped.
const RESERVED_CLAIMS: &[&str] = &["email", "iat", "exp"];

#[derive(Debug, Error, PartialEq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("unsupported algorithm")]
    UnsupportedAlgorithm,

    #[error("signature mismatch")]
    BadSignature,

    #[error("token expired")]
    Expired,

    #[error("signing failed: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            ErrorKind::InvalidAlgorithm => TokenError::UnsupportedAlgorithm,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        debug!("Rejected credential: {err}");
        AppError::Unauthorized
    }
}

/// Decoded identity claim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /jwt`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityRequest {
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Issues and verifies identity credentials.
pub struct IdentityVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl IdentityVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // exp is compared in verify_at against the supplied clock
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    pub fn issue(&self, email: &str, extra: Map<String, Value>) -> Result<String, AppError> {
        self.issue_at(email, extra, Utc::now())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("token signing failed: {e}")))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        Ok(self.verify_at(token, Utc::now())?)
    }

    pub fn issue_at(
        &self,
        email: &str,
        mut extra: Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        for key in RESERVED_CLAIMS {
            extra.remove(*key);
        }
        let claims = Claims {
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            extra,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)?;
        if data.claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }
}
