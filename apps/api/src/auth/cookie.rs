use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::auth::token::{Claims, TOKEN_TTL_HOURS};
use crate::errors::AppError;
use crate::state::AppState;

pub const TOKEN_COOKIE: &str = "token";

/// Attributes applied to the `token` cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    /// Cross-site deployments need `SameSite=None; Secure`.
    pub secure: bool,
}

impl CookiePolicy {
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }

    pub fn session_cookie(&self, token: &str) -> String {
        format!(
            "{TOKEN_COOKIE}={token}; {}; Max-Age={}",
            self.attributes(),
            TOKEN_TTL_HOURS * 3600
        )
    }

    pub fn cleared_cookie(&self) -> String {
        format!("{TOKEN_COOKIE}=; {}; Max-Age=0", self.attributes())
    }

    fn attributes(&self) -> &'static str {
        if self.secure {
            "HttpOnly; Path=/; SameSite=None; Secure"
        } else {
            "HttpOnly; Path=/; SameSite=Strict"
        }
    }
}

/// Returns the value of cookie `name` across all `Cookie` headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// Identity of the caller, taken from a verified `token` cookie.
/// Rejects with 401 when the cookie is missing or fails verification.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = read_cookie(&parts.headers, TOKEN_COOKIE).ok_or(AppError::Unauthorized)?;
        let claims = state.verifier.verify(&token)?;
        Ok(AuthUser(claims))
    }
}
