use anyhow::{bail, Context, Result};

/// Which persistent store backs the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    /// `None` only when `store_backend` is `Memory`.
    pub database_url: Option<String>,
    pub access_token_secret: String,
    pub client_origin: String,
    pub cookie_secure: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let store_backend = match lookup("STORE_BACKEND").as_deref() {
            None | Some("") | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => bail!("STORE_BACKEND must be 'postgres' or 'memory', got '{other}'"),
        };

        let database_url = match (store_backend, lookup("DATABASE_URL")) {
            (StoreBackend::Memory, _) => None,
            (StoreBackend::Postgres, Some(url)) if !url.is_empty() => Some(url),
            (StoreBackend::Postgres, _) => Some(format!(
                "postgres://{}:{}@{}/{}",
                require("DB_USER")?,
                require("DB_PASS")?,
                lookup("DB_HOST").unwrap_or_else(|| "localhost:5432".to_string()),
                lookup("DB_NAME").unwrap_or_else(|| "artifactsDB".to_string()),
            )),
        };

        Ok(Config {
            store_backend,
            database_url,
            access_token_secret: require("ACCESS_TOKEN_SECRET")?,
            client_origin: lookup("CLIENT_ORIGIN")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            cookie_secure: lookup("COOKIE_SECURE")
                .map(|v| parse_bool(&v))
                .transpose()
                .context("COOKIE_SECURE must be true or false")?
                .unwrap_or(false),
            port: lookup("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => bail!("not a boolean: '{other}'"),
    }
}
