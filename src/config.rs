use std::{env, net::SocketAddr, path::PathBuf};
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// The server's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// The secret used to sign admin tokens.
    pub jwt_secret: Zeroizing<Vec<u8>>,
    /// How long an admin token stays valid, in seconds.
    pub token_ttl_secs: i64,
    /// The address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// The origin the admin UI is served from.
    pub cors_origin: String,
    /// The largest request body accepted, in bytes.
    pub body_limit_bytes: usize,
}

/// The minimum accepted length of `JWT_SECRET`, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let jwt_secret = Zeroizing::new(
            env::var("JWT_SECRET")
                .context("JWT_SECRET must be set (generate with: openssl rand -hex 32)")?
                .into_bytes(),
        );

        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            anyhow::bail!("JWT_SECRET must be at least {} bytes", MIN_JWT_SECRET_LEN);
        }

        let token_ttl_secs: i64 = env::var("TOKEN_TTL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .context("Invalid TOKEN_TTL_SECS")?;

        if token_ttl_secs <= 0 {
            anyhow::bail!("TOKEN_TTL_SECS must be positive");
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            jwt_secret,
            token_ttl_secs,
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
                .parse()
                .context("Invalid BIND_ADDR")?,
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            body_limit_bytes: env::var("BODY_LIMIT_BYTES")
                .unwrap_or_else(|_| (50 * 1024 * 1024).to_string())
                .parse()
                .context("Invalid BODY_LIMIT_BYTES")?,
        })
    }
}

/// The admin client's configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// The API root, e.g. `http://localhost:3000/api`.
    pub api_base_url: String,
    /// The directory holding the durable token slot.
    pub token_store_dir: PathBuf,
    /// The per-request timeout, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/api".to_string(),
            token_store_dir: PathBuf::from(".shop-admin"),
            request_timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Creates a new `ClientConfig` from environment variables, falling back
    /// to the defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            api_base_url: env::var("API_BASE_URL").unwrap_or(defaults.api_base_url),
            token_store_dir: env::var("TOKEN_STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.token_store_dir),
            request_timeout_secs: match env::var("REQUEST_TIMEOUT_SECS") {
                Ok(value) => value.parse().context("Invalid REQUEST_TIMEOUT_SECS")?,
                Err(_) => defaults.request_timeout_secs,
            },
        })
    }
}
