use deadpool_postgres::Pool;
use crate::config::Config;
use crate::crypto::jwt::TokenIssuer;
use crate::error::Result;

/// The server's state.
#[derive(Clone)]
pub struct AppState {
    /// The database connection pool.
    pub db: Pool,
    /// The server's configuration.
    pub config: Config,
    /// Signs and verifies admin tokens.
    pub tokens: TokenIssuer,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The server's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub fn new(config: &Config) -> Result<Self> {
        let db = crate::db::create_pool(&config.database_url)?;
        tracing::info!("✅ PostgreSQL pool initialized with deadpool-postgres");

        let tokens = TokenIssuer::new(&config.jwt_secret, config.token_ttl_secs);
        tracing::info!(
            "✅ Token issuer initialized (tokens valid for {}s)",
            config.token_ttl_secs
        );

        Ok(AppState {
            db,
            config: config.clone(),
            tokens,
        })
    }
}
