use anyhow::{Context, Result};
use diesel::prelude::*;
use std::env;
use tracing::info;

/// Connection settings sourced from the environment (or a `.env` file).
///
/// Recognized keys: `DB_NAME`, `DB_USER`, `DB_PASS`, `DB_HOST`, `DB_PORT`.
/// Host and port fall back to `localhost:5432` when unset.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub name: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

impl DbConfig {
    pub fn from_env() -> Result<Self> {
        let name = env::var("DB_NAME").context("DB_NAME must be set")?;
        let user = env::var("DB_USER").context("DB_USER must be set")?;
        let password = env::var("DB_PASS").context("DB_PASS must be set")?;
        let host = env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port = match env::var("DB_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("DB_PORT is not a valid port number: '{raw}'"))?,
            Err(_) => 5432,
        };

        Ok(Self {
            name,
            user,
            password,
            host,
            port,
        })
    }

    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }
}

/// Open a single synchronous connection to PostgreSQL.
///
/// The connection is owned by the caller and passed `&mut` into the
/// pipeline steps; there is no pool and no shared global.
pub fn establish(config: &DbConfig) -> Result<PgConnection> {
    let conn = PgConnection::establish(&config.url()).with_context(|| {
        format!(
            "connecting to database '{}' at {}:{}",
            config.name, config.host, config.port
        )
    })?;
    info!(
        "connected to database '{}' at {}:{}",
        config.name, config.host, config.port
    );
    Ok(conn)
}
