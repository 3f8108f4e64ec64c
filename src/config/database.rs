use super::{parse_env_or, require_env};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            url: require_env("DATABASE_URL")?,
            max_connections: parse_env_or("DB_MAX_CONNECTIONS", 10),
            min_connections: parse_env_or("DB_MIN_CONNECTIONS", 2),
        })
    }
}

pub async fn get_database(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.clone());
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true);

    Database::connect(opt).await
}
