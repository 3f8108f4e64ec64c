pub mod database;
pub mod storage;

use anyhow::Context;
use std::env;

pub(crate) fn require_env(key: &str) -> anyhow::Result<String> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .with_context(|| format!("{key} environment variable must be set"))
}

pub(crate) fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
