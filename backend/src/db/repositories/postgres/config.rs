use std::time::Duration;

/// Connection settings for [`super::PostgresRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    pub database_url: String,
    /// Upper bound on pooled connections
    pub max_pool_size: u32,
    /// Connections kept open while idle
    pub min_pool_size: u32,
    /// How long a request waits for a pooled connection
    pub connection_timeout_sec: u64,
    /// How long an unused connection stays open
    pub idle_timeout_sec: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
        }
    }
}

impl PostgresConfig {
    /// Settings for `database_url` with default pool sizing.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }

    /// Read `DATABASE_URL` (or `PG_DATABASE_URL`) plus the optional
    /// `PG_POOL_MAX`, `PG_POOL_MIN`, `PG_CONN_TIMEOUT_SEC` and
    /// `PG_IDLE_TIMEOUT_SEC` overrides. Unparsable overrides are ignored.
    pub fn from_env() -> Result<Self, String> {
        let url = ["DATABASE_URL", "PG_DATABASE_URL"]
            .iter()
            .find_map(|key| std::env::var(key).ok())
            .ok_or_else(|| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let mut config = Self::with_url(url);
        override_from_env("PG_POOL_MAX", &mut config.max_pool_size);
        override_from_env("PG_POOL_MIN", &mut config.min_pool_size);
        override_from_env("PG_CONN_TIMEOUT_SEC", &mut config.connection_timeout_sec);
        override_from_env("PG_IDLE_TIMEOUT_SEC", &mut config.idle_timeout_sec);
        Ok(config)
    }

    pub(super) fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_sec)
    }

    pub(super) fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_sec)
    }
}

fn override_from_env<T: std::str::FromStr>(key: &str, slot: &mut T) {
    if let Some(value) = std::env::var(key).ok().and_then(|v| v.parse().ok()) {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_url_keeps_pool_defaults() {
        let config = PostgresConfig::with_url("postgres://localhost/employees");
        assert_eq!(config.database_url, "postgres://localhost/employees");
        assert_eq!(config.max_pool_size, 10);
        assert_eq!(config.min_pool_size, 1);
        assert_eq!(config.connection_timeout(), Duration::from_secs(30));
        assert_eq!(config.idle_timeout(), Duration::from_secs(600));
    }
}
