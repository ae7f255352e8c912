//! Choosing and opening the employee store.
//!
//! A [`RepositorySelection`] says which backend to open and, for Postgres,
//! how to reach it. It can be written by hand, read from the environment or
//! read from a `repository.toml`; [`RepositorySelection::discover`] picks
//! the file when one exists and the environment otherwise.

use std::str::FromStr;
use std::sync::Arc;

use log::info;

use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
use super::repository::{EmployeeRepository, RepositoryError, RepositoryResult};
use super::PostgresConfig;

/// Storage backend kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Diesel over PostgreSQL (feature `postgres-repo`)
    Postgres,
    /// In-process map, lost on exit
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Accepts `postgres`, `pg` or `local` in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// `REPOSITORY_TYPE` when set; otherwise Postgres if a database URL is
    /// configured and Local if not. An unrecognised `REPOSITORY_TYPE` means
    /// Local.
    pub fn from_env() -> Self {
        match std::env::var("REPOSITORY_TYPE") {
            Ok(name) => name.parse().unwrap_or(Self::Local),
            Err(_) if has_database_url() => Self::Postgres,
            Err(_) => Self::Local,
        }
    }
}

fn has_database_url() -> bool {
    ["DATABASE_URL", "PG_DATABASE_URL"]
        .iter()
        .any(|key| std::env::var_os(key).is_some())
}

pub(crate) fn postgres_disabled() -> RepositoryError {
    RepositoryError::configuration("Postgres repository feature not enabled")
}

/// Which employee store to open.
#[derive(Debug, Clone)]
pub struct RepositorySelection {
    pub repo_type: RepositoryType,
    /// Required when `repo_type` is Postgres
    pub postgres: Option<PostgresConfig>,
}

impl RepositorySelection {
    pub fn local() -> Self {
        Self {
            repo_type: RepositoryType::Local,
            postgres: None,
        }
    }

    #[cfg(feature = "postgres-repo")]
    pub fn postgres(config: PostgresConfig) -> Self {
        Self {
            repo_type: RepositoryType::Postgres,
            postgres: Some(config),
        }
    }

    /// Selection described by environment variables.
    pub fn from_env() -> RepositoryResult<Self> {
        match RepositoryType::from_env() {
            RepositoryType::Local => Ok(Self::local()),
            RepositoryType::Postgres => Ok(Self {
                repo_type: RepositoryType::Postgres,
                postgres: Some(postgres_from_env()?),
            }),
        }
    }

    /// Selection described by a parsed `repository.toml`.
    pub fn from_config(config: &RepositoryConfig) -> RepositoryResult<Self> {
        match config.repository_type()? {
            RepositoryType::Local => Ok(Self::local()),
            RepositoryType::Postgres => Ok(Self {
                repo_type: RepositoryType::Postgres,
                postgres: Some(config.postgres_config()?),
            }),
        }
    }

    /// Use the first `repository.toml` on the search path, falling back to
    /// the environment when there is none.
    pub fn discover() -> RepositoryResult<Self> {
        match RepositoryConfig::locate() {
            Some(path) => {
                info!("reading repository settings from {}", path.display());
                Self::from_config(&RepositoryConfig::from_file(&path)?)
            }
            None => Self::from_env(),
        }
    }

    /// Open the selected store. Postgres connects and migrates before
    /// returning.
    pub async fn open(self) -> RepositoryResult<Arc<dyn EmployeeRepository>> {
        match (self.repo_type, self.postgres) {
            (RepositoryType::Local, _) => {
                info!("using in-memory employee repository");
                Ok(Arc::new(LocalRepository::new()))
            }
            (RepositoryType::Postgres, Some(config)) => open_postgres(config).await,
            (RepositoryType::Postgres, None) => Err(RepositoryError::configuration(
                "Postgres repository requires connection settings",
            )),
        }
    }
}

#[cfg(feature = "postgres-repo")]
fn postgres_from_env() -> RepositoryResult<PostgresConfig> {
    PostgresConfig::from_env().map_err(RepositoryError::configuration)
}

#[cfg(not(feature = "postgres-repo"))]
fn postgres_from_env() -> RepositoryResult<PostgresConfig> {
    Err(postgres_disabled())
}

#[cfg(feature = "postgres-repo")]
async fn open_postgres(config: PostgresConfig) -> RepositoryResult<Arc<dyn EmployeeRepository>> {
    use super::repositories::PostgresRepository;

    let repo = tokio::task::spawn_blocking(move || PostgresRepository::connect(&config))
        .await
        .map_err(|e| RepositoryError::internal(format!("Blocking task failed: {}", e)))??;
    Ok(Arc::new(repo))
}

#[cfg(not(feature = "postgres-repo"))]
async fn open_postgres(_config: PostgresConfig) -> RepositoryResult<Arc<dyn EmployeeRepository>> {
    Err(postgres_disabled())
}
