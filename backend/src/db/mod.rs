//! Database module for employee storage.
//!
//! Storage is reached through the Repository pattern so backends can be
//! swapped without touching the service or HTTP layers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                              │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - Business Logic           │
//! │  - Id handling on create and update                      │
//! │  - Email uniqueness on create                            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/) - EmployeeRepository    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                 │
//! ┌───▼──────────────────┐  ┌──────────▼──────────────┐
//! │ Postgres Repository  │  │ Local Repository        │
//! │ (Diesel + r2d2)      │  │ (in-memory)             │
//! └──────────────────────┘  └─────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```ignore
//! use employee_api::db::{services, RepositorySelection};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositorySelection::discover()?.open().await?;
//!     let employees = services::list_employees(repo.as_ref()).await?;
//!     Ok(())
//! }
//! ```

// Feature flag priority: postgres > local
// When multiple features are enabled (e.g., --all-features), postgres takes precedence.
#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;


// Postgres config is colocated with the repository implementation.
#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::PostgresConfig;
/// Placeholder so backend selection compiles without the Postgres feature.
/// It cannot be constructed.
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}

// ==================== Service Layer ====================

pub use services::{
    create_employee, delete_employee, find_employee_by_email, find_employee_by_name,
    get_employee, health_check, list_employees, update_employee,
};

// ==================== Repository Pattern Exports ====================

pub use repo_config::RepositoryConfig;

pub use factory::{RepositorySelection, RepositoryType};
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{EmployeeRepository, ErrorContext, RepositoryError, RepositoryResult};

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Process-wide repository, opened on first use.
static REPOSITORY: OnceCell<Arc<dyn EmployeeRepository>> = OnceCell::const_new();

/// Open the process-wide repository, or return the one already open.
///
/// The backend comes from [`RepositorySelection::discover`]. Concurrent
/// callers wait for a single open and all receive the same instance; if the
/// open fails, a later call tries again.
pub async fn init_repository() -> Result<Arc<dyn EmployeeRepository>> {
    let repo = REPOSITORY
        .get_or_try_init(|| async {
            RepositorySelection::discover()?
                .open()
                .await
                .context("Failed to initialize employee repository")
        })
        .await?;
    Ok(Arc::clone(repo))
}

/// The repository opened by [`init_repository`].
pub fn get_repository() -> Result<&'static Arc<dyn EmployeeRepository>> {
    REPOSITORY
        .get()
        .context("Database not initialized. Call init_repository() first.")
}
