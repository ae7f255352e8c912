//! Repository trait definitions for database operations.
//!
//! - [`error`]: Error types for repository operations
//! - [`employee`]: CRUD and lookup operations for employees
//!
//! Implementations live in [`crate::db::repositories`]; the service layer
//! only ever sees the [`EmployeeRepository`] trait.

pub mod employee;
pub mod error;

pub use employee::EmployeeRepository;
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
