//! Core employee repository trait for CRUD operations.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{Employee, EmployeeId};

/// Repository trait for employee storage.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the storage backend is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Writes ====================

    /// Insert or overwrite an employee.
    ///
    /// * `id == None`: a new row is inserted and an id is assigned.
    /// * `id == Some(_)`: the row with that id is overwritten.
    ///
    /// # Returns
    /// * `Ok(Employee)` - The stored record, id always set
    /// * `Err(RepositoryError::NotFound)` - `id` set but no such row
    /// * `Err(RepositoryError::AlreadyExists)` - another row owns the email
    async fn save(&self, employee: &Employee) -> RepositoryResult<Employee>;

    /// Save several employees in order, returning the stored records.
    async fn save_all(&self, employees: &[Employee]) -> RepositoryResult<Vec<Employee>> {
        let mut saved = Vec::with_capacity(employees.len());
        for employee in employees {
            saved.push(self.save(employee).await?);
        }
        Ok(saved)
    }

    /// Delete an employee by id. Deleting an absent id is not an error.
    async fn delete_by_id(&self, id: EmployeeId) -> RepositoryResult<()>;

    /// Delete every employee.
    ///
    /// # Returns
    /// Number of rows removed
    async fn delete_all(&self) -> RepositoryResult<usize>;

    // ==================== Reads ====================

    /// All employees, ordered by id.
    async fn find_all(&self) -> RepositoryResult<Vec<Employee>>;

    async fn find_by_id(&self, id: EmployeeId) -> RepositoryResult<Option<Employee>>;

    /// Exact-match lookup on the email column.
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Employee>>;

    /// Lookup by first and last name through the query builder.
    ///
    /// When several rows match, the one with the lowest id is returned.
    async fn find_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepositoryResult<Option<Employee>>;

    /// Lookup by first and last name through a hand-written SQL statement
    /// with bound parameters. Same matching rule as [`Self::find_by_name`].
    async fn find_by_name_native(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepositoryResult<Option<Employee>>;

    async fn count(&self) -> RepositoryResult<usize>;
}
