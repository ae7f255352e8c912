//! In-memory local repository implementation.
//!
//! This module provides a local implementation of [`EmployeeRepository`]
//! suitable for unit testing and local development. All data is stored in
//! memory in a `BTreeMap` keyed by id, so listings come back in insertion order.

use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::{Employee, EmployeeId};
use crate::db::repository::*;

/// In-memory local repository.
///
/// Email uniqueness is checked while holding the write lock, so two
/// concurrent saves with the same email cannot both succeed.
///
/// # Example
/// ```
/// use employee_api::api::Employee;
/// use employee_api::db::repositories::LocalRepository;
/// use employee_api::db::repository::EmployeeRepository;
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let repo = LocalRepository::new();
///     let saved = repo
///         .save(&Employee::new("Romulo", "Gomes", "romulo@teste.com"))
///         .await
///         .unwrap();
///     assert!(saved.id.is_some());
///     assert_eq!(repo.employee_count(), 1);
/// });
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    employees: BTreeMap<EmployeeId, Employee>,

    // ID counter
    next_employee_id: EmployeeId,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            employees: BTreeMap::new(),
            next_employee_id: EmployeeId(1),
            is_healthy: true,
        }
    }
}

impl LocalData {
    /// Id of another employee already using `email`, if any.
    fn email_owner(&self, email: &str, except: Option<EmployeeId>) -> Option<EmployeeId> {
        self.employees
            .iter()
            .find(|(id, e)| Some(**id) != except && e.email == email)
            .map(|(id, _)| *id)
    }

    fn find_by_name(&self, first_name: &str, last_name: &str) -> Option<Employee> {
        self.employees
            .values()
            .find(|e| e.has_name(first_name, last_name))
            .cloned()
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository and reset the id counter.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of employees stored.
    pub fn employee_count(&self) -> usize {
        self.data.read().employees.len()
    }

    /// Check if an employee exists.
    pub fn has_employee(&self, id: EmployeeId) -> bool {
        self.data.read().employees.contains_key(&id)
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Database is not healthy"));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmployeeRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn save(&self, employee: &Employee) -> RepositoryResult<Employee> {
        self.check_health()?;
        let mut data = self.data.write();

        if let Some(owner) = data.email_owner(&employee.email, employee.id) {
            return Err(RepositoryError::already_exists_with_context(
                format!("Email {} is already used", employee.email),
                ErrorContext::new("save")
                    .with_entity("employee")
                    .with_entity_id(owner),
            ));
        }

        let stored = match employee.id {
            Some(id) => {
                if !data.employees.contains_key(&id) {
                    return Err(RepositoryError::not_found_with_context(
                        format!("Employee {} not found", id),
                        ErrorContext::new("save")
                            .with_entity("employee")
                            .with_entity_id(id),
                    ));
                }
                employee.clone()
            }
            None => {
                let id = data.next_employee_id;
                data.next_employee_id = EmployeeId(id.0 + 1);
                employee.clone().with_id(id)
            }
        };

        if let Some(id) = stored.id {
            debug!("local repository stored employee {}", id);
            data.employees.insert(id, stored.clone());
        }
        Ok(stored)
    }

    async fn delete_by_id(&self, id: EmployeeId) -> RepositoryResult<()> {
        self.check_health()?;
        let removed = self.data.write().employees.remove(&id).is_some();
        debug!("local repository delete {} (existed={})", id, removed);
        Ok(())
    }

    async fn delete_all(&self) -> RepositoryResult<usize> {
        self.check_health()?;
        let mut data = self.data.write();
        let removed = data.employees.len();
        data.employees.clear();
        Ok(removed)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Employee>> {
        self.check_health()?;
        Ok(self.data.read().employees.values().cloned().collect())
    }

    async fn find_by_id(&self, id: EmployeeId) -> RepositoryResult<Option<Employee>> {
        self.check_health()?;
        Ok(self.data.read().employees.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Employee>> {
        self.check_health()?;
        Ok(self
            .data
            .read()
            .employees
            .values()
            .find(|e| e.email == email)
            .cloned())
    }

    async fn find_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepositoryResult<Option<Employee>> {
        self.check_health()?;
        Ok(self.data.read().find_by_name(first_name, last_name))
    }

    async fn find_by_name_native(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepositoryResult<Option<Employee>> {
        // No SQL engine here; both query styles share one matcher.
        self.check_health()?;
        Ok(self.data.read().find_by_name(first_name, last_name))
    }

    async fn count(&self) -> RepositoryResult<usize> {
        self.check_health()?;
        Ok(self.data.read().employees.len())
    }
}
