//! High-level employee service layer.
//!
//! Repository-agnostic operations that work with any [`EmployeeRepository`].
//! The business rules live here: email uniqueness on create and id handling
//! on create and update. Field contents are stored as given. Everything else
//! is a pass-through to storage.
//!
//! # Usage
//!
//! ```no_run
//! use employee_api::api::Employee;
//! use employee_api::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!
//!     let created = services::create_employee(
//!         &repo,
//!         Employee::new("Romulo", "Gomes", "romulo@teste.com"),
//!     )
//!     .await?;
//!     println!("Created employee {:?}", created.id);
//!
//!     let employees = services::list_employees(&repo).await?;
//!     println!("Found {} employees", employees.len());
//!     Ok(())
//! }
//! ```

use log::{debug, info, warn};

use super::repository::{EmployeeRepository, ErrorContext, RepositoryError, RepositoryResult};
use crate::api::{Employee, EmployeeId};

// ==================== Health & Connection ====================

/// Check if the storage backend is healthy. Pass-through to the repository.
pub async fn health_check<R>(repo: &R) -> RepositoryResult<bool>
where
    R: EmployeeRepository + ?Sized,
{
    repo.health_check().await
}

// ==================== Employee Operations ====================

/// Create a new employee.
///
/// 1. Reject the request if another employee already uses the email
/// 2. Store the employee; any id on the input is discarded
///
/// # Returns
/// * `Ok(Employee)` - The stored employee with its assigned id
/// * `Err(RepositoryError::AlreadyExists)` - The email is taken
pub async fn create_employee<R>(repo: &R, employee: Employee) -> RepositoryResult<Employee>
where
    R: EmployeeRepository + ?Sized,
{
    if let Some(existing) = repo.find_by_email(&employee.email).await? {
        warn!(
            "rejecting employee create: email {} already used by {:?}",
            employee.email, existing.id
        );
        let mut context = ErrorContext::new("create_employee").with_entity("employee");
        if let Some(id) = existing.id {
            context = context.with_entity_id(id);
        }
        return Err(RepositoryError::already_exists_with_context(
            format!(
                "Employee already exists with the given email: {}",
                employee.email
            ),
            context,
        ));
    }

    let new_employee = Employee {
        id: None,
        ..employee
    };
    // Storage re-checks uniqueness atomically, so a concurrent create that
    // slips past the lookup above still fails with AlreadyExists.
    let saved = repo
        .save(&new_employee)
        .await
        .map_err(|e| e.with_operation("create_employee"))?;
    info!("created employee {:?} <{}>", saved.id, saved.email);
    Ok(saved)
}

/// List every employee, in storage order.
pub async fn list_employees<R>(repo: &R) -> RepositoryResult<Vec<Employee>>
where
    R: EmployeeRepository + ?Sized,
{
    let employees = repo.find_all().await?;
    debug!("listed {} employees", employees.len());
    Ok(employees)
}

/// Fetch one employee. Absence is `Ok(None)`, not an error.
pub async fn get_employee<R>(repo: &R, id: EmployeeId) -> RepositoryResult<Option<Employee>>
where
    R: EmployeeRepository + ?Sized,
{
    repo.find_by_id(id).await
}

/// Persist an employee that already has an id, overwriting every field.
///
/// No existence check happens here; callers that need a not-found answer
/// look the employee up first.
pub async fn update_employee<R>(repo: &R, employee: Employee) -> RepositoryResult<Employee>
where
    R: EmployeeRepository + ?Sized,
{
    let Some(id) = employee.id else {
        return Err(RepositoryError::validation_with_context(
            "Employee id is required for update",
            ErrorContext::new("update_employee").with_entity("employee"),
        ));
    };

    let saved = repo
        .save(&employee)
        .await
        .map_err(|e| e.with_operation("update_employee"))?;
    info!("updated employee {}", id);
    Ok(saved)
}

/// Delete an employee. Deleting an unknown id succeeds.
pub async fn delete_employee<R>(repo: &R, id: EmployeeId) -> RepositoryResult<()>
where
    R: EmployeeRepository + ?Sized,
{
    repo.delete_by_id(id).await?;
    info!("deleted employee {}", id);
    Ok(())
}

// ==================== Lookups ====================

pub async fn find_employee_by_email<R>(repo: &R, email: &str) -> RepositoryResult<Option<Employee>>
where
    R: EmployeeRepository + ?Sized,
{
    repo.find_by_email(email).await
}

pub async fn find_employee_by_name<R>(
    repo: &R,
    first_name: &str,
    last_name: &str,
) -> RepositoryResult<Option<Employee>>
where
    R: EmployeeRepository + ?Sized,
{
    repo.find_by_name(first_name, last_name).await
}
