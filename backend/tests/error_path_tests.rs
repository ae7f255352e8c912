//! Error path testing for db/services.rs and db/repository/error.rs.
//!
//! These tests trigger failures on purpose and check how errors are
//! classified and enriched on their way up the stack.

mod support;

use employee_api::api::{Employee, EmployeeId};
use employee_api::db::repositories::LocalRepository;
use employee_api::db::repository::{EmployeeRepository, ErrorContext, RepositoryError};
use employee_api::db::services;
use support::fixtures::{cena, romulo};

// =========================================================
// Service Error Tests
// =========================================================

#[tokio::test]
async fn test_blank_fields_are_not_rejected() {
    let repo = LocalRepository::new();
    let cases = [
        Employee::new("  ", "Gomes", "r1@teste.com"),
        Employee::new("Romulo", "", "r2@teste.com"),
        Employee::new("Romulo", "Gomes", "\t"),
    ];

    for employee in cases {
        let saved = services::create_employee(&repo, employee.clone())
            .await
            .unwrap();
        assert_eq!(saved.email, employee.email);
    }
    assert_eq!(repo.employee_count(), 3);
}

#[tokio::test]
async fn test_update_without_id_is_validation_error() {
    let repo = LocalRepository::new();
    let err = services::update_employee(&repo, romulo()).await.unwrap_err();

    assert!(matches!(err, RepositoryError::ValidationError { .. }));
    assert_eq!(err.context().operation.as_deref(), Some("update_employee"));
}

#[tokio::test]
async fn test_update_unknown_id_through_service_is_not_found() {
    let repo = LocalRepository::new();
    let err = services::update_employee(&repo, romulo().with_id(EmployeeId(8)))
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::NotFound { .. }));
    assert_eq!(err.context().operation.as_deref(), Some("update_employee"));
    assert_eq!(repo.employee_count(), 0);
}

#[tokio::test]
async fn test_unhealthy_repository_fails_every_operation() {
    let repo = LocalRepository::new();
    let saved = repo.save(&cena()).await.unwrap();
    repo.set_healthy(false);

    let id = saved.id.unwrap();
    assert!(services::create_employee(&repo, romulo()).await.is_err());
    assert!(services::get_employee(&repo, id).await.is_err());
    assert!(services::delete_employee(&repo, id).await.is_err());
    assert!(services::find_employee_by_email(&repo, "cena@teste.com")
        .await
        .is_err());

    let err = services::list_employees(&repo).await.unwrap_err();
    assert!(matches!(err, RepositoryError::ConnectionError { .. }));

    repo.set_healthy(true);
    assert_eq!(services::list_employees(&repo).await.unwrap().len(), 1);
}

// =========================================================
// RepositoryError Tests
// =========================================================

#[test]
fn test_error_display_includes_message() {
    let err = RepositoryError::already_exists("Employee already exists with the given email: a@b.c");
    assert!(err.to_string().contains("a@b.c"));
    assert_eq!(
        err.message(),
        "Employee already exists with the given email: a@b.c"
    );
}

#[test]
fn test_with_operation_overrides_context() {
    let err = RepositoryError::not_found_with_context(
        "missing",
        ErrorContext::new("save").with_entity("employee").with_entity_id(5),
    )
    .with_operation("update_employee");

    let ctx = err.context();
    assert_eq!(ctx.operation.as_deref(), Some("update_employee"));
    assert_eq!(ctx.entity.as_deref(), Some("employee"));
    assert_eq!(ctx.entity_id.as_deref(), Some("5"));
}

#[test]
fn test_context_renders_after_message() {
    let err = RepositoryError::connection_with_context(
        "reset",
        ErrorContext::new("find_all").with_details("pool closed"),
    );
    assert_eq!(
        err.to_string(),
        "Connection error: reset [operation=find_all, details=pool closed]"
    );
}

#[test]
fn test_string_conversions_are_internal_errors() {
    let from_str: RepositoryError = "boom".into();
    let from_string: RepositoryError = String::from("bang").into();
    assert!(matches!(from_str, RepositoryError::InternalError { .. }));
    assert!(matches!(from_string, RepositoryError::InternalError { .. }));
}
