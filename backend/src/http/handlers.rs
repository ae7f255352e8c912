//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use super::dto::{HealthResponse, EMPLOYEE_DELETED_MESSAGE};
use super::error::AppError;
use super::state::AppState;
use crate::api::{Employee, EmployeeId};
use crate::db::services as db_services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Reports whether the service is up and the storage backend reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Employee CRUD
// =============================================================================

/// POST /api/employees
///
/// 201 with the stored employee, 409 when the email is already used.
pub async fn create_employee(
    State(state): State<AppState>,
    Json(employee): Json<Employee>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    let created = db_services::create_employee(state.repository.as_ref(), employee).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/employees
pub async fn list_employees(State(state): State<AppState>) -> HandlerResult<Vec<Employee>> {
    let employees = db_services::list_employees(state.repository.as_ref()).await?;
    Ok(Json(employees))
}

/// GET /api/employees/{id}
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<Employee> {
    db_services::get_employee(state.repository.as_ref(), EmployeeId::new(id))
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// PUT /api/employees/{id}
///
/// The path id wins over any id in the body. Unknown ids answer 404 and
/// leave storage untouched.
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<Employee>,
) -> HandlerResult<Employee> {
    let id = EmployeeId::new(id);
    let repo = state.repository.as_ref();

    if db_services::get_employee(repo, id).await?.is_none() {
        debug!("update of unknown employee {}", id);
        return Err(AppError::NotFound);
    }

    let employee = Employee {
        id: Some(id),
        ..changes
    };
    let updated = db_services::update_employee(repo, employee).await?;
    Ok(Json(updated))
}

/// DELETE /api/employees/{id}
///
/// Always answers with the same text, whether or not the id existed.
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<&'static str, AppError> {
    db_services::delete_employee(state.repository.as_ref(), EmployeeId::new(id)).await?;
    Ok(EMPLOYEE_DELETED_MESSAGE)
}
