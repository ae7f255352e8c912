//! Data Transfer Objects for the HTTP API.
//!
//! Employee bodies travel as [`crate::api::Employee`] directly; only the
//! envelope types that have no domain counterpart live here.

use serde::{Deserialize, Serialize};

pub use crate::api::{Employee, EmployeeId};

/// Fixed body returned by `DELETE /api/employees/{id}`.
pub const EMPLOYEE_DELETED_MESSAGE: &str = "Employee deleted successfully!";

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// API version
    pub version: String,
    /// Storage connectivity: "connected", "disconnected" or "error: ..."
    pub database: String,
}
