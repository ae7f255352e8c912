//! Public API surface for the employee backend.
//!
//! This file holds the entity types shared by the HTTP layer, the service
//! layer and every repository implementation. All types derive
//! Serialize/Deserialize for JSON serialization.

use serde::{Deserialize, Serialize};

/// Employee identifier (database primary key).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EmployeeId(pub i64);

impl EmployeeId {
    pub fn new(value: i64) -> Self {
        EmployeeId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EmployeeId> for i64 {
    fn from(id: EmployeeId) -> Self {
        id.0
    }
}

impl From<i64> for EmployeeId {
    fn from(value: i64) -> Self {
        EmployeeId(value)
    }
}

/// An employee record.
///
/// The JSON representation uses camelCase keys:
/// `{"id": 1, "firstName": "Romulo", "lastName": "Gomes", "email": "romulo@teste.com"}`.
/// `id` is `None` until the record has been stored; it may be omitted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default)]
    pub id: Option<EmployeeId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Employee {
    /// Create an employee that has not been stored yet.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    /// Return a copy of this employee carrying `id`.
    pub fn with_id(mut self, id: EmployeeId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether this employee matches the given first and last name exactly.
    pub fn has_name(&self, first_name: &str, last_name: &str) -> bool {
        self.first_name == first_name && self.last_name == last_name
    }
}
