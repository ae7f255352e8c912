//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::EmployeeRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn EmployeeRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn EmployeeRepository>) -> Self {
        Self { repository }
    }
}
