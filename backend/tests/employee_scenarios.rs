//! Acceptance scenarios for the employee API, written as Given/When/Then steps.
//!
//! Each scenario starts from empty storage and talks to the router the way
//! an HTTP client would.

#![cfg(feature = "http-server")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use employee_api::api::Employee;
use employee_api::db::repositories::LocalRepository;
use employee_api::db::repository::EmployeeRepository;
use employee_api::http::{create_router, AppState};

/// State shared between the steps of one scenario.
struct World {
    repo: Arc<LocalRepository>,
    employees: Vec<Employee>,
    status: Option<StatusCode>,
    body: Value,
}

impl World {
    fn new() -> Self {
        Self {
            repo: Arc::new(LocalRepository::new()),
            employees: Vec::new(),
            status: None,
            body: Value::Null,
        }
    }

    // ---------- Given ----------

    fn given_an_employee(&mut self) -> &mut Self {
        self.employees = vec![Employee::new("Everson", "Santos", "rhevs@teste.com")];
        self
    }

    async fn given_two_saved_employees(&mut self) -> &mut Self {
        self.employees = vec![
            Employee::new("Everson", "Santos", "rhevs@teste.com"),
            Employee::new("Romulo", "Gomes", "romulo@teste.com"),
        ];
        self.repo.save_all(&self.employees).await.unwrap();
        self
    }

    // ---------- When ----------

    async fn when_posting_to(&mut self, uri: &str) -> &mut Self {
        let body = serde_json::to_string(&self.employees[0]).unwrap();
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn when_getting(&mut self, uri: &str) -> &mut Self {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    async fn send(&mut self, request: Request<Body>) -> &mut Self {
        let repo = Arc::clone(&self.repo) as Arc<dyn EmployeeRepository>;
        let response = create_router(AppState::new(repo))
            .oneshot(request)
            .await
            .unwrap();
        self.status = Some(response.status());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        self.body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        self
    }

    // ---------- Then ----------

    fn then_status_is(&mut self, expected: u16) -> &mut Self {
        assert_eq!(self.status.map(|s| s.as_u16()), Some(expected));
        self
    }

    fn then_response_contains_saved_employee(&mut self) -> &mut Self {
        let expected = &self.employees[0];
        assert!(self.body["id"].is_i64());
        assert_eq!(self.body["firstName"], expected.first_name.as_str());
        assert_eq!(self.body["lastName"], expected.last_name.as_str());
        assert_eq!(self.body["email"], expected.email.as_str());
        self
    }

    async fn then_employee_is_persisted(&mut self) -> &mut Self {
        let email = &self.employees[0].email;
        assert!(self.repo.find_by_email(email).await.unwrap().is_some());
        self
    }

    fn then_response_lists_employees(&mut self) -> &mut Self {
        let list = self.body.as_array().cloned().unwrap_or_default();
        assert_eq!(list.len(), self.employees.len());
        for (entry, employee) in list.iter().zip(&self.employees) {
            assert_eq!(entry["firstName"], employee.first_name.as_str());
            assert_eq!(entry["lastName"], employee.last_name.as_str());
        }
        self
    }
}

#[tokio::test]
async fn scenario_register_a_new_employee() {
    let mut world = World::new();
    world.given_an_employee();
    world.when_posting_to("/api/employees").await;
    world
        .then_status_is(201)
        .then_response_contains_saved_employee();
    world.then_employee_is_persisted().await;
}

#[tokio::test]
async fn scenario_list_saved_employees() {
    let mut world = World::new();
    world.given_two_saved_employees().await;
    world.when_getting("/api/employees").await;
    world.then_status_is(200).then_response_lists_employees();
}

#[tokio::test]
async fn scenario_register_an_employee_twice() {
    let mut world = World::new();
    world.given_an_employee();
    world.when_posting_to("/api/employees").await;
    world.then_status_is(201);

    world.when_posting_to("/api/employees").await;
    world.then_status_is(409);
    assert_eq!(world.repo.employee_count(), 1);
}
