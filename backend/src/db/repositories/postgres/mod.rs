//! Employee storage on PostgreSQL through Diesel.
//!
//! Connections come from an r2d2 pool. Diesel is synchronous, so every call
//! runs on tokio's blocking pool. The `employees` table is created by an
//! embedded migration when the repository connects; its `UNIQUE (email)`
//! constraint backs the one-employee-per-email rule even when two creates
//! race.
//!
//! Each call makes a single attempt. A failure is reported to the caller as
//! it happened.

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::sql_types::Text;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{debug, info};

use crate::api::{Employee, EmployeeId};
use crate::db::repository::{
    EmployeeRepository, ErrorContext, RepositoryError, RepositoryResult,
};

mod config;
mod models;
mod schema;

pub use config::PostgresConfig;
use models::{EmployeeRow, NewEmployeeRow};
use schema::employees;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

const FIND_BY_NAME_SQL: &str = "SELECT id, first_name, last_name, email FROM employees \
     WHERE first_name = $1 AND last_name = $2 ORDER BY id LIMIT 1";

/// Employee repository backed by a pooled PostgreSQL database.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Build the pool and bring the schema up to date.
    ///
    /// Blocks while connecting; async callers should go through
    /// `spawn_blocking`.
    pub fn connect(config: &PostgresConfig) -> RepositoryResult<Self> {
        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(config.connection_timeout())
            .idle_timeout(Some(config.idle_timeout()))
            .test_on_check_out(true)
            .build(ConnectionManager::<PgConnection>::new(&config.database_url))
            .map_err(|e| {
                RepositoryError::connection_with_context(e.to_string(), ErrorContext::new("connect"))
            })?;

        let mut conn = pool.get()?;
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("connect"),
            )
        })?;
        info!(
            "postgres employee store ready ({} migrations applied, pool max {})",
            applied.len(),
            config.max_pool_size
        );

        Ok(Self { pool })
    }

    /// Run `query` once on a pooled connection, off the async workers.
    async fn run<T, F>(&self, operation: &'static str, query: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            query(&mut conn)
        })
        .await
        .map_err(|e| RepositoryError::internal(format!("Blocking task failed: {}", e)))?
        .map_err(|e| e.with_operation(operation))
    }
}

/// Insert a new row, or overwrite the row with `id`.
fn write_row(
    conn: &mut PgConnection,
    id: Option<EmployeeId>,
    row: &NewEmployeeRow,
) -> RepositoryResult<Employee> {
    let stored: EmployeeRow = match id {
        None => diesel::insert_into(employees::table)
            .values(row)
            .returning(EmployeeRow::as_returning())
            .get_result(conn)?,
        Some(id) => diesel::update(employees::table.find(id.value()))
            .set(row)
            .returning(EmployeeRow::as_returning())
            .get_result(conn)
            .optional()?
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Employee {} not found", id),
                    ErrorContext::default()
                        .with_entity("employee")
                        .with_entity_id(id),
                )
            })?,
    };
    Ok(stored.into())
}

#[async_trait]
impl EmployeeRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.run("health_check", |conn| {
            sql_query("SELECT 1").execute(conn)?;
            Ok(true)
        })
        .await
    }

    async fn save(&self, employee: &Employee) -> RepositoryResult<Employee> {
        let (id, row) = (employee.id, NewEmployeeRow::from(employee));
        self.run("save", move |conn| write_row(conn, id, &row)).await
    }

    /// Every employee is written in one transaction; a failure leaves the
    /// table as it was.
    async fn save_all(&self, employees: &[Employee]) -> RepositoryResult<Vec<Employee>> {
        let batch: Vec<_> = employees
            .iter()
            .map(|e| (e.id, NewEmployeeRow::from(e)))
            .collect();
        self.run("save_all", move |conn| {
            conn.transaction::<_, RepositoryError, _>(|tx| {
                batch
                    .iter()
                    .map(|(id, row)| write_row(tx, *id, row))
                    .collect()
            })
        })
        .await
    }

    async fn delete_by_id(&self, id: EmployeeId) -> RepositoryResult<()> {
        self.run("delete_by_id", move |conn| {
            let removed = diesel::delete(employees::table.find(id.value())).execute(conn)?;
            debug!("postgres delete {} removed {} rows", id, removed);
            Ok(())
        })
        .await
    }

    async fn delete_all(&self) -> RepositoryResult<usize> {
        self.run("delete_all", |conn| {
            Ok(diesel::delete(employees::table).execute(conn)?)
        })
        .await
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Employee>> {
        self.run("find_all", |conn| {
            let rows: Vec<EmployeeRow> = employees::table
                .select(EmployeeRow::as_select())
                .order(employees::id.asc())
                .load(conn)?;
            Ok(rows.into_iter().map(Employee::from).collect())
        })
        .await
    }

    async fn find_by_id(&self, id: EmployeeId) -> RepositoryResult<Option<Employee>> {
        self.run("find_by_id", move |conn| {
            let row: Option<EmployeeRow> = employees::table
                .find(id.value())
                .select(EmployeeRow::as_select())
                .first(conn)
                .optional()?;
            Ok(row.map(Employee::from))
        })
        .await
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Employee>> {
        let email = email.to_owned();
        self.run("find_by_email", move |conn| {
            let row: Option<EmployeeRow> = employees::table
                .filter(employees::email.eq(email))
                .select(EmployeeRow::as_select())
                .first(conn)
                .optional()?;
            Ok(row.map(Employee::from))
        })
        .await
    }

    async fn find_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepositoryResult<Option<Employee>> {
        let (first, last) = (first_name.to_owned(), last_name.to_owned());
        self.run("find_by_name", move |conn| {
            let row: Option<EmployeeRow> = employees::table
                .filter(employees::first_name.eq(first))
                .filter(employees::last_name.eq(last))
                .order(employees::id.asc())
                .select(EmployeeRow::as_select())
                .first(conn)
                .optional()?;
            Ok(row.map(Employee::from))
        })
        .await
    }

    async fn find_by_name_native(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepositoryResult<Option<Employee>> {
        let (first, last) = (first_name.to_owned(), last_name.to_owned());
        self.run("find_by_name_native", move |conn| {
            let row: Option<EmployeeRow> = sql_query(FIND_BY_NAME_SQL)
                .bind::<Text, _>(first)
                .bind::<Text, _>(last)
                .get_result(conn)
                .optional()?;
            Ok(row.map(Employee::from))
        })
        .await
    }

    async fn count(&self) -> RepositoryResult<usize> {
        self.run("count", |conn| {
            let total: i64 = employees::table.count().get_result(conn)?;
            Ok(usize::try_from(total).unwrap_or_default())
        })
        .await
    }
}
