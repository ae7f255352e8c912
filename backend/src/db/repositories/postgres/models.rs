use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};

use super::schema::employees;
use crate::api::{Employee, EmployeeId};

#[derive(Debug, Clone, Queryable, Selectable, QueryableByName)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EmployeeRow {
    #[diesel(sql_type = BigInt)]
    pub id: i64,
    #[diesel(sql_type = Text)]
    pub first_name: String,
    #[diesel(sql_type = Text)]
    pub last_name: String,
    #[diesel(sql_type = Text)]
    pub email: String,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = employees)]
pub struct NewEmployeeRow {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            id: Some(EmployeeId(row.id)),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
        }
    }
}

impl From<&Employee> for NewEmployeeRow {
    fn from(employee: &Employee) -> Self {
        NewEmployeeRow {
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            email: employee.email.clone(),
        }
    }
}
