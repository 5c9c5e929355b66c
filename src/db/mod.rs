use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::employee::{Employee, EmployeeFields, EmployeeFilter};

pub async fn create_pool(database_url: &str) -> PgPool {
    PgPool::connect(database_url)
        .await
        .expect("Failed to connect to the database")
}

/// Document-store surface for employee records. Identifiers are opaque
/// strings; the store assigns one on insert. Injected as an `Arc<dyn
/// EmployeeStore>` so tests can substitute an in-memory fake.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Write a new record and return it with its assigned identifier.
    async fn insert(&self, fields: &EmployeeFields, photo_url: Option<&str>) -> Result<Employee, AppError>;

    /// Fetch one record; an unknown identifier yields `Ok(None)`.
    async fn get(&self, id: &str) -> Result<Option<Employee>, AppError>;

    /// All records matching the filter, in store-defined order.
    async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, AppError>;

    /// Total number of records in the collection.
    async fn count(&self) -> Result<i64, AppError>;

    /// Whole-record replacement. `photo_url` of `None` leaves the stored
    /// photo URL untouched; callers are expected to have checked existence.
    async fn update(&self, id: &str, fields: &EmployeeFields, photo_url: Option<&str>) -> Result<(), AppError>;

    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

pub struct PostgresEmployeeStore {
    pool: PgPool,
}

impl PostgresEmployeeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const EMPLOYEE_COLUMNS: &str = "id, name, surname, age, id_number, role, photo_url, created_at";

#[async_trait]
impl EmployeeStore for PostgresEmployeeStore {
    async fn insert(&self, fields: &EmployeeFields, photo_url: Option<&str>) -> Result<Employee, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO employees (id, name, surname, age, id_number, role, photo_url, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.surname)
        .bind(fields.age)
        .bind(&fields.id_number)
        .bind(&fields.role)
        .bind(photo_url)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|err| AppError::Write(err.to_string()))?;

        Ok(Employee {
            id,
            name: fields.name.clone(),
            surname: fields.surname.clone(),
            age: fields.age,
            id_number: fields.id_number.clone(),
            role: fields.role.clone(),
            photo_url: photo_url.map(String::from),
            created_at: now,
        })
    }

    async fn get(&self, id: &str) -> Result<Option<Employee>, AppError> {
        // An identifier this store never issued cannot match anything.
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        sqlx::query_as::<_, Employee>(&format!(
            "SELECT {} FROM employees WHERE id = $1",
            EMPLOYEE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| AppError::Read(err.to_string()))
    }

    async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, AppError> {
        let mut query_builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM employees", EMPLOYEE_COLUMNS));

        let mut has_where = false;
        if let Some(id_number) = &filter.id_number {
            query_builder.push(" WHERE id_number = ");
            query_builder.push_bind(id_number);
            has_where = true;
        }
        if let Some(age) = filter.age {
            query_builder.push(if has_where { " AND age = " } else { " WHERE age = " });
            query_builder.push_bind(age);
        }

        query_builder
            .build_query_as::<Employee>()
            .fetch_all(&self.pool)
            .await
            .map_err(|err| AppError::Read(err.to_string()))
    }

    async fn count(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await
            .map_err(|err| AppError::Read(err.to_string()))
    }

    async fn update(&self, id: &str, fields: &EmployeeFields, photo_url: Option<&str>) -> Result<(), AppError> {
        let id = Uuid::parse_str(id).map_err(|_| AppError::NotFound("Employee not found".to_string()))?;

        sqlx::query(
            "UPDATE employees SET name = $1, surname = $2, age = $3, id_number = $4, role = $5, \
             photo_url = COALESCE($6, photo_url) WHERE id = $7",
        )
        .bind(&fields.name)
        .bind(&fields.surname)
        .bind(fields.age)
        .bind(&fields.id_number)
        .bind(&fields.role)
        .bind(photo_url)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|err| AppError::Write(err.to_string()))?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let id = Uuid::parse_str(id).map_err(|_| AppError::NotFound("Employee not found".to_string()))?;

        sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| AppError::Write(err.to_string()))?;

        Ok(())
    }
}
