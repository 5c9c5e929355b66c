use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A persisted employee record. Serialized in the camelCase shape the API
/// exposes: `{ id, name, surname, age, idNumber, role, photoUrl, createdAt }`.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub age: i32,
    pub id_number: String,
    pub role: String,
    pub photo_url: Option<String>,
    pub created_at: chrono::DateTime<Utc>,
}

/// The full replaceable field set of an employee, already coerced and ready
/// for validation. Updates are whole-record replacement, so this is the unit
/// both create and update operate on.
#[derive(Debug, Clone, Validate)]
pub struct EmployeeFields {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "surname must not be empty"))]
    pub surname: String,
    #[validate(range(min = 0, message = "age must not be negative"))]
    pub age: i32,
    #[validate(length(min = 1, message = "idNumber must not be empty"))]
    pub id_number: String,
    #[validate(length(min = 1, message = "role must not be empty"))]
    pub role: String,
}

/// Equality filters for list queries. All supplied filters are ANDed.
#[derive(Debug, Default, Clone)]
pub struct EmployeeFilter {
    pub id_number: Option<String>,
    pub age: Option<i32>,
}
