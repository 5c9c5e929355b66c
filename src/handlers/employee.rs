use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::errors::AppError;
use crate::models::employee::{EmployeeFields, EmployeeFilter};
use crate::services::employee::EmployeeService;
use crate::utils::multipart::{parse_employee_form, EmployeeFormData};
use crate::utils::validation::validate_payload;

// `age` arrives as a string and is coerced in the handler so a malformed
// value gets the same `{"error": ...}` JSON shape as every other client
// error, instead of the extractor's plain-text 400.
#[derive(Deserialize)]
pub struct EmployeeQueryParams {
    #[serde(rename = "idNumber")]
    id_number: Option<String>,
    age: Option<String>,
}

/// Presence checks and type coercion happen here, before any store is
/// touched. The multipart form carries every value as a string; `age` is
/// coerced to an integer.
fn employee_fields(form: &EmployeeFormData) -> Result<EmployeeFields, AppError> {
    let age_raw = form.require("age")?;
    let age: i32 = age_raw
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Field `age` must be an integer, got `{}`", age_raw)))?;

    let fields = EmployeeFields {
        name: form.require("name")?.to_string(),
        surname: form.require("surname")?.to_string(),
        age,
        id_number: form.require("idNumber")?.to_string(),
        role: form.require("role")?.to_string(),
    };
    validate_payload(&fields)?;

    Ok(fields)
}

pub async fn create_employee(
    service: web::Data<EmployeeService>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let form = parse_employee_form(payload, service.max_photo_bytes()).await?;
    let fields = employee_fields(&form)?;

    let employee = service.create(fields, form.photo).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Employee created successfully",
        "employee": employee,
    })))
}

pub async fn get_employees(
    service: web::Data<EmployeeService>,
    query: web::Query<EmployeeQueryParams>,
) -> Result<HttpResponse, AppError> {
    let age = match &query.age {
        Some(raw) => Some(raw.trim().parse::<i32>().map_err(|_| {
            AppError::BadRequest(format!("Query parameter `age` must be an integer, got `{}`", raw))
        })?),
        None => None,
    };

    let filter = EmployeeFilter {
        id_number: query.id_number.clone(),
        age,
    };

    let employees = service.list(&filter).await?;

    Ok(HttpResponse::Ok().json(employees))
}

pub async fn count_employees(service: web::Data<EmployeeService>) -> Result<HttpResponse, AppError> {
    let count = service.count().await?;

    Ok(HttpResponse::Ok().json(json!({ "count": count })))
}

pub async fn update_employee(
    service: web::Data<EmployeeService>,
    id: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let form = parse_employee_form(payload, service.max_photo_bytes()).await?;
    let fields = employee_fields(&form)?;

    let employee = service.update(&id.into_inner(), fields, form.photo).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee updated successfully",
        "employee": employee,
    })))
}

pub async fn delete_employee(
    service: web::Data<EmployeeService>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete(&id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deleted successfully",
    })))
}
