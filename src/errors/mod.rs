use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

/// Crate-wide error taxonomy. Handlers return `Result<HttpResponse, AppError>`
/// and collaborator failures are converted at the call site with `map_err`.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed request data; never reaches a store.
    BadRequest(String),
    /// No document exists for the given identifier.
    NotFound(String),
    /// Blob store write or delete failure.
    Upload(String),
    /// Document store write failure.
    Write(String),
    /// Document store read or query failure.
    Read(String),
    /// An external call exceeded its bounded timeout; retryable.
    Timeout(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Upload(msg) => write!(f, "Upload Error: {}", msg),
            AppError::Write(msg) => write!(f, "Write Error: {}", msg),
            AppError::Read(msg) => write!(f, "Read Error: {}", msg),
            AppError::Timeout(msg) => write!(f, "Timed Out: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(ErrorResponse { error: msg.clone() }),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(ErrorResponse { error: msg.clone() }),
            AppError::Upload(msg) => HttpResponse::InternalServerError().json(ErrorResponse { error: msg.clone() }),
            AppError::Write(msg) => HttpResponse::InternalServerError().json(ErrorResponse { error: msg.clone() }),
            AppError::Read(msg) => HttpResponse::InternalServerError().json(ErrorResponse { error: msg.clone() }),
            AppError::Timeout(msg) => HttpResponse::ServiceUnavailable().json(ErrorResponse { error: msg.clone() }),
        }
    }
}
