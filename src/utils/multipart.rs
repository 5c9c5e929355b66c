use actix_multipart::Multipart;
use futures_util::StreamExt;
use std::collections::HashMap;

use crate::errors::AppError;

/// Field name under which a photo may be attached to create/update requests.
pub const PHOTO_FIELD: &str = "photo";

/// A fully buffered photo upload.
#[derive(Debug, Clone)]
pub struct UploadedPhoto {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// The drained contents of a `multipart/form-data` request: text fields by
/// name plus at most one photo. A missing photo is not an error; it means
/// "no photo change".
#[derive(Debug)]
pub struct EmployeeFormData {
    pub text: HashMap<String, String>,
    pub photo: Option<UploadedPhoto>,
}

impl EmployeeFormData {
    pub fn require(&self, field: &str) -> Result<&str, AppError> {
        self.text
            .get(field)
            .map(String::as_str)
            .ok_or_else(|| AppError::BadRequest(format!("Missing required field `{}`", field)))
    }
}

/// Drain a multipart payload into memory, capping the photo at
/// `max_photo_bytes`. Oversized uploads and malformed payloads are client
/// errors; no store is touched before parsing completes.
pub async fn parse_employee_form(
    mut payload: Multipart,
    max_photo_bytes: usize,
) -> Result<EmployeeFormData, AppError> {
    let mut text = HashMap::new();
    let mut photo: Option<UploadedPhoto> = None;

    while let Some(item) = payload.next().await {
        let mut field = item
            .map_err(|err| AppError::BadRequest(format!("Malformed multipart payload: {}", err)))?;
        let name = field.name().to_string();

        if name == PHOTO_FIELD {
            if photo.is_some() {
                return Err(AppError::BadRequest("At most one photo per request".to_string()));
            }

            let filename = field
                .content_disposition()
                .get_filename()
                .map(str::to_string)
                .ok_or_else(|| AppError::BadRequest("Photo field is missing a filename".to_string()))?;
            let declared_type = field.content_type().map(|mime| mime.to_string());

            let mut bytes = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk = chunk
                    .map_err(|err| AppError::BadRequest(format!("Failed to read photo: {}", err)))?;
                if bytes.len() + chunk.len() > max_photo_bytes {
                    return Err(AppError::BadRequest(format!(
                        "Photo exceeds the {} byte upload limit",
                        max_photo_bytes
                    )));
                }
                bytes.extend_from_slice(&chunk);
            }

            let content_type = resolve_content_type(declared_type, &bytes);
            photo = Some(UploadedPhoto {
                filename,
                content_type,
                bytes,
            });
        } else {
            let mut value = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk = chunk
                    .map_err(|err| AppError::BadRequest(format!("Failed to read field `{}`: {}", name, err)))?;
                value.extend_from_slice(&chunk);
            }
            let value = String::from_utf8(value)
                .map_err(|_| AppError::BadRequest(format!("Field `{}` is not valid UTF-8", name)))?;
            text.insert(name, value);
        }
    }

    Ok(EmployeeFormData { text, photo })
}

/// Prefer the client-declared content type; fall back to sniffing the bytes
/// when it is absent or the generic octet-stream default.
fn resolve_content_type(declared: Option<String>, bytes: &[u8]) -> String {
    match declared {
        Some(declared) if declared != "application/octet-stream" => declared,
        _ => infer::get(bytes)
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string()),
    }
}
