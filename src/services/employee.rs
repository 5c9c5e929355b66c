use log::warn;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::db::EmployeeStore;
use crate::errors::AppError;
use crate::models::employee::{Employee, EmployeeFields, EmployeeFilter};
use crate::storage::BlobStore;
use crate::utils::multipart::UploadedPhoto;

/// Orchestrates employee CRUD against the injected document and blob
/// stores. Stateless between requests; every external call is awaited in
/// dependency order under a bounded timeout.
pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
    blobs: Arc<dyn BlobStore>,
    call_timeout: Duration,
    max_photo_bytes: usize,
}

impl EmployeeService {
    pub fn new(
        store: Arc<dyn EmployeeStore>,
        blobs: Arc<dyn BlobStore>,
        call_timeout: Duration,
        max_photo_bytes: usize,
    ) -> Self {
        Self {
            store,
            blobs,
            call_timeout,
            max_photo_bytes,
        }
    }

    /// Byte cap the upload parser applies to incoming photos.
    pub fn max_photo_bytes(&self) -> usize {
        self.max_photo_bytes
    }

    /// If a photo is supplied, it is uploaded before the document write so a
    /// failed upload never leaves an orphaned record referencing nothing.
    pub async fn create(
        &self,
        fields: EmployeeFields,
        photo: Option<UploadedPhoto>,
    ) -> Result<Employee, AppError> {
        let photo_url = match photo {
            Some(photo) => Some(self.store_photo(photo).await?),
            None => None,
        };

        self.bounded("employee insert", self.store.insert(&fields, photo_url.as_deref()))
            .await
    }

    /// Records matching all supplied filters. An empty result is a valid
    /// response, filtered or not; it is never reported as not-found.
    pub async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, AppError> {
        self.bounded("employee query", self.store.list(filter)).await
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        self.bounded("employee count", self.store.count()).await
    }

    /// Whole-record replacement. A new photo replaces the stored blob (old
    /// blob removed best-effort, new one uploaded under a fresh key); without
    /// one the stored photo URL is preserved.
    pub async fn update(
        &self,
        id: &str,
        fields: EmployeeFields,
        photo: Option<UploadedPhoto>,
    ) -> Result<Employee, AppError> {
        let existing = self
            .bounded("employee lookup", self.store.get(id))
            .await?
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

        let new_photo_url = match photo {
            Some(photo) => {
                if let Some(old_url) = &existing.photo_url {
                    self.discard_photo(old_url).await;
                }
                Some(self.store_photo(photo).await?)
            }
            None => None,
        };

        self.bounded(
            "employee update",
            self.store.update(id, &fields, new_photo_url.as_deref()),
        )
        .await?;

        Ok(Employee {
            id: existing.id,
            name: fields.name,
            surname: fields.surname,
            age: fields.age,
            id_number: fields.id_number,
            role: fields.role,
            photo_url: new_photo_url.or(existing.photo_url),
            created_at: existing.created_at,
        })
    }

    /// Removes the document, then its blob if one was referenced. Blob
    /// cleanup is best-effort: the record is already gone, so a failed blob
    /// delete is logged and the request still succeeds.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let existing = self
            .bounded("employee lookup", self.store.get(id))
            .await?
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

        self.bounded("employee delete", self.store.delete(id)).await?;

        if let Some(photo_url) = &existing.photo_url {
            self.discard_photo(photo_url).await;
        }

        Ok(())
    }

    async fn store_photo(&self, photo: UploadedPhoto) -> Result<String, AppError> {
        let key = photo_key(&photo.filename);
        self.bounded("photo upload", self.blobs.put(&key, photo.bytes, &photo.content_type))
            .await?;
        self.bounded("photo url", self.blobs.url_for(&key)).await
    }

    async fn discard_photo(&self, photo_url: &str) {
        let Some(key) = self.blobs.key_for_url(photo_url) else {
            warn!("Could not derive a blob key from photo URL {}", photo_url);
            return;
        };

        if let Err(err) = self.bounded("photo delete", self.blobs.delete(&key)).await {
            warn!("Failed to delete photo blob {}: {}", key, err);
        }
    }

    async fn bounded<T>(
        &self,
        what: &str,
        fut: impl Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        match tokio::time::timeout(self.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout(format!(
                "{} did not complete within {:?}",
                what, self.call_timeout
            ))),
        }
    }
}

/// Collision-resistant blob key: a fresh UUID namespaces each upload, the
/// sanitized original filename keeps keys readable and URL-safe without
/// percent-encoding.
fn photo_key(filename: &str) -> String {
    format!("employees/{}/{}", Uuid::new_v4(), sanitize_filename(filename))
}

fn sanitize_filename(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        "photo".to_string()
    } else {
        sanitized
    }
}
