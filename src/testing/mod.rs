//! In-memory fakes standing in for the Postgres and S3 collaborators.
//! Injected through the same `Arc<dyn Trait>` handles production uses.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::db::EmployeeStore;
use crate::errors::AppError;
use crate::models::employee::{Employee, EmployeeFields, EmployeeFilter};
use crate::storage::BlobStore;

#[derive(Default)]
pub struct MemoryEmployeeStore {
    rows: Mutex<Vec<Employee>>,
}

#[async_trait]
impl EmployeeStore for MemoryEmployeeStore {
    async fn insert(&self, fields: &EmployeeFields, photo_url: Option<&str>) -> Result<Employee, AppError> {
        let employee = Employee {
            id: Uuid::new_v4(),
            name: fields.name.clone(),
            surname: fields.surname.clone(),
            age: fields.age,
            id_number: fields.id_number.clone(),
            role: fields.role.clone(),
            photo_url: photo_url.map(String::from),
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(employee.clone());
        Ok(employee)
    }

    async fn get(&self, id: &str) -> Result<Option<Employee>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|e| e.id.to_string() == id).cloned())
    }

    async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|e| {
                filter.id_number.as_ref().map_or(true, |idn| &e.id_number == idn)
                    && filter.age.map_or(true, |age| e.age == age)
            })
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.rows.lock().unwrap().len() as i64)
    }

    async fn update(&self, id: &str, fields: &EmployeeFields, photo_url: Option<&str>) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|e| e.id.to_string() == id) {
            row.name = fields.name.clone();
            row.surname = fields.surname.clone();
            row.age = fields.age;
            row.id_number = fields.id_number.clone();
            row.role = fields.role.clone();
            if let Some(photo_url) = photo_url {
                row.photo_url = Some(photo_url.to_string());
            }
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.rows.lock().unwrap().retain(|e| e.id.to_string() != id);
        Ok(())
    }
}

const FAKE_URL_PREFIX: &str = "https://blobs.test/";

/// Records every stored object and delete call so tests can assert on
/// blob-store interactions; `fail_puts` and `fail_deletes` simulate
/// blob-store outages.
#[derive(Default)]
pub struct MemoryBlobStore {
    pub objects: Mutex<HashMap<String, (String, Vec<u8>)>>,
    pub deletes: Mutex<Vec<String>>,
    fail_puts: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryBlobStore {
    pub fn fail_puts(&self) {
        self.fail_puts.store(true, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(AppError::Upload("simulated upload failure".to_string()));
        }
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (content_type.to_string(), bytes));
        Ok(())
    }

    async fn url_for(&self, key: &str) -> Result<String, AppError> {
        Ok(format!("{}{}", FAKE_URL_PREFIX, key))
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            // The blob stays behind, as it would after a real outage.
            return Err(AppError::Upload("simulated delete failure".to_string()));
        }
        // Deleting a missing key succeeds, matching S3 semantics.
        self.objects.lock().unwrap().remove(key);
        self.deletes.lock().unwrap().push(key.to_string());
        Ok(())
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(FAKE_URL_PREFIX)
            .filter(|key| !key.is_empty())
            .map(String::from)
    }
}

/// Wraps `MemoryEmployeeStore` with a fixed per-call delay so tests can
/// drive the bounded-timeout path.
pub struct SlowEmployeeStore {
    pub inner: MemoryEmployeeStore,
    pub delay: std::time::Duration,
}

impl SlowEmployeeStore {
    pub fn new(delay: std::time::Duration) -> Self {
        Self {
            inner: MemoryEmployeeStore::default(),
            delay,
        }
    }

    async fn lag(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

#[async_trait]
impl EmployeeStore for SlowEmployeeStore {
    async fn insert(&self, fields: &EmployeeFields, photo_url: Option<&str>) -> Result<Employee, AppError> {
        self.lag().await;
        self.inner.insert(fields, photo_url).await
    }

    async fn get(&self, id: &str) -> Result<Option<Employee>, AppError> {
        self.lag().await;
        self.inner.get(id).await
    }

    async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, AppError> {
        self.lag().await;
        self.inner.list(filter).await
    }

    async fn count(&self) -> Result<i64, AppError> {
        self.lag().await;
        self.inner.count().await
    }

    async fn update(&self, id: &str, fields: &EmployeeFields, photo_url: Option<&str>) -> Result<(), AppError> {
        self.lag().await;
        self.inner.update(id, fields, photo_url).await
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.lag().await;
        self.inner.delete(id).await
    }
}
