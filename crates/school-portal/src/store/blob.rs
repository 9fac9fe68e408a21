use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bucket names used by the workflows.
pub mod buckets {
    pub const PASSPORTS: &str = "passports";
    pub const JAMB_RESULTS: &str = "jamb-results";
    pub const OLEVEL_RESULTS: &str = "olevel-results";
    pub const RECEIPTS: &str = "receipts";
}

/// Stable reference to an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobRef {
    pub url: String,
    pub id: String,
}

/// File received from a client, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Stored document as returned by `BlobStore::get`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub stored_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlobError {
    #[error("uploaded file '{0}' is empty")]
    Empty(String),
    #[error("unknown bucket '{0}'")]
    InvalidBucket(String),
    #[error("blob store unavailable: {0}")]
    Unavailable(String),
}

/// Document storage collaborator. Implementations hand out `{url, id}` references.
pub trait BlobStore: Send + Sync {
    fn put(&self, bucket: &str, upload: BlobUpload) -> Result<BlobRef, BlobError>;
    fn get(&self, bucket: &str, id: &str) -> Result<Option<StoredBlob>, BlobError>;
    fn remove(&self, bucket: &str, id: &str) -> Result<(), BlobError>;
}

/// Process-local blob store. URLs point at the `/api/files/:bucket/:id` route.
#[derive(Debug, Clone)]
pub struct InMemoryBlobStore {
    public_url: String,
    blobs: Arc<Mutex<HashMap<(String, String), StoredBlob>>>,
}

impl InMemoryBlobStore {
    pub fn new(public_url: impl Into<String>) -> Self {
        Self {
            public_url: public_url.into().trim_end_matches('/').to_string(),
            blobs: Arc::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().map(|guard| guard.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new("")
    }
}

fn valid_bucket(bucket: &str) -> bool {
    !bucket.is_empty()
        && bucket
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn poisoned() -> BlobError {
    BlobError::Unavailable("blob store lock poisoned".to_string())
}

impl BlobStore for InMemoryBlobStore {
    fn put(&self, bucket: &str, upload: BlobUpload) -> Result<BlobRef, BlobError> {
        if !valid_bucket(bucket) {
            return Err(BlobError::InvalidBucket(bucket.to_string()));
        }
        if upload.bytes.is_empty() {
            return Err(BlobError::Empty(upload.file_name));
        }

        let content_type = upload
            .content_type
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| {
                mime_guess::from_path(&upload.file_name)
                    .first_or_octet_stream()
                    .to_string()
            });

        let id = Uuid::new_v4().simple().to_string();
        let blob = StoredBlob {
            file_name: upload.file_name,
            content_type,
            bytes: upload.bytes,
            stored_at: Utc::now(),
        };

        let mut guard = self.blobs.lock().map_err(|_| poisoned())?;
        guard.insert((bucket.to_string(), id.clone()), blob);

        Ok(BlobRef {
            url: format!("{}/api/files/{bucket}/{id}", self.public_url),
            id,
        })
    }

    fn get(&self, bucket: &str, id: &str) -> Result<Option<StoredBlob>, BlobError> {
        let guard = self.blobs.lock().map_err(|_| poisoned())?;
        Ok(guard.get(&(bucket.to_string(), id.to_string())).cloned())
    }

    fn remove(&self, bucket: &str, id: &str) -> Result<(), BlobError> {
        let mut guard = self.blobs.lock().map_err(|_| poisoned())?;
        guard.remove(&(bucket.to_string(), id.to_string()));
        Ok(())
    }
}
