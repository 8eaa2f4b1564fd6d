//! Document storage
//!
//! Uploads live on disk as `<upload_dir>/<uuid>.<ext>`. The store owns
//! upload validation, write verification, metadata listing, and a
//! short-lived cache of extracted text.

mod extract;

pub use extract::ExtractError;

use crate::cache::TtlCache;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// TTL for cached extracted text
const CONTENT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file type not allowed: {0:?}")]
    UnsupportedType(String),
    #[error("file too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("file verification failed after write")]
    Verification,
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stored-document metadata returned by the listing endpoint
#[derive(Debug, Clone, Serialize)]
pub struct DocumentMeta {
    pub document_id: String,
    pub filename: String,
    pub size: u64,
    pub content_type: String,
    pub modified: DateTime<Utc>,
}

pub struct DocumentStore {
    upload_dir: PathBuf,
    max_size: usize,
    allowed_extensions: Vec<String>,
    content_cache: TtlCache<String, String>,
}

impl DocumentStore {
    pub fn new(
        upload_dir: impl Into<PathBuf>,
        max_size: usize,
        allowed_extensions: Vec<String>,
    ) -> std::io::Result<Self> {
        let upload_dir = upload_dir.into();
        fs::create_dir_all(&upload_dir)?;
        Ok(Self {
            upload_dir,
            max_size,
            allowed_extensions,
            content_cache: TtlCache::new(CONTENT_TTL),
        })
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Validate and persist an upload, returning the new document id.
    ///
    /// The written file is read back and its SHA-256 compared against
    /// the upload; a mismatch removes the file and fails the save.
    pub fn save(&self, filename: &str, bytes: &[u8]) -> Result<String, StoreError> {
        let extension = self.validated_extension(filename)?;

        if bytes.len() > self.max_size {
            return Err(StoreError::TooLarge {
                size: bytes.len(),
                limit: self.max_size,
            });
        }

        let id = uuid::Uuid::new_v4().to_string();
        let path = self.upload_dir.join(format!("{id}.{extension}"));

        let uploaded_digest = Sha256::digest(bytes);
        if let Err(e) = fs::write(&path, bytes) {
            let _ = fs::remove_file(&path);
            return Err(e.into());
        }

        let written = match fs::read(&path) {
            Ok(written) => written,
            Err(e) => {
                let _ = fs::remove_file(&path);
                return Err(e.into());
            }
        };
        if Sha256::digest(&written) != uploaded_digest {
            let _ = fs::remove_file(&path);
            return Err(StoreError::Verification);
        }

        tracing::info!(
            document_id = %id,
            filename = %filename,
            size = bytes.len(),
            "Stored document"
        );
        Ok(id)
    }

    /// Locate the on-disk file for a document id by probing the
    /// allowed extensions.
    pub fn find_path(&self, id: &str) -> Result<PathBuf, StoreError> {
        // ids are uuids; reject anything that could escape the upload dir
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(StoreError::NotFound(id.to_string()));
        }

        for extension in &self.allowed_extensions {
            let path = self.upload_dir.join(format!("{id}.{extension}"));
            if path.is_file() {
                return Ok(path);
            }
        }
        Err(StoreError::NotFound(id.to_string()))
    }

    /// Extracted text for a document, cached for a few minutes.
    pub fn content(&self, id: &str) -> Result<String, StoreError> {
        if let Some(text) = self.content_cache.get(&id.to_string()) {
            tracing::debug!(document_id = %id, "content cache hit");
            return Ok(text);
        }

        let path = self.find_path(id)?;
        let extension = file_extension(&path);
        let bytes = fs::read(&path)?;
        let text = extract::extract_text(&bytes, &extension)?;

        self.content_cache.insert(id.to_string(), text.clone());
        Ok(text)
    }

    /// Stored documents, oldest first.
    pub fn list(&self) -> Result<Vec<DocumentMeta>, StoreError> {
        let mut documents = Vec::new();

        for entry in fs::read_dir(&self.upload_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let extension = file_extension(&path);
            if !self.allowed_extensions.contains(&extension) {
                continue;
            }

            let metadata = entry.metadata()?;
            let modified = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());

            documents.push(DocumentMeta {
                document_id: id.to_string(),
                filename: format!("{id}.{extension}"),
                size: metadata.len(),
                content_type: mime_guess::from_path(&path)
                    .first_or_octet_stream()
                    .to_string(),
                modified,
            });
        }

        documents.sort_by(|a, b| {
            a.modified
                .cmp(&b.modified)
                .then_with(|| a.document_id.cmp(&b.document_id))
        });
        Ok(documents)
    }

    fn validated_extension(&self, filename: &str) -> Result<String, StoreError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| StoreError::UnsupportedType(filename.to_string()))?;

        if self.allowed_extensions.contains(&extension) {
            Ok(extension)
        } else {
            Err(StoreError::UnsupportedType(extension))
        }
    }
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default()
}
