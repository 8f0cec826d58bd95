//! Local-disk document storage for KYC uploads.
//!
//! Uploaded files are written under the configured directory with a
//! uuid-based object name and served back as plain URLs built from the
//! configured links prefix.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::config::UploadConfig;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Rejected upload: {0}")]
    RejectedUpload(String),

    #[error("IO error: {0}")]
    IoError(String),
}

#[derive(Debug, Clone)]
pub struct StorageService {
    pub config: UploadConfig,
}

impl StorageService {
    /// Create a new storage service, ensuring the upload directory exists.
    #[instrument(skip(config), fields(upload_dir = %config.upload_dir))]
    pub async fn new(config: UploadConfig) -> Result<Self, StorageError> {
        info!("Initializing local document storage");

        config.validate().map_err(|e| {
            error!("Upload configuration validation failed: {}", e);
            StorageError::ConfigError(e.to_string())
        })?;

        if !Path::new(&config.upload_dir).is_dir() {
            warn!("Upload directory '{}' does not exist, creating it", config.upload_dir);
            tokio::fs::create_dir_all(&config.upload_dir).await.map_err(|e| {
                error!("Failed to create upload directory: {}", e);
                StorageError::IoError(format!("Failed to create upload directory: {}", e))
            })?;
        }

        info!("Local document storage initialized successfully");
        Ok(StorageService { config })
    }

    /// Store an uploaded document and return its public URL.
    ///
    /// The original filename is only used for extension validation; the file
    /// on disk gets a uuid-based object name scoped to the owning user.
    #[instrument(skip(self, data), fields(user_id = %user_id, filename = %filename, size = data.len()))]
    pub async fn put_document(
        &self,
        user_id: &str,
        filename: &str,
        data: Bytes,
    ) -> Result<String, StorageError> {
        info!("Storing uploaded document");

        if data.is_empty() {
            error!("Rejected empty upload");
            return Err(StorageError::RejectedUpload("Uploaded file is empty".to_string()));
        }

        if data.len() > self.config.max_size_bytes {
            error!(
                "Rejected oversized upload: {} bytes (max {})",
                data.len(),
                self.config.max_size_bytes
            );
            return Err(StorageError::RejectedUpload(format!(
                "Uploaded file exceeds maximum size of {} bytes",
                self.config.max_size_bytes
            )));
        }

        if !self.config.is_allowed_filename(filename) {
            error!("Rejected upload with disallowed extension: {}", filename);
            return Err(StorageError::RejectedUpload(format!(
                "File type not accepted: {}",
                filename
            )));
        }

        let extension = filename
            .rsplit('.')
            .next()
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();
        let object_name = format!("{}/{}.{}", user_id, Uuid::new_v4(), extension);

        let path = PathBuf::from(&self.config.upload_dir).join(&object_name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                error!("Failed to create user upload directory: {}", e);
                StorageError::IoError(format!("Failed to create user upload directory: {}", e))
            })?;
        }

        tokio::fs::write(&path, &data).await.map_err(|e| {
            error!("Failed to write uploaded document: {}", e);
            StorageError::IoError(format!("Failed to write uploaded document: {}", e))
        })?;

        debug!("Wrote {} bytes to {:?}", data.len(), path);
        info!("Successfully stored document '{}'", object_name);
        Ok(self.document_url(&object_name))
    }

    /// Remove a stored document by object name.
    #[instrument(skip(self), fields(object_name = %object_name))]
    pub async fn remove_document(&self, object_name: &str) -> Result<(), StorageError> {
        info!("Removing stored document");
        let path = PathBuf::from(&self.config.upload_dir).join(object_name);
        tokio::fs::remove_file(&path).await.map_err(|e| {
            error!("Failed to remove document '{}': {}", object_name, e);
            StorageError::IoError(format!("Failed to remove document: {}", e))
        })?;
        info!("Successfully removed document '{}'", object_name);
        Ok(())
    }

    /// Public download URL for a stored object (direct link, not signed).
    pub fn document_url(&self, object_name: &str) -> String {
        format!(
            "{}/{}",
            self.config.links_prefix.trim_end_matches('/'),
            object_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_url_trims_trailing_slash() {
        let mut config = UploadConfig::default();
        config.links_prefix = "http://localhost:8080/uploads/kyc/".to_string();
        let service = StorageService { config };
        assert_eq!(
            service.document_url("USR-1/abc.png"),
            "http://localhost:8080/uploads/kyc/USR-1/abc.png"
        );
    }

    #[tokio::test]
    async fn test_put_document_rejects_bad_extension() {
        let mut config = UploadConfig::default();
        config.upload_dir = std::env::temp_dir()
            .join(format!("lifelink-test-{}", Uuid::new_v4()))
            .to_string_lossy()
            .to_string();
        let service = StorageService::new(config).await.expect("storage init");
        let err = service
            .put_document("USR-1", "payload.exe", Bytes::from_static(&[1, 2, 3]))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::RejectedUpload(_)));
    }

    #[tokio::test]
    async fn test_put_document_round_trip() {
        let mut config = UploadConfig::default();
        config.upload_dir = std::env::temp_dir()
            .join(format!("lifelink-test-{}", Uuid::new_v4()))
            .to_string_lossy()
            .to_string();
        let service = StorageService::new(config).await.expect("storage init");
        let url = service
            .put_document("USR-1", "aadhar.png", Bytes::from(vec![0u8; 16]))
            .await
            .expect("store document");
        assert!(url.starts_with(&service.config.links_prefix));
        assert!(url.contains("USR-1/"));
        assert!(url.ends_with(".png"));
    }
}
