use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// KYC document upload configuration.
///
/// Documents are stored on local disk under `upload_dir`, matching the way
/// the rest of the system serves them back as plain URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory where uploaded documents are written
    pub upload_dir: String,
    /// Public URL prefix used when building document links
    pub links_prefix: String,
    /// Maximum accepted upload size in bytes
    pub max_size_bytes: usize,
    /// Accepted file extensions (lowercase, without the dot)
    pub allowed_extensions: Vec<String>,
}

impl UploadConfig {
    /// Load upload configuration from environment variables
    ///
    /// Expected environment variables:
    /// - UPLOAD_DIR: Directory for uploaded documents (defaults to "uploads/kyc")
    /// - UPLOAD_LINKS_PREFIX: Public URL prefix for stored documents (required)
    /// - UPLOAD_MAX_SIZE_BYTES: Maximum upload size (defaults to 5 MiB)
    /// - UPLOAD_ALLOWED_EXTENSIONS: Comma-separated list (defaults to "jpg,jpeg,png,pdf")
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading upload configuration from environment variables");

        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| {
            warn!("UPLOAD_DIR not set, using default: uploads/kyc");
            "uploads/kyc".to_string()
        });
        debug!("Upload directory: {}", upload_dir);

        let links_prefix = env::var("UPLOAD_LINKS_PREFIX")
            .map_err(|_| {
                error!("UPLOAD_LINKS_PREFIX environment variable not found");
                ConfigError::EnvVarNotFound("UPLOAD_LINKS_PREFIX".to_string())
            })?;
        debug!("Upload links prefix: {}", links_prefix);

        let max_size_bytes = env::var("UPLOAD_MAX_SIZE_BYTES")
            .unwrap_or_else(|_| {
                warn!("UPLOAD_MAX_SIZE_BYTES not set, using default: 5242880 (5 MiB)");
                "5242880".to_string()
            })
            .parse::<usize>()
            .map_err(|_| {
                error!("Invalid UPLOAD_MAX_SIZE_BYTES value");
                ConfigError::InvalidValue("Invalid UPLOAD_MAX_SIZE_BYTES value".to_string())
            })?;
        debug!("Upload max size: {} bytes", max_size_bytes);

        let allowed_extensions = env::var("UPLOAD_ALLOWED_EXTENSIONS")
            .unwrap_or_else(|_| "jpg,jpeg,png,pdf".to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();
        debug!("Allowed extensions: {:?}", allowed_extensions);

        let config = UploadConfig {
            upload_dir,
            links_prefix,
            max_size_bytes,
            allowed_extensions,
        };

        config.validate()?;
        info!("Upload configuration loaded successfully");
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        debug!("Validating upload configuration");

        if self.upload_dir.is_empty() {
            error!("Upload directory is empty");
            return Err(ConfigError::ValidationError("Upload directory cannot be empty".to_string()));
        }

        if self.links_prefix.is_empty() {
            error!("Upload links prefix is empty");
            return Err(ConfigError::ValidationError("Upload links prefix cannot be empty".to_string()));
        }

        if self.max_size_bytes == 0 {
            error!("Upload max size is 0");
            return Err(ConfigError::ValidationError("Upload max size must be greater than 0".to_string()));
        }

        if self.allowed_extensions.is_empty() {
            error!("No allowed upload extensions configured");
            return Err(ConfigError::ValidationError("At least one allowed extension is required".to_string()));
        }

        debug!("Upload configuration validation passed");
        Ok(())
    }

    /// Whether the given filename carries an accepted extension
    pub fn is_allowed_filename(&self, filename: &str) -> bool {
        filename
            .rsplit('.')
            .next()
            .filter(|ext| *ext != filename)
            .map(|ext| self.allowed_extensions.iter().any(|a| a == &ext.to_lowercase()))
            .unwrap_or(false)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        UploadConfig {
            upload_dir: "uploads/kyc".to_string(),
            links_prefix: "http://localhost:8080/uploads/kyc".to_string(),
            max_size_bytes: 5 * 1024 * 1024,
            allowed_extensions: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "pdf".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = UploadConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_dir() {
        let mut config = UploadConfig::default();
        config.upload_dir = "".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_max_size() {
        let mut config = UploadConfig::default();
        config.max_size_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_allowed_filename() {
        let config = UploadConfig::default();
        assert!(config.is_allowed_filename("aadhar.PDF"));
        assert!(config.is_allowed_filename("scan.jpeg"));
        assert!(!config.is_allowed_filename("malware.exe"));
        assert!(!config.is_allowed_filename("no_extension"));
    }
}
