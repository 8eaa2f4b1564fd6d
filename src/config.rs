//! Environment-driven configuration for the server binary

use std::path::PathBuf;
use thiserror::Error;

/// Default Groq model used when `MODEL_NAME` is not set
pub const DEFAULT_MODEL: &str = "llama-3.2-1b-preview";

/// Default upload size limit in bytes (10 MiB)
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// File extensions accepted by the upload endpoint unless overridden
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["txt", "pdf", "doc", "docx"];

/// Runtime settings, resolved once at startup
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub upload_dir: PathBuf,
    pub max_upload_size: usize,
    pub allowed_extensions: Vec<String>,
    pub groq_api_key: String,
    pub model: String,
    /// Override for the Groq API base URL
    pub groq_base_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GROQ_API_KEY is not set")]
    MissingApiKey,
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

impl Settings {
    /// Read settings from the environment.
    ///
    /// `GROQ_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let groq_api_key = std::env::var("GROQ_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let port = parse_var("DOCQA_PORT", 8000)?;
        let max_upload_size = parse_var("MAX_UPLOAD_SIZE", DEFAULT_MAX_UPLOAD_SIZE)?;

        let upload_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));

        let allowed_extensions = match std::env::var("ALLOWED_EXTENSIONS") {
            Ok(raw) => parse_extensions(&raw),
            Err(_) => DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
        };

        let model = std::env::var("MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let groq_base_url = std::env::var("GROQ_BASE_URL").ok();

        Ok(Self {
            port,
            upload_dir,
            max_upload_size,
            allowed_extensions,
            groq_api_key,
            model,
            groq_base_url,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => Ok(value),
            Err(_) => Err(ConfigError::Invalid { name, value: raw }),
        },
        Err(_) => Ok(default),
    }
}

/// Parse a comma-separated extension list, normalizing case and
/// stripping any leading dots.
fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_normalized() {
        let exts = parse_extensions(" .TXT, pdf ,docx,,");
        assert_eq!(exts, vec!["txt", "pdf", "docx"]);
    }

    #[test]
    fn empty_extension_list_is_empty() {
        assert!(parse_extensions("").is_empty());
        assert!(parse_extensions(" , ,").is_empty());
    }
}
