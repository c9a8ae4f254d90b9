//! Server configuration from CLI flags and environment variables.

use std::{net::SocketAddr, time::Duration};

use clap::Parser;
use duo_chat_core::{AuthError, PasswordTable};
use duo_chat_translate::Credentials;
use duo_chat_transport::UploadLimits;
use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid passwords: {0}")]
    Passwords(#[from] AuthError),
    #[error("Invalid listen address {0}")]
    Address(String),
    #[error("Only one of --google-api-key, --google-access-token, --google-use-metadata-server may be set")]
    ConflictingCredentials,
    #[error("MAX_UPLOAD_BYTES must be greater than zero")]
    ZeroUploadLimit,
}

#[derive(Parser, Debug)]
#[command(name = "duo-chat-server")]
#[command(version)]
#[command(about = "Two-person chat relay with automatic Chinese/English translation", long_about = None)]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Shared password for User 1
    #[arg(long, env = "USER1_PASSWORD", default_value = "user1pass", hide_env_values = true)]
    pub user1_password: String,

    /// Shared password for User 2
    #[arg(long, env = "USER2_PASSWORD", default_value = "user2pass", hide_env_values = true)]
    pub user2_password: String,

    /// Google Cloud Translation API key
    #[arg(long, env = "GOOGLE_TRANSLATE_API_KEY", hide_env_values = true)]
    pub google_api_key: Option<String>,

    /// Pre-issued OAuth access token for Google Cloud Translation
    #[arg(long, env = "GOOGLE_ACCESS_TOKEN", hide_env_values = true)]
    pub google_access_token: Option<String>,

    /// Fetch access tokens from the GCE metadata server
    #[arg(long, env = "GOOGLE_USE_METADATA_SERVER")]
    pub google_use_metadata_server: bool,

    /// Override the translation API base URL
    #[arg(long, env = "TRANSLATE_BASE_URL")]
    pub translate_base_url: Option<String>,

    /// Translation request timeout in seconds
    #[arg(long, env = "TRANSLATE_TIMEOUT_SECS", default_value_t = 10)]
    pub translate_timeout_secs: u64,

    /// Largest accepted image, in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = 5 * 1024 * 1024)]
    pub max_upload_bytes: usize,
}

impl Config {
    /// Socket address to bind.
    ///
    /// # Errors
    /// Returns error if host and port do not form an address.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::Address(format!("{}:{}", self.host, self.port)))
    }

    /// # Errors
    /// Returns error if the passwords are empty or identical.
    pub fn password_table(&self) -> Result<PasswordTable, ConfigError> {
        Ok(PasswordTable::new(
            self.user1_password.clone(),
            self.user2_password.clone(),
        )?)
    }

    /// Translation credentials, if any were configured.
    ///
    /// # Errors
    /// Returns error if more than one credential source is set.
    pub fn credentials(&self) -> Result<Option<Credentials>, ConfigError> {
        let mut found = Vec::new();
        if let Some(key) = self.google_api_key.as_ref().filter(|k| !k.is_empty()) {
            found.push(Credentials::ApiKey(key.clone()));
        }
        if let Some(token) = self.google_access_token.as_ref().filter(|t| !t.is_empty()) {
            found.push(Credentials::AccessToken(token.clone()));
        }
        if self.google_use_metadata_server {
            found.push(Credentials::metadata_server());
        }

        match found.len() {
            0 | 1 => Ok(found.pop()),
            _ => Err(ConfigError::ConflictingCredentials),
        }
    }

    #[must_use]
    pub const fn translate_timeout(&self) -> Duration {
        Duration::from_secs(self.translate_timeout_secs)
    }

    /// # Errors
    /// Returns error if the limit is zero.
    pub const fn upload_limits(&self) -> Result<UploadLimits, ConfigError> {
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::ZeroUploadLimit);
        }
        Ok(UploadLimits {
            max_file_bytes: self.max_upload_bytes,
        })
    }
}
