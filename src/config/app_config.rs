//! Server configuration
//!
//! Values are layered: built-in defaults, then an optional settings file,
//! then environment variables (`HOST`, `PORT`, `DATABASE_URL`,
//! `JWT_SECRET`, `JWT_EXPIRES_IN`, `LOG_LEVEL`). Command-line flags are
//! applied on top by the binary.

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

use super::Paths;
use crate::utils::dates::parse_duration;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite connection string; resolved under the data directory when unset
    #[serde(default)]
    pub database_url: Option<String>,

    /// HMAC secret for session tokens
    #[serde(default)]
    pub jwt_secret: String,

    /// Session token lifetime, e.g. "1h" or "3600"
    #[serde(default = "default_jwt_expires_in")]
    pub jwt_expires_in: String,

    /// Default tracing filter
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from the optional settings file and the environment
    pub fn load(settings_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        builder = match settings_file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("soundshelf").required(false)),
        };

        let settings = builder
            .add_source(Environment::default().try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        let config: AppConfig = settings
            .try_deserialize()
            .context("Failed to parse configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Check the values that have no usable default
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must be set");
        }
        parse_duration(&self.jwt_expires_in)
            .with_context(|| format!("Invalid JWT_EXPIRES_IN '{}'", self.jwt_expires_in))?;
        Ok(())
    }

    /// Session token lifetime
    pub fn token_ttl(&self) -> Result<chrono::Duration> {
        parse_duration(&self.jwt_expires_in)
    }

    /// Connection string for the catalog database
    pub fn resolved_database_url(&self) -> Result<String> {
        match &self.database_url {
            Some(url) if !url.trim().is_empty() => Ok(url.clone()),
            _ => {
                let paths = Paths::resolve()?;
                tracing::debug!("Using data directory {:?}", paths.data_dir());
                Ok(format!("sqlite://{}", paths.database_path().display()))
            }
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_jwt_expires_in() -> String {
    "1h".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
