//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from a YAML file.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::error::{OpsError, OpsResult};

use super::types::{AppConfig, CompanyConfig, ReceiptLayout, StoreConfig};

/// Loads and provides access to engine configuration.
///
/// # Example
///
/// ```no_run
/// use cleaning_ops::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/dashboard.yaml").unwrap();
/// println!("Currency: {}", loader.company().currency);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// Returns `ConfigNotFound` if the file cannot be read and
    /// `ConfigParseError` if it is not valid YAML for [`AppConfig`].
    pub fn load<P: AsRef<Path>>(path: P) -> OpsResult<Self> {
        let config = Self::load_yaml::<AppConfig>(path.as_ref())?;
        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: AppConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> OpsResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| OpsError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| OpsError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the company identity.
    pub fn company(&self) -> &CompanyConfig {
        &self.config.company
    }

    /// Returns the receipt page geometry.
    pub fn receipt_layout(&self) -> &ReceiptLayout {
        &self.config.receipt
    }

    /// Returns the daily rate pre-filled on new work-log rows.
    pub fn default_daily_rate(&self) -> Decimal {
        self.config.payroll.default_daily_rate
    }

    /// Returns the largest accepted upload in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.config.uploads.max_upload_bytes
    }

    /// Returns the configured store backend.
    pub fn store(&self) -> &StoreConfig {
        &self.config.store
    }
}
