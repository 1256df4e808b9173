//! Configuration loading and management for the cleaning operations engine.
//!
//! This module loads the engine configuration from a YAML file: company
//! identity for receipts, payroll defaults, receipt page geometry, upload
//! limits, the revenue book location and the store backend.
//!
//! # Example
//!
//! ```no_run
//! use cleaning_ops::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/dashboard.yaml").unwrap();
//! println!("Receipts issued by: {}", config.company().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AppConfig, CompanyConfig, FinancialsConfig, PayrollConfig, ReceiptLayout, ServerConfig,
    StoreConfig, UploadConfig,
};
