//! Configuration types for the cleaning operations engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file. Every section has a
//! default, so a partial file only needs to name what it overrides.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// Company identity printed on receipts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompanyConfig {
    /// Short company name used in the generated header (e.g., "DCS").
    pub name: String,
    /// Tagline printed beneath the company name.
    pub tagline: String,
    /// Currency label printed next to amounts.
    pub currency: String,
    /// Optional JPEG letterhead drawn at the top of PDF receipts.
    pub letterhead_path: Option<PathBuf>,
}

impl Default for CompanyConfig {
    fn default() -> Self {
        Self {
            name: "DCS".to_string(),
            tagline: "Professional Cleaning Services".to_string(),
            currency: "LKR".to_string(),
            letterhead_path: None,
        }
    }
}

/// Payroll defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PayrollConfig {
    /// Daily rate pre-filled on new work-log rows.
    pub default_daily_rate: Decimal,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            default_daily_rate: Decimal::from(500),
        }
    }
}

/// Page geometry for paginated receipts, in millimetres.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReceiptLayout {
    /// Page width.
    pub page_width: f64,
    /// Page height.
    pub page_height: f64,
    /// Left and right margin.
    pub margin: f64,
    /// Vertical advance per work-log row.
    pub row_height: f64,
    /// Cursor position past which a new page is started.
    pub page_break_threshold: f64,
    /// Cursor position on a freshly started page.
    pub top_margin: f64,
    /// Height of the letterhead image when one is available.
    pub letterhead_height: f64,
}

impl Default for ReceiptLayout {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 20.0,
            row_height: 7.0,
            page_break_threshold: 250.0,
            top_margin: 20.0,
            letterhead_height: 42.0,
        }
    }
}

/// Limits on embedded uploads (staff photos, transaction slips).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Largest accepted upload, in bytes, before encoding.
    pub max_upload_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Financial view settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FinancialsConfig {
    /// Where per-branch revenue figures are persisted.
    pub revenue_book_path: PathBuf,
}

impl Default for FinancialsConfig {
    fn default() -> Self {
        Self {
            revenue_book_path: PathBuf::from("branch_revenues.json"),
        }
    }
}

/// Which table store backend to use.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Process-local in-memory store.
    #[default]
    Memory,
    /// PostgREST-style remote table store.
    Rest {
        /// Base URL of the REST endpoint (e.g., "https://example.supabase.co/rest/v1").
        base_url: String,
        /// API key sent as both `apikey` and bearer token.
        api_key: String,
    },
}

/// HTTP server and logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the API binds to.
    pub bind_addr: String,
    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            log_json: false,
        }
    }
}

/// The complete configuration loaded from `dashboard.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Company identity.
    pub company: CompanyConfig,
    /// Payroll defaults.
    pub payroll: PayrollConfig,
    /// Receipt page geometry.
    pub receipt: ReceiptLayout,
    /// Upload limits.
    pub uploads: UploadConfig,
    /// Financial view settings.
    pub financials: FinancialsConfig,
    /// Store backend.
    pub store: StoreConfig,
    /// Server settings.
    pub server: ServerConfig,
}
