//! Receipt emission.
//!
//! Turns one finalized payment into a downloadable artifact, either a
//! fixed-width text file or a paginated PDF. Rendering is pure formatting:
//! the payment has already been validated and saved by the time a receipt
//! is asked for.

mod format;
mod layout;
mod letterhead;
mod pdf;
mod text;

pub use format::{format_amount, format_days, format_money, receipt_file_name};
pub use layout::{Align, DrawOp, FontStyle, Page, ReceiptDocument, layout_receipt};
pub use letterhead::{Letterhead, LetterheadColor};
pub use pdf::write_pdf;
pub use text::render_text;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::config::{CompanyConfig, ConfigLoader, ReceiptLayout};
use crate::error::{OpsError, OpsResult};
use crate::models::SalaryLog;

/// Heading printed on every receipt.
pub const RECEIPT_TITLE: &str = "PAYMENT RECEIPT";

/// Disclaimer printed in every receipt footer.
pub const FOOTER_DISCLAIMER: &str =
    "This is a computer-generated receipt and is valid without signature.";

/// Output format of a receipt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptFormat {
    /// Plain text.
    Text,
    /// Paginated PDF.
    #[default]
    Pdf,
}

impl ReceiptFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Pdf => "pdf",
        }
    }

    /// MIME type for this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Text => "text/plain; charset=utf-8",
            Self::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ReceiptFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A rendered receipt, ready to hand to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptArtifact {
    /// Suggested download name.
    pub file_name: String,
    /// MIME type.
    pub content_type: &'static str,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Renders receipts with a fixed company identity and page geometry.
///
/// # Example
///
/// ```
/// use cleaning_ops::config::ConfigLoader;
/// use cleaning_ops::models::SalaryLog;
/// use cleaning_ops::receipt::{ReceiptFormat, ReceiptRenderer};
///
/// let renderer = ReceiptRenderer::from_config(&ConfigLoader::default());
/// let payment: SalaryLog = serde_json::from_str(
///     r#"{"payment_id": "PAY-1", "staff_name": "Nimal Perera", "month": "May",
///         "date": "2025-05-31", "gross_total": 5000, "net_pay": 5000}"#,
/// )
/// .unwrap();
///
/// let receipt = renderer.render(&payment, ReceiptFormat::Text).unwrap();
/// assert_eq!(receipt.file_name, "Receipt_Nimal_Perera_May_2025-05-31.txt");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReceiptRenderer {
    company: CompanyConfig,
    layout: ReceiptLayout,
}

impl ReceiptRenderer {
    /// Creates a renderer.
    pub fn new(company: CompanyConfig, layout: ReceiptLayout) -> Self {
        Self { company, layout }
    }

    /// Creates a renderer from loaded configuration.
    pub fn from_config(config: &ConfigLoader) -> Self {
        Self::new(config.company().clone(), config.receipt_layout().clone())
    }

    /// Renders a receipt stamped with the current local time.
    pub fn render(&self, payment: &SalaryLog, format: ReceiptFormat) -> OpsResult<ReceiptArtifact> {
        self.render_at(payment, format, Local::now().naive_local())
    }

    /// Renders a receipt stamped with the given time.
    ///
    /// Fails only when the payment's work log cannot be decoded. A missing
    /// or unreadable letterhead falls back to the generated header.
    pub fn render_at(
        &self,
        payment: &SalaryLog,
        format: ReceiptFormat,
        generated_at: NaiveDateTime,
    ) -> OpsResult<ReceiptArtifact> {
        let entries = payment.work_log_entries().map_err(|e| OpsError::Receipt {
            message: e.to_string(),
        })?;
        let stamp = generated_at.format("%Y-%m-%d %H:%M:%S").to_string();

        let bytes = match format {
            ReceiptFormat::Text => render_text(payment, &entries, &self.company, &stamp).into_bytes(),
            ReceiptFormat::Pdf => {
                let letterhead = self.load_letterhead(&payment.payment_id);
                let document = layout_receipt(
                    payment,
                    &entries,
                    &self.company,
                    &self.layout,
                    letterhead.as_ref().map(Letterhead::aspect_ratio),
                    &stamp,
                );
                write_pdf(&document, letterhead.as_ref())
            }
        };

        debug!(
            payment_id = %payment.payment_id,
            format = %format,
            size = bytes.len(),
            "Receipt rendered"
        );

        Ok(ReceiptArtifact {
            file_name: receipt_file_name(payment, format.extension()),
            content_type: format.content_type(),
            bytes,
        })
    }

    fn load_letterhead(&self, payment_id: &str) -> Option<Letterhead> {
        let path = self.company.letterhead_path.as_ref()?;
        match Letterhead::load(path) {
            Ok(letterhead) => Some(letterhead),
            Err(e) => {
                warn!(
                    payment_id = %payment_id,
                    path = %path.display(),
                    error = %e,
                    "Failed to load letterhead, using generated header"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkLogBlob;
    use chrono::NaiveDate;
    use std::io::Write;

    fn payment() -> SalaryLog {
        serde_json::from_str(
            r#"{
                "payment_id": "PAY-9",
                "staff_name": "Kamala  Devi",
                "role": "Supervisor",
                "month": "February",
                "date": "2025-02-28",
                "gross_total": 5000,
                "deductions": 1000,
                "net_pay": 4000,
                "work_log": "[{\"branch\":\"A\",\"days\":10,\"rate\":500,\"total\":5000}]"
            }"#,
        )
        .unwrap()
    }

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 2, 28)
            .unwrap()
            .and_hms_opt(17, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_text_artifact() {
        let artifact = ReceiptRenderer::default()
            .render_at(&payment(), ReceiptFormat::Text, stamp())
            .unwrap();

        assert_eq!(artifact.file_name, "Receipt_Kamala_Devi_February_2025-02-28.txt");
        assert_eq!(artifact.content_type, "text/plain; charset=utf-8");
        let text = String::from_utf8(artifact.bytes).unwrap();
        assert!(text.contains("Generated on: 2025-02-28 17:30:00"));
    }

    #[test]
    fn test_pdf_artifact_without_letterhead() {
        let artifact = ReceiptRenderer::default()
            .render_at(&payment(), ReceiptFormat::Pdf, stamp())
            .unwrap();

        assert_eq!(artifact.file_name, "Receipt_Kamala_Devi_February_2025-02-28.pdf");
        assert_eq!(artifact.content_type, "application/pdf");
        assert!(artifact.bytes.starts_with(b"%PDF-1.4"));
        assert!(!String::from_utf8_lossy(&artifact.bytes).contains("/DCTDecode"));
    }

    #[test]
    fn test_unreadable_letterhead_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not an image").unwrap();

        let company = CompanyConfig {
            letterhead_path: Some(file.path().to_path_buf()),
            ..CompanyConfig::default()
        };
        let renderer = ReceiptRenderer::new(company, ReceiptLayout::default());
        let artifact = renderer
            .render_at(&payment(), ReceiptFormat::Pdf, stamp())
            .unwrap();

        let pdf = String::from_utf8_lossy(&artifact.bytes);
        assert!(pdf.contains("(DCS) Tj"));
        assert!(!pdf.contains("/DCTDecode"));
    }

    #[test]
    fn test_letterhead_is_used_when_valid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&letterhead::tests::tiny_jpeg(800, 200)).unwrap();

        let company = CompanyConfig {
            letterhead_path: Some(file.path().to_path_buf()),
            ..CompanyConfig::default()
        };
        let artifact = ReceiptRenderer::new(company, ReceiptLayout::default())
            .render_at(&payment(), ReceiptFormat::Pdf, stamp())
            .unwrap();

        let pdf = String::from_utf8_lossy(&artifact.bytes);
        assert!(pdf.contains("/DCTDecode"));
        assert!(!pdf.contains("(DCS) Tj"));
    }

    #[test]
    fn test_corrupt_work_log_is_a_receipt_error() {
        let mut bad = payment();
        bad.work_log = WorkLogBlob::from_raw(serde_json::Value::String("oops".to_string()));

        let result = ReceiptRenderer::default().render(&bad, ReceiptFormat::Text);
        assert!(matches!(result, Err(OpsError::Receipt { .. })));
    }

    #[test]
    fn test_format_parses_lowercase() {
        let format: ReceiptFormat = serde_json::from_str(r#""text""#).unwrap();
        assert_eq!(format, ReceiptFormat::Text);
        assert_eq!(ReceiptFormat::default(), ReceiptFormat::Pdf);
    }
}
