//! Payment record (salary log) and its work log.
//!
//! A payment stores its work log as embedded JSON text in a single column.
//! [`WorkLogBlob`] owns that column and is the only place that encodes or
//! decodes it.

use chrono::{Month, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{OpsError, OpsResult};

use super::null_as_default;

/// One `(branch, days, rate)` line contributing to a payment's gross total.
///
/// # Example
///
/// ```
/// use cleaning_ops::models::WorkLogEntry;
/// use rust_decimal::Decimal;
///
/// let entry = WorkLogEntry::new("Colombo 03", Decimal::from(10), Decimal::from(500));
/// assert_eq!(entry.total, Decimal::from(5000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkLogEntry {
    /// Branch worked at, by name.
    #[serde(default)]
    pub branch: String,
    /// Days worked.
    #[serde(default)]
    pub days: Decimal,
    /// Daily rate.
    #[serde(default)]
    pub rate: Decimal,
    /// `days * rate`.
    #[serde(default)]
    pub total: Decimal,
}

impl WorkLogEntry {
    /// Creates an entry with its total computed, saturating on overflow.
    pub fn new(branch: impl Into<String>, days: Decimal, rate: Decimal) -> Self {
        Self {
            branch: branch.into(),
            days,
            rate,
            total: days.saturating_mul(rate),
        }
    }

    /// Creates an entry, or `None` when `days × rate` overflows.
    pub fn try_new(branch: impl Into<String>, days: Decimal, rate: Decimal) -> Option<Self> {
        let total = days.checked_mul(rate)?;
        Some(Self {
            branch: branch.into(),
            days,
            rate,
            total,
        })
    }
}

/// The work-log column as it sits in the store.
///
/// New records always write a JSON string. Older rows may hold a JSON array
/// or nothing at all, and all three shapes decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkLogBlob(serde_json::Value);

impl WorkLogBlob {
    /// Encodes entries as embedded JSON text.
    pub fn from_entries(entries: &[WorkLogEntry]) -> Self {
        // Serializing plain strings and decimals cannot fail.
        let text = serde_json::to_string(entries).unwrap_or_else(|_| "[]".to_string());
        Self(serde_json::Value::String(text))
    }

    /// Wraps a raw column value.
    pub fn from_raw(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Returns the raw column value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.0
    }

    /// Decodes the stored entries.
    pub fn decode(&self) -> Result<Vec<WorkLogEntry>, serde_json::Error> {
        match &self.0 {
            serde_json::Value::Null => Ok(Vec::new()),
            serde_json::Value::String(text) => serde_json::from_str(text),
            other => serde_json::from_value(other.clone()),
        }
    }
}

/// Settlement status of a payment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Paid out.
    #[default]
    Paid,
}

/// One finalized payment computation for a staff member over a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryLog {
    /// Payment identifier, preserved across edits.
    #[serde(default, deserialize_with = "null_as_default")]
    pub payment_id: String,
    /// Payment date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Month the payment covers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<Month>,
    /// Staff member paid, by name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub staff_name: String,
    /// Role of the staff member at the time of payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Sum of work-log totals.
    #[serde(default, deserialize_with = "null_as_default")]
    pub gross_total: Decimal,
    /// Advances and other deductions.
    #[serde(default, deserialize_with = "null_as_default")]
    pub deductions: Decimal,
    /// `gross_total - deductions`; may be negative.
    #[serde(default, deserialize_with = "null_as_default")]
    pub net_pay: Decimal,
    /// Embedded work log.
    #[serde(default)]
    pub work_log: WorkLogBlob,
    /// Bank transfer slip, usually an embedded data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_slip_url: Option<String>,
    /// Settlement status.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: PaymentStatus,
}

impl SalaryLog {
    /// Decodes the embedded work log, naming this payment on failure.
    pub fn work_log_entries(&self) -> OpsResult<Vec<WorkLogEntry>> {
        self.work_log
            .decode()
            .map_err(|e| OpsError::WorkLogParse {
                payment_id: self.payment_id.clone(),
                message: e.to_string(),
            })
    }

    /// Returns the month name, or "Unknown" when unset.
    pub fn month_label(&self) -> &'static str {
        month_label(self.month)
    }

    /// Returns the role snapshot, or "Unknown" when unset.
    pub fn role_label(&self) -> &str {
        match self.role.as_deref() {
            Some(role) if !role.is_empty() => role,
            _ => "Unknown",
        }
    }
}

/// Returns the month name used as a grouping key.
pub fn month_label(month: Option<Month>) -> &'static str {
    month.map(|m| m.name()).unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_entries() -> Vec<WorkLogEntry> {
        vec![
            WorkLogEntry::new("Colombo 03", dec("10"), dec("500")),
            WorkLogEntry::new("Kandy", dec("2.5"), dec("750.50")),
        ]
    }

    #[test]
    fn test_entry_total_overflow() {
        let huge = dec("100000000000000000000");
        assert_eq!(WorkLogEntry::try_new("A", huge, huge), None);
        assert_eq!(WorkLogEntry::new("A", huge, huge).total, Decimal::MAX);
        assert_eq!(
            WorkLogEntry::try_new("A", dec("3"), dec("400")).map(|e| e.total),
            Some(dec("1200"))
        );
    }

    #[test]
    fn test_blob_is_stored_as_json_text() {
        let blob = WorkLogBlob::from_entries(&sample_entries());
        assert!(blob.raw().is_string());
        assert_eq!(blob.decode().unwrap(), sample_entries());
    }

    #[test]
    fn test_blob_accepts_array_and_null() {
        let array = WorkLogBlob::from_raw(serde_json::json!([
            {"branch": "A", "days": 3, "rate": 400, "total": 1200}
        ]));
        let entries = array.decode().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].total, dec("1200"));

        let empty = WorkLogBlob::from_raw(serde_json::Value::Null);
        assert!(empty.decode().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_blob_reports_payment_id() {
        let log = SalaryLog {
            payment_id: "PAY-7".to_string(),
            date: None,
            month: None,
            staff_name: "X".to_string(),
            role: None,
            gross_total: Decimal::ZERO,
            deductions: Decimal::ZERO,
            net_pay: Decimal::ZERO,
            work_log: WorkLogBlob::from_raw(serde_json::Value::String("{not json".to_string())),
            transaction_slip_url: None,
            status: PaymentStatus::Paid,
        };

        match log.work_log_entries() {
            Err(OpsError::WorkLogParse { payment_id, .. }) => assert_eq!(payment_id, "PAY-7"),
            other => panic!("Expected WorkLogParse, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_store_row() {
        let json = r#"{
            "payment_id": "PAY-1735689600000",
            "date": "2025-01-31",
            "month": "January",
            "staff_name": "Nimal Perera",
            "role": "Cleaner",
            "gross_total": 5000,
            "deductions": null,
            "net_pay": "5000",
            "work_log": "[{\"branch\":\"A\",\"days\":10,\"rate\":500,\"total\":5000}]",
            "status": "Paid"
        }"#;

        let log: SalaryLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.month, Some(Month::January));
        assert_eq!(log.gross_total, dec("5000"));
        assert_eq!(log.deductions, Decimal::ZERO);
        assert_eq!(log.work_log_entries().unwrap()[0].branch, "A");
    }

    #[test]
    fn test_labels_fall_back_to_unknown() {
        let log: SalaryLog =
            serde_json::from_str(r#"{"staff_name": "X", "gross_total": 1, "net_pay": 1}"#).unwrap();
        assert_eq!(log.month_label(), "Unknown");
        assert_eq!(log.role_label(), "Unknown");
    }
}
