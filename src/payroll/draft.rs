//! Payment drafts as entered by an operator.
//!
//! Numeric inputs are coerced leniently: anything that does not parse as a
//! number counts as zero.

use chrono::{Datelike, Month, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::models::SalaryLog;

/// Coerces free-form numeric input to a decimal, defaulting to zero.
///
/// ```
/// use cleaning_ops::payroll::coerce_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(coerce_amount(" 12.5 "), Decimal::new(125, 1));
/// assert_eq!(coerce_amount("abc"), Decimal::ZERO);
/// assert_eq!(coerce_amount(""), Decimal::ZERO);
/// ```
pub fn coerce_amount(input: &str) -> Decimal {
    let trimmed = input.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or(Decimal::ZERO)
}

/// Deserializes a number, numeric string, or anything else (as zero).
pub(crate) fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => coerce_amount(&n.to_string()),
        Value::String(s) => coerce_amount(&s),
        _ => Decimal::ZERO,
    })
}

/// One editable work-log row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkLogDraftRow {
    /// Branch name; empty while unselected.
    #[serde(default)]
    pub branch: String,
    /// Days worked.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub days: Decimal,
    /// Daily rate.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub rate: Decimal,
}

impl WorkLogDraftRow {
    /// Creates a row from numbers.
    pub fn new(branch: impl Into<String>, days: Decimal, rate: Decimal) -> Self {
        Self {
            branch: branch.into(),
            days,
            rate,
        }
    }

    /// Creates a row from raw form input.
    pub fn from_input(branch: impl Into<String>, days: &str, rate: &str) -> Self {
        Self::new(branch, coerce_amount(days), coerce_amount(rate))
    }

    /// An empty row pre-filled with the default daily rate.
    pub fn blank(default_rate: Decimal) -> Self {
        Self::new("", Decimal::ZERO, default_rate)
    }
}

/// Everything an operator enters to pay one staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDraft {
    /// Staff member, by name; empty while unselected.
    #[serde(default)]
    pub staff_name: String,
    /// Month the payment covers.
    pub month: Month,
    /// Payment date.
    pub date: NaiveDate,
    /// Advances and other deductions.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub deductions: Decimal,
    /// Work-log rows in entry order.
    #[serde(default)]
    pub work_log: Vec<WorkLogDraftRow>,
    /// Bank transfer slip, usually an embedded data URL.
    #[serde(default)]
    pub transaction_slip_url: Option<String>,
}

impl PaymentDraft {
    /// Reopens a saved payment for editing.
    ///
    /// Missing period fields fall back to `today`. A work log that is empty
    /// or cannot be decoded is replaced by one blank row.
    pub fn from_payment(payment: &SalaryLog, today: NaiveDate, default_rate: Decimal) -> Self {
        let work_log: Vec<WorkLogDraftRow> = payment
            .work_log
            .decode()
            .map(|entries| {
                entries
                    .into_iter()
                    .map(|entry| WorkLogDraftRow::new(entry.branch, entry.days, entry.rate))
                    .collect()
            })
            .unwrap_or_default();
        let work_log = if work_log.is_empty() {
            vec![WorkLogDraftRow::blank(default_rate)]
        } else {
            work_log
        };

        Self {
            staff_name: payment.staff_name.clone(),
            month: payment.month.unwrap_or_else(|| month_of(today)),
            date: payment.date.unwrap_or(today),
            deductions: payment.deductions,
            work_log,
            transaction_slip_url: payment.transaction_slip_url.clone(),
        }
    }
}

/// Returns the calendar month a date falls in.
pub fn month_of(date: NaiveDate) -> Month {
    Month::try_from(date.month() as u8).unwrap_or(Month::January)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkLogBlob;

    #[test]
    fn test_coerce_amount_handles_junk() {
        assert_eq!(coerce_amount("500"), Decimal::from(500));
        assert_eq!(coerce_amount("1e3"), Decimal::from(1000));
        assert_eq!(coerce_amount("ten"), Decimal::ZERO);
        assert_eq!(coerce_amount("  "), Decimal::ZERO);
    }

    #[test]
    fn test_draft_row_accepts_strings_numbers_and_nulls() {
        let json = r#"[
            {"branch": "A", "days": "10", "rate": 500},
            {"branch": "B", "days": null, "rate": "abc"},
            {"branch": "C"}
        ]"#;

        let rows: Vec<WorkLogDraftRow> = serde_json::from_str(json).unwrap();
        assert_eq!(rows[0].days, Decimal::from(10));
        assert_eq!(rows[0].rate, Decimal::from(500));
        assert_eq!(rows[1].days, Decimal::ZERO);
        assert_eq!(rows[1].rate, Decimal::ZERO);
        assert_eq!(rows[2].days, Decimal::ZERO);
    }

    #[test]
    fn test_deserialize_payment_draft() {
        let json = r#"{
            "staff_name": "Nimal Perera",
            "month": "January",
            "date": "2025-01-31",
            "deductions": "1000",
            "work_log": [{"branch": "A", "days": 10, "rate": 500}]
        }"#;

        let draft: PaymentDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.month, Month::January);
        assert_eq!(draft.deductions, Decimal::from(1000));
        assert_eq!(draft.work_log.len(), 1);
        assert_eq!(draft.transaction_slip_url, None);
    }

    #[test]
    fn test_blank_row_uses_default_rate() {
        let row = WorkLogDraftRow::blank(Decimal::from(500));
        assert!(row.branch.is_empty());
        assert_eq!(row.days, Decimal::ZERO);
        assert_eq!(row.rate, Decimal::from(500));
    }

    #[test]
    fn test_reopen_saved_payment() {
        let payment: SalaryLog = serde_json::from_str(
            r#"{
                "payment_id": "PAY-1",
                "staff_name": "Nimal Perera",
                "month": "February",
                "date": "2025-02-28",
                "gross_total": 5000,
                "deductions": 250,
                "net_pay": 4750,
                "work_log": "[{\"branch\":\"A\",\"days\":10,\"rate\":500,\"total\":5000}]"
            }"#,
        )
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let draft = PaymentDraft::from_payment(&payment, today, Decimal::from(500));
        assert_eq!(draft.month, Month::February);
        assert_eq!(draft.deductions, Decimal::from(250));
        assert_eq!(draft.work_log, vec![WorkLogDraftRow::new("A", Decimal::from(10), Decimal::from(500))]);
    }

    #[test]
    fn test_reopen_with_corrupt_log_gets_blank_row() {
        let mut payment: SalaryLog = serde_json::from_str(r#"{"staff_name": "Kamala"}"#).unwrap();
        payment.work_log = WorkLogBlob::from_raw(Value::String("not json".to_string()));
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let draft = PaymentDraft::from_payment(&payment, today, Decimal::from(500));
        assert_eq!(draft.month, Month::June);
        assert_eq!(draft.date, today);
        assert_eq!(draft.work_log, vec![WorkLogDraftRow::blank(Decimal::from(500))]);
    }
}
