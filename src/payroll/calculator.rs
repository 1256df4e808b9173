//! Payroll arithmetic.
//!
//! A payment's gross total is the sum of `days × rate` over its billable
//! work-log rows, and its net pay is the gross total minus deductions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{OpsError, OpsResult};
use crate::models::{Cleaner, PaymentStatus, SalaryLog, WorkLogBlob, WorkLogEntry};

use super::draft::{PaymentDraft, WorkLogDraftRow};

/// Role recorded when the paid staff member is not on the roster.
pub const UNKNOWN_ROLE: &str = "—";

/// The result of computing totals for a draft's work log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollComputation {
    /// Billable rows, in entry order, with totals filled in.
    pub entries: Vec<WorkLogEntry>,
    /// Sum of billable row totals.
    pub gross_total: Decimal,
    /// Deductions as entered.
    pub deductions: Decimal,
    /// `gross_total - deductions`. Not clamped.
    pub net_pay: Decimal,
    /// Number of rows left out for lacking a branch or days.
    pub excluded_rows: usize,
}

/// Whether a payment is being recorded for the first time or corrected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMode {
    /// A new payment; a fresh payment id is generated.
    New,
    /// An edit of an existing payment; its id is kept.
    Edit {
        /// The id to preserve.
        payment_id: String,
    },
}

/// Returns `days × rate` for one row, or `None` when it overflows.
pub fn row_total(row: &WorkLogDraftRow) -> Option<Decimal> {
    row.days.checked_mul(row.rate)
}

/// Returns true when a row counts toward the gross total.
///
/// A row is billable when it names a branch and has a positive day count.
/// The rate is not checked; a zero rate simply contributes nothing.
pub fn is_billable(row: &WorkLogDraftRow) -> bool {
    !row.branch.trim().is_empty() && row.days > Decimal::ZERO
}

/// Computes gross and net pay for a work log.
///
/// Rows that are not [billable](is_billable) are dropped silently and
/// counted in `excluded_rows`.
///
/// # Arguments
///
/// * `rows` - The work-log rows in entry order
/// * `deductions` - Advances and other deductions to subtract
///
/// # Returns
///
/// A [`PayrollComputation`]. Net pay may be negative when deductions exceed
/// the gross total.
///
/// # Errors
///
/// A validation error when a row total, the gross total or the net pay does
/// not fit in a [`Decimal`].
///
/// # Examples
///
/// ```
/// use cleaning_ops::payroll::{compute_payroll, WorkLogDraftRow};
/// use rust_decimal::Decimal;
///
/// let rows = vec![
///     WorkLogDraftRow::new("Colombo 03", Decimal::from(10), Decimal::from(500)),
///     WorkLogDraftRow::new("Kandy", Decimal::ZERO, Decimal::from(700)),
/// ];
///
/// let result = compute_payroll(&rows, Decimal::from(1000)).unwrap();
///
/// assert_eq!(result.gross_total, Decimal::from(5000));
/// assert_eq!(result.net_pay, Decimal::from(4000));
/// assert_eq!(result.entries.len(), 1);
/// assert_eq!(result.excluded_rows, 1);
/// ```
pub fn compute_payroll(
    rows: &[WorkLogDraftRow],
    deductions: Decimal,
) -> OpsResult<PayrollComputation> {
    let mut entries = Vec::with_capacity(rows.len());
    let mut gross_total = Decimal::ZERO;
    for row in rows.iter().filter(|row| is_billable(row)) {
        let entry = WorkLogEntry::try_new(row.branch.trim(), row.days, row.rate)
            .ok_or_else(|| out_of_range("work_log"))?;
        gross_total = gross_total
            .checked_add(entry.total)
            .ok_or_else(|| out_of_range("work_log"))?;
        entries.push(entry);
    }
    let net_pay = gross_total
        .checked_sub(deductions)
        .ok_or_else(|| out_of_range("deductions"))?;
    let excluded_rows = rows.len() - entries.len();

    Ok(PayrollComputation {
        entries,
        gross_total,
        deductions,
        net_pay,
        excluded_rows,
    })
}

fn out_of_range(field: &str) -> OpsError {
    OpsError::validation(field, "amount out of range")
}

/// Checks a draft and computes its totals.
///
/// Checks run in this order, and the first failure is returned:
///
/// 1. a staff member must be chosen
/// 2. at least one work-log row must be billable
/// 3. the gross total must be positive
///
/// Nothing here touches the store.
pub fn validate_draft(draft: &PaymentDraft) -> OpsResult<PayrollComputation> {
    if draft.staff_name.trim().is_empty() {
        return Err(OpsError::validation("staff_name", "Please select a staff member"));
    }

    let computation = compute_payroll(&draft.work_log, draft.deductions)?;
    if computation.entries.is_empty() {
        return Err(OpsError::validation(
            "work_log",
            "Add at least one work log entry with a branch and days worked",
        ));
    }
    if computation.gross_total <= Decimal::ZERO {
        return Err(OpsError::validation(
            "gross_total",
            "Gross total must be greater than zero",
        ));
    }

    Ok(computation)
}

/// Generates a payment identifier from a timestamp and a random suffix.
///
/// ```
/// use cleaning_ops::payroll::generate_payment_id;
/// use chrono::{TimeZone, Utc};
///
/// let now = Utc.timestamp_millis_opt(1_735_689_600_000).unwrap();
/// let id = generate_payment_id(now);
/// assert!(id.starts_with("PAY-1735689600000-"));
/// assert_eq!(id.len(), "PAY-1735689600000-".len() + 8);
/// ```
pub fn generate_payment_id(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("PAY-{}-{}", now.timestamp_millis(), &suffix[..8])
}

/// Looks up the role snapshot for a staff member by name.
///
/// Returns [`UNKNOWN_ROLE`] when nobody on the roster has that name.
pub fn resolve_role(roster: &[Cleaner], staff_name: &str) -> String {
    roster
        .iter()
        .find(|cleaner| cleaner.name == staff_name)
        .map(|cleaner| cleaner.role.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_ROLE.to_string())
}

/// Builds the payment record from an already validated computation.
pub fn assemble_payment(
    draft: &PaymentDraft,
    computation: PayrollComputation,
    role: impl Into<String>,
    mode: PaymentMode,
) -> SalaryLog {
    let payment_id = match mode {
        PaymentMode::New => generate_payment_id(Utc::now()),
        PaymentMode::Edit { payment_id } => payment_id,
    };

    SalaryLog {
        payment_id,
        date: Some(draft.date),
        month: Some(draft.month),
        staff_name: draft.staff_name.trim().to_string(),
        role: Some(role.into()),
        gross_total: computation.gross_total,
        deductions: computation.deductions,
        net_pay: computation.net_pay,
        work_log: WorkLogBlob::from_entries(&computation.entries),
        transaction_slip_url: draft.transaction_slip_url.clone(),
        status: PaymentStatus::Paid,
    }
}

/// Validates a draft and turns it into a finished payment record.
///
/// # Arguments
///
/// * `draft` - The operator's input
/// * `role` - Role snapshot for the staff member (see [`resolve_role`])
/// * `mode` - Whether to generate a new payment id or keep an existing one
///
/// # Errors
///
/// Returns [`OpsError::Validation`] as described in [`validate_draft`].
///
/// # Examples
///
/// ```
/// use cleaning_ops::payroll::{finalize_payment, PaymentDraft, PaymentMode, WorkLogDraftRow};
/// use chrono::{Month, NaiveDate};
/// use rust_decimal::Decimal;
///
/// let draft = PaymentDraft {
///     staff_name: "Nimal Perera".to_string(),
///     month: Month::January,
///     date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
///     deductions: Decimal::from(1000),
///     work_log: vec![WorkLogDraftRow::new("Colombo 03", Decimal::from(10), Decimal::from(500))],
///     transaction_slip_url: None,
/// };
///
/// let payment = finalize_payment(
///     &draft,
///     "Cleaner",
///     PaymentMode::Edit { payment_id: "PAY-1".to_string() },
/// )
/// .unwrap();
///
/// assert_eq!(payment.payment_id, "PAY-1");
/// assert_eq!(payment.net_pay, Decimal::from(4000));
/// ```
pub fn finalize_payment(
    draft: &PaymentDraft,
    role: impl Into<String>,
    mode: PaymentMode,
) -> OpsResult<SalaryLog> {
    let computation = validate_draft(draft)?;
    Ok(assemble_payment(draft, computation, role, mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StaffRole;
    use crate::payroll::coerce_amount;
    use chrono::{Month, NaiveDate};
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn draft(staff: &str, rows: Vec<WorkLogDraftRow>, deductions: &str) -> PaymentDraft {
        PaymentDraft {
            staff_name: staff.to_string(),
            month: Month::March,
            date: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            deductions: dec(deductions),
            work_log: rows,
            transaction_slip_url: None,
        }
    }

    #[test]
    fn test_invalid_rows_contribute_nothing() {
        let rows = vec![
            WorkLogDraftRow::new("A", dec("10"), dec("500")),
            WorkLogDraftRow::new("B", dec("0"), dec("700")),
            WorkLogDraftRow::new("", dec("4"), dec("700")),
            WorkLogDraftRow::new("   ", dec("4"), dec("700")),
        ];

        let result = compute_payroll(&rows, dec("1000")).unwrap();

        assert_eq!(result.gross_total, dec("5000"));
        assert_eq!(result.net_pay, dec("4000"));
        assert_eq!(result.excluded_rows, 3);
        assert_eq!(result.entries[0].branch, "A");
    }

    #[test]
    fn test_fractional_days_and_rates() {
        let rows = vec![
            WorkLogDraftRow::new("A", dec("2.5"), dec("750.50")),
            WorkLogDraftRow::new("B", dec("1"), dec("0.25")),
        ];
        let result = compute_payroll(&rows, Decimal::ZERO).unwrap();
        assert_eq!(result.gross_total, dec("1876.50"));
    }

    #[test]
    fn test_net_pay_may_be_negative() {
        let rows = vec![WorkLogDraftRow::new("A", dec("1"), dec("500"))];
        let result = compute_payroll(&rows, dec("800")).unwrap();
        assert_eq!(result.net_pay, dec("-300"));
    }

    #[test]
    fn test_oversized_amounts_are_rejected() {
        let rows = vec![WorkLogDraftRow::new(
            "A",
            coerce_amount("1e20"),
            coerce_amount("1e20"),
        )];
        match compute_payroll(&rows, Decimal::ZERO).unwrap_err() {
            OpsError::Validation { field, message } => {
                assert_eq!(field, "work_log");
                assert_eq!(message, "amount out of range");
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_gross_overflow_is_rejected() {
        let rows = vec![
            WorkLogDraftRow::new("A", Decimal::ONE, Decimal::MAX),
            WorkLogDraftRow::new("B", Decimal::ONE, Decimal::MAX),
        ];
        assert!(matches!(
            compute_payroll(&rows, Decimal::ZERO),
            Err(OpsError::Validation { .. })
        ));
    }

    #[test]
    fn test_net_pay_overflow_is_rejected() {
        let rows = vec![WorkLogDraftRow::new("A", Decimal::ONE, Decimal::MAX)];
        match compute_payroll(&rows, Decimal::MIN).unwrap_err() {
            OpsError::Validation { field, .. } => assert_eq!(field, "deductions"),
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_staff_is_checked_first() {
        let err = validate_draft(&draft(" ", Vec::new(), "0")).unwrap_err();
        match err {
            OpsError::Validation { field, .. } => assert_eq!(field, "staff_name"),
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_no_billable_rows_is_rejected() {
        let rows = vec![WorkLogDraftRow::new("", dec("3"), dec("500"))];
        match validate_draft(&draft("Nimal", rows, "0")).unwrap_err() {
            OpsError::Validation { field, .. } => assert_eq!(field, "work_log"),
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_gross_is_rejected() {
        let rows = vec![WorkLogDraftRow::new("A", dec("3"), dec("0"))];
        match validate_draft(&draft("Nimal", rows, "0")).unwrap_err() {
            OpsError::Validation { field, .. } => assert_eq!(field, "gross_total"),
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_new_payment_gets_fresh_id() {
        let rows = vec![WorkLogDraftRow::new("A", dec("10"), dec("500"))];
        let d = draft("Nimal", rows, "0");

        let first = finalize_payment(&d, "Cleaner", PaymentMode::New).unwrap();
        let second = finalize_payment(&d, "Cleaner", PaymentMode::New).unwrap();

        assert!(first.payment_id.starts_with("PAY-"));
        assert_ne!(first.payment_id, second.payment_id);
        assert_eq!(first.status, PaymentStatus::Paid);
        assert_eq!(first.month, Some(Month::March));
    }

    #[test]
    fn test_edit_recomputes_and_keeps_id() {
        let rows = vec![
            WorkLogDraftRow::new("A", dec("10"), dec("500")),
            WorkLogDraftRow::new("B", dec("2"), dec("600")),
        ];
        let payment = finalize_payment(
            &draft("Nimal", rows, "200"),
            "Supervisor",
            PaymentMode::Edit {
                payment_id: "PAY-42".to_string(),
            },
        )
        .unwrap();

        assert_eq!(payment.payment_id, "PAY-42");
        assert_eq!(payment.gross_total, dec("6200"));
        assert_eq!(payment.net_pay, dec("6000"));
        assert_eq!(payment.work_log_entries().unwrap().len(), 2);
    }

    #[test]
    fn test_resolve_role_from_roster() {
        let roster = vec![
            Cleaner::new("Nimal Perera", StaffRole::Supervisor),
            Cleaner::new("Kamala", StaffRole::Cleaner),
        ];
        assert_eq!(resolve_role(&roster, "Nimal Perera"), "Supervisor");
        assert_eq!(resolve_role(&roster, "Someone Else"), UNKNOWN_ROLE);
    }

    fn amount() -> impl Strategy<Value = Decimal> {
        (0i64..100_000, 0u32..3).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
    }

    fn draft_row() -> impl Strategy<Value = WorkLogDraftRow> {
        (prop::sample::select(vec!["", "A", "B", "Colombo 03"]), amount(), amount())
            .prop_map(|(branch, days, rate)| WorkLogDraftRow::new(branch, days, rate))
    }

    proptest! {
        #[test]
        fn prop_net_is_gross_minus_deductions(
            rows in prop::collection::vec(draft_row(), 0..12),
            deductions in amount(),
        ) {
            let result = compute_payroll(&rows, deductions).unwrap();
            prop_assert_eq!(result.net_pay, result.gross_total - deductions);
        }

        #[test]
        fn prop_gross_is_sum_of_billable_rows(rows in prop::collection::vec(draft_row(), 0..12)) {
            let expected: Decimal = rows
                .iter()
                .filter(|row| is_billable(row))
                .map(|row| row_total(row).unwrap())
                .sum();
            let result = compute_payroll(&rows, Decimal::ZERO).unwrap();

            prop_assert_eq!(result.gross_total, expected);
            prop_assert_eq!(result.entries.len() + result.excluded_rows, rows.len());
            for entry in &result.entries {
                prop_assert_eq!(entry.total, entry.days * entry.rate);
            }
        }

        #[test]
        fn prop_computation_is_idempotent(rows in prop::collection::vec(draft_row(), 0..12)) {
            prop_assert_eq!(
                compute_payroll(&rows, Decimal::ONE).unwrap(),
                compute_payroll(&rows, Decimal::ONE).unwrap()
            );
        }
    }
}
