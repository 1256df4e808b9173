//! Company-wide payroll totals, by month and by role.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::SalaryLog;
use crate::store::Stored;

/// Totals over every payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayrollTotals {
    /// Sum of net pay.
    pub total_payroll: Decimal,
    /// Sum of gross totals.
    pub total_gross: Decimal,
    /// Sum of deductions.
    pub total_deductions: Decimal,
    /// Number of payments.
    pub payment_count: usize,
    /// `total_payroll / payment_count`, or zero without payments.
    pub average_payment: Decimal,
}

/// Net pay and deductions for one month label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// Month name, or "Unknown".
    pub month: String,
    /// Sum of net pay.
    pub payroll: Decimal,
    /// Sum of deductions.
    pub deductions: Decimal,
}

/// Net pay for one role snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleTotal {
    /// Role as recorded on the payment, or "Unknown".
    pub role: String,
    /// Sum of net pay.
    pub total: Decimal,
}

/// Sums every payment.
///
/// # Example
///
/// ```
/// use cleaning_ops::financials::payroll_totals;
///
/// let totals = payroll_totals(&[]);
/// assert_eq!(totals.payment_count, 0);
/// assert!(totals.average_payment.is_zero());
/// ```
pub fn payroll_totals(payments: &[Stored<SalaryLog>]) -> PayrollTotals {
    let mut totals = PayrollTotals {
        total_payroll: Decimal::ZERO,
        total_gross: Decimal::ZERO,
        total_deductions: Decimal::ZERO,
        payment_count: payments.len(),
        average_payment: Decimal::ZERO,
    };
    for payment in payments {
        totals.total_payroll = totals.total_payroll.saturating_add(payment.record.net_pay);
        totals.total_gross = totals.total_gross.saturating_add(payment.record.gross_total);
        totals.total_deductions = totals
            .total_deductions
            .saturating_add(payment.record.deductions);
    }
    if !payments.is_empty() {
        totals.average_payment = totals.total_payroll / Decimal::from(payments.len());
    }
    totals
}

/// Groups payments by month label, in order of first appearance.
pub fn monthly_totals(payments: &[Stored<SalaryLog>]) -> Vec<MonthlyTotal> {
    let mut months: Vec<MonthlyTotal> = Vec::new();
    for payment in payments {
        let label = payment.record.month_label();
        let index = match months.iter().position(|m| m.month == label) {
            Some(index) => index,
            None => {
                months.push(MonthlyTotal {
                    month: label.to_string(),
                    payroll: Decimal::ZERO,
                    deductions: Decimal::ZERO,
                });
                months.len() - 1
            }
        };
        let month = &mut months[index];
        month.payroll = month.payroll.saturating_add(payment.record.net_pay);
        month.deductions = month.deductions.saturating_add(payment.record.deductions);
    }
    months
}

/// Groups net pay by the role recorded on each payment, in order of first
/// appearance.
pub fn role_totals(payments: &[Stored<SalaryLog>]) -> Vec<RoleTotal> {
    let mut roles: Vec<RoleTotal> = Vec::new();
    for payment in payments {
        let role = payment.record.role_label();
        match roles.iter_mut().find(|r| r.role == role) {
            Some(existing) => existing.total = existing.total.saturating_add(payment.record.net_pay),
            None => roles.push(RoleTotal {
                role: role.to_string(),
                total: payment.record.net_pay,
            }),
        }
    }
    roles
}
