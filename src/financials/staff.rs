//! Lifetime pay per staff member.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;

use crate::models::{Cleaner, SalaryLog, StaffRole};
use crate::store::Stored;

/// One roster member's payment history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffHistory {
    /// Staff name.
    pub name: String,
    /// Current role on the roster.
    pub role: StaffRole,
    /// Sum of net pay over every matching payment.
    pub total_paid: Decimal,
    /// Number of matching payments.
    pub payment_count: usize,
    /// The most recent payment, if any.
    pub latest_payment: Option<Stored<SalaryLog>>,
    /// Every matching payment, newest first.
    pub payments: Vec<Stored<SalaryLog>>,
}

/// When a payment happened: its payment date, else its creation time.
fn paid_at(payment: &Stored<SalaryLog>) -> Option<DateTime<Utc>> {
    payment
        .record
        .date
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
        .or(payment.created_date)
}

/// Newest first; undated payments go last.
fn newest_first(a: &Stored<SalaryLog>, b: &Stored<SalaryLog>) -> Ordering {
    match (paid_at(a), paid_at(b)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Builds each roster member's history, highest total paid first.
///
/// Payments are matched to staff by exact name. Payments naming someone
/// who is not on the roster appear in no history.
pub fn staff_history(roster: &[Cleaner], payments: &[Stored<SalaryLog>]) -> Vec<StaffHistory> {
    let mut histories: Vec<StaffHistory> = roster
        .iter()
        .map(|cleaner| {
            let mut matching: Vec<Stored<SalaryLog>> = payments
                .iter()
                .filter(|p| p.record.staff_name == cleaner.name)
                .cloned()
                .collect();
            matching.sort_by(newest_first);

            StaffHistory {
                name: cleaner.name.clone(),
                role: cleaner.role,
                total_paid: matching
                    .iter()
                    .fold(Decimal::ZERO, |sum, p| sum.saturating_add(p.record.net_pay)),
                payment_count: matching.len(),
                latest_payment: matching.first().cloned(),
                payments: matching,
            }
        })
        .collect();

    histories.sort_by(|a, b| b.total_paid.cmp(&a.total_paid));
    histories
}

/// Sum of every roster member's total paid.
pub fn personnel_cost(histories: &[StaffHistory]) -> Decimal {
    histories
        .iter()
        .fold(Decimal::ZERO, |sum, h| sum.saturating_add(h.total_paid))
}

/// Personnel cost divided by roster size, rounded to a whole amount.
pub fn average_per_staff(personnel_cost: Decimal, roster_size: usize) -> Decimal {
    if roster_size == 0 {
        return Decimal::ZERO;
    }
    (personnel_cost / Decimal::from(roster_size)).round()
}
