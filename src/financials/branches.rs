//! Per-branch expense and profit.
//!
//! Expenses come from flattening every payment's work log. A payment whose
//! work log cannot be decoded is left out of these figures (it still counts
//! in the company-wide totals).

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::warn;

use crate::models::SalaryLog;
use crate::store::Stored;

use super::revenue::RevenueBook;

/// Total work-log spend at one branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchExpense {
    /// Branch name as written in the work log.
    pub branch: String,
    /// Sum of work-log totals.
    pub expense: Decimal,
}

/// Work-log spend at one branch within one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchMonthExpense {
    /// Branch name.
    pub branch: String,
    /// Month label of the payment, or "Unknown".
    pub month: String,
    /// Sum of work-log totals.
    pub amount: Decimal,
}

/// Branch spend, overall and by month.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BranchSpending {
    /// Spend per branch, in order of first appearance.
    pub total: Vec<BranchExpense>,
    /// Spend per (branch, month), in order of first appearance.
    pub monthly: Vec<BranchMonthExpense>,
    /// Payment ids whose work log could not be decoded.
    pub skipped_payments: Vec<String>,
}

/// Revenue, expense and profit for one branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchProfit {
    /// Branch name.
    pub branch: String,
    /// Revenue from the revenue book, zero when unset.
    pub revenue: Decimal,
    /// Work-log spend.
    pub expense: Decimal,
    /// `revenue - expense`.
    pub profit: Decimal,
    /// `profit / revenue * 100` to one decimal place; zero without revenue.
    pub margin_percent: Decimal,
}

/// Sums work-log spend per branch and per (branch, month).
pub fn branch_spending(payments: &[Stored<SalaryLog>]) -> BranchSpending {
    let mut spending = BranchSpending::default();

    for payment in payments {
        let entries = match payment.record.work_log_entries() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    id = %payment.id,
                    payment_id = %payment.record.payment_id,
                    error = %e,
                    "Skipping payment with invalid work log"
                );
                spending.skipped_payments.push(payment.record.payment_id.clone());
                continue;
            }
        };
        let month = payment.record.month_label();

        for entry in entries {
            match spending.total.iter_mut().find(|b| b.branch == entry.branch) {
                Some(existing) => existing.expense = existing.expense.saturating_add(entry.total),
                None => spending.total.push(BranchExpense {
                    branch: entry.branch.clone(),
                    expense: entry.total,
                }),
            }

            match spending
                .monthly
                .iter_mut()
                .find(|b| b.branch == entry.branch && b.month == month)
            {
                Some(existing) => existing.amount = existing.amount.saturating_add(entry.total),
                None => spending.monthly.push(BranchMonthExpense {
                    branch: entry.branch,
                    month: month.to_string(),
                    amount: entry.total,
                }),
            }
        }
    }

    spending
}

/// Computes a profit margin percentage rounded to one decimal place.
///
/// ```
/// use cleaning_ops::financials::margin_percent;
/// use rust_decimal::Decimal;
///
/// assert_eq!(margin_percent(Decimal::from(3000), Decimal::from(10000)), Decimal::new(300, 1));
/// assert_eq!(margin_percent(Decimal::from(-500), Decimal::ZERO), Decimal::ZERO);
/// ```
pub fn margin_percent(profit: Decimal, revenue: Decimal) -> Decimal {
    if revenue <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let margin = profit
        .checked_div(revenue)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
    match margin {
        Some(margin) => margin.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero),
        None if profit.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    }
}

/// Pairs each branch's spend with its recorded revenue.
///
/// Only branches that appear in some work log are listed.
pub fn branch_profits(spending: &BranchSpending, revenues: &RevenueBook) -> Vec<BranchProfit> {
    spending
        .total
        .iter()
        .map(|branch| {
            let revenue = revenues.revenue_for(&branch.branch);
            let profit = revenue.saturating_sub(branch.expense);
            BranchProfit {
                branch: branch.branch.clone(),
                revenue,
                expense: branch.expense,
                profit,
                margin_percent: margin_percent(profit, revenue),
            }
        })
        .collect()
}
