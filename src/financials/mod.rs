//! Financial aggregation.
//!
//! Pure views over payment records and the staff roster: company totals,
//! monthly and per-role breakdowns, branch spend and profit, and per-staff
//! lifetime pay. Nothing here writes to the store, and computing the same
//! views twice over the same inputs gives the same result.

mod branches;
mod revenue;
mod staff;
mod summary;

pub use branches::{
    BranchExpense, BranchMonthExpense, BranchProfit, BranchSpending, branch_profits,
    branch_spending, margin_percent,
};
pub use revenue::RevenueBook;
pub use staff::{StaffHistory, average_per_staff, personnel_cost, staff_history};
pub use summary::{MonthlyTotal, PayrollTotals, RoleTotal, monthly_totals, payroll_totals, role_totals};

use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::OpsResult;
use crate::models::{Cleaner, SalaryLog};
use crate::store::{EntityClient, RowStore, SortSpec, Stored};

/// Every financial view at once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialOverview {
    /// Company-wide totals.
    pub totals: PayrollTotals,
    /// Totals per month label.
    pub monthly: Vec<MonthlyTotal>,
    /// Work-log spend per branch.
    pub branch_expenses: Vec<BranchExpense>,
    /// Work-log spend per branch and month.
    pub branch_monthly: Vec<BranchMonthExpense>,
    /// Revenue against spend per branch.
    pub branch_profits: Vec<BranchProfit>,
    /// Net pay per role snapshot.
    pub roles: Vec<RoleTotal>,
    /// Per-staff payment histories, highest paid first.
    pub staff: Vec<StaffHistory>,
    /// Sum of roster members' total pay.
    pub personnel_cost: Decimal,
    /// Personnel cost per roster member.
    pub average_per_staff: Decimal,
    /// Payments left out of the branch views for an unreadable work log.
    pub skipped_payments: Vec<String>,
}

impl FinancialOverview {
    /// Computes every view from in-memory records.
    pub fn compute(
        payments: &[Stored<SalaryLog>],
        roster: &[Cleaner],
        revenues: &RevenueBook,
    ) -> Self {
        let spending = branch_spending(payments);
        let branch_profits = branch_profits(&spending, revenues);
        let staff = staff_history(roster, payments);
        let personnel_cost = personnel_cost(&staff);

        Self {
            totals: payroll_totals(payments),
            monthly: monthly_totals(payments),
            branch_expenses: spending.total,
            branch_monthly: spending.monthly,
            branch_profits,
            roles: role_totals(payments),
            average_per_staff: average_per_staff(personnel_cost, roster.len()),
            personnel_cost,
            staff,
            skipped_payments: spending.skipped_payments,
        }
    }

    /// Reads payments (newest first) and the roster, then computes.
    pub async fn fetch(store: Arc<dyn RowStore>, revenues: &RevenueBook) -> OpsResult<Self> {
        let payments = EntityClient::<SalaryLog>::new(Arc::clone(&store))
            .list(Some(SortSpec::newest_first()), None)
            .await?;
        let roster: Vec<Cleaner> = EntityClient::<Cleaner>::new(store)
            .list(None, None)
            .await?
            .into_iter()
            .map(|stored| stored.record)
            .collect();

        debug!(
            payments = payments.len(),
            staff = roster.len(),
            "Computing financial overview"
        );
        Ok(Self::compute(&payments, &roster, revenues))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{StaffRole, WorkLogBlob};
    use crate::store::MemoryStore;

    /// A stored payment with `net_pay = gross - deductions` and a raw work log.
    pub(crate) fn stored_payment(
        staff: &str,
        month: Option<&str>,
        role: Option<&str>,
        gross: i64,
        deductions: i64,
        work_log: &str,
    ) -> Stored<SalaryLog> {
        let mut record: SalaryLog = serde_json::from_value(serde_json::json!({
            "payment_id": format!("PAY-{}", staff),
            "staff_name": staff,
            "month": month,
            "role": role,
            "gross_total": gross,
            "deductions": deductions,
            "net_pay": gross - deductions,
        }))
        .unwrap();
        record.work_log = WorkLogBlob::from_raw(serde_json::Value::String(work_log.to_string()));
        Stored {
            id: format!("row-{}", staff),
            created_date: None,
            record,
        }
    }

    fn sample() -> (Vec<Stored<SalaryLog>>, Vec<Cleaner>, RevenueBook) {
        let payments = vec![
            stored_payment(
                "Nimal",
                Some("January"),
                Some("Cleaner"),
                5000,
                1000,
                r#"[{"branch":"A","days":10,"rate":500,"total":5000}]"#,
            ),
            stored_payment("Kamala", Some("January"), Some("Supervisor"), 2000, 0, "oops"),
        ];
        let roster = vec![
            Cleaner::new("Nimal", StaffRole::Cleaner),
            Cleaner::new("Kamala", StaffRole::Supervisor),
        ];
        let mut revenues = RevenueBook::in_memory();
        revenues.set("A", Decimal::from(10000)).unwrap();
        (payments, roster, revenues)
    }

    #[test]
    fn test_overview_combines_views() {
        let (payments, roster, revenues) = sample();
        let overview = FinancialOverview::compute(&payments, &roster, &revenues);

        assert_eq!(overview.totals.total_payroll, Decimal::from(6000));
        assert_eq!(overview.branch_expenses.len(), 1);
        assert_eq!(overview.branch_profits[0].margin_percent, Decimal::from(50));
        assert_eq!(overview.skipped_payments, vec!["PAY-Kamala".to_string()]);
        assert_eq!(overview.personnel_cost, Decimal::from(6000));
        assert_eq!(overview.average_per_staff, Decimal::from(3000));
        assert_eq!(overview.staff[0].name, "Nimal");
    }

    #[test]
    fn test_overview_is_idempotent() {
        let (payments, roster, revenues) = sample();
        assert_eq!(
            FinancialOverview::compute(&payments, &roster, &revenues),
            FinancialOverview::compute(&payments, &roster, &revenues)
        );
    }

    #[tokio::test]
    async fn test_fetch_reads_from_store() {
        let store = Arc::new(MemoryStore::new());
        let (payments, roster, revenues) = sample();
        let payment_client: EntityClient<SalaryLog> = EntityClient::new(store.clone());
        for payment in &payments {
            payment_client.create(&payment.record).await.unwrap();
        }
        let staff_client: EntityClient<Cleaner> = EntityClient::new(store.clone());
        for cleaner in &roster {
            staff_client.create(cleaner).await.unwrap();
        }

        let overview = FinancialOverview::fetch(store, &revenues).await.unwrap();
        assert_eq!(overview.totals.payment_count, 2);
        assert_eq!(overview.staff.len(), 2);
    }
}
