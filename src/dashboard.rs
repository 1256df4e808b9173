//! Home-screen counts.

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::OpsResult;
use crate::models::{Branch, Cleaner, Complaint, SalaryLog};
use crate::services::{BranchService, ComplaintService, StaffService};
use crate::store::{EntityClient, RowStore, SortSpec, Stored};

/// How many payments the dashboard shows.
pub const RECENT_PAYMENTS: usize = 5;

/// A point-in-time summary of the business.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// Complaints that are Open or In Progress.
    pub open_complaints: usize,
    /// Branches with status Active.
    pub active_branches: usize,
    /// Staff with status Active.
    pub active_staff: usize,
    /// All branches.
    pub total_branches: usize,
    /// All staff.
    pub total_staff: usize,
    /// All complaints.
    pub total_complaints: usize,
    /// The most recent payments, newest first.
    pub recent_payments: Vec<Stored<SalaryLog>>,
}

impl DashboardSnapshot {
    /// Reads every collection the dashboard needs, concurrently.
    pub async fn fetch(store: Arc<dyn RowStore>) -> OpsResult<Self> {
        let branches = EntityClient::<Branch>::new(Arc::clone(&store));
        let staff = EntityClient::<Cleaner>::new(Arc::clone(&store));
        let complaints = EntityClient::<Complaint>::new(Arc::clone(&store));
        let payments = EntityClient::<SalaryLog>::new(store);

        let (branches, staff, complaints, recent_payments) = futures::try_join!(
            branches.list(None, None),
            staff.list(None, None),
            complaints.list(None, None),
            payments.list(Some(SortSpec::newest_first()), Some(RECENT_PAYMENTS))
        )?;

        debug!(
            branches = branches.len(),
            staff = staff.len(),
            complaints = complaints.len(),
            "Dashboard snapshot read"
        );
        Ok(Self {
            open_complaints: ComplaintService::count_open(&complaints),
            active_branches: BranchService::active_count(&branches),
            active_staff: StaffService::active_count(&staff),
            total_branches: branches.len(),
            total_staff: staff.len(),
            total_complaints: complaints.len(),
            recent_payments,
        })
    }
}
