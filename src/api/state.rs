//! Application state for the cleaning operations API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::ConfigLoader;
use crate::error::OpsResult;
use crate::financials::RevenueBook;
use crate::notifications::{NotificationCenter, NotificationIssuer};
use crate::payroll::PayrollService;
use crate::receipt::ReceiptRenderer;
use crate::services::{BranchService, CommitHooks, ComplaintService, StaffService};
use crate::store::{self, RowStore};

/// Shared application state.
///
/// Every service shares one store handle. Branch and complaint mutations
/// publish to a [`NotificationIssuer`].
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    store: Arc<dyn RowStore>,
    payroll: PayrollService,
    branches: BranchService,
    complaints: ComplaintService,
    staff: StaffService,
    notifications: NotificationCenter,
    revenues: Arc<Mutex<RevenueBook>>,
}

impl AppState {
    /// Creates the state over an already-open store and revenue book.
    pub fn new(config: ConfigLoader, store: Arc<dyn RowStore>, revenues: RevenueBook) -> Self {
        let hooks = CommitHooks::new().with(Arc::new(NotificationIssuer::new(Arc::clone(&store))));
        let payroll = PayrollService::new(
            Arc::clone(&store),
            ReceiptRenderer::from_config(&config),
            config.default_daily_rate(),
        )
        .with_upload_limit(config.max_upload_bytes());

        Self {
            payroll,
            branches: BranchService::new(Arc::clone(&store), hooks.clone()),
            complaints: ComplaintService::new(Arc::clone(&store), hooks),
            staff: StaffService::new(Arc::clone(&store), config.max_upload_bytes()),
            notifications: NotificationCenter::new(Arc::clone(&store)),
            revenues: Arc::new(Mutex::new(revenues)),
            store,
            config: Arc::new(config),
        }
    }

    /// Opens the configured store and revenue book.
    pub fn from_config(config: ConfigLoader) -> OpsResult<Self> {
        let store = store::connect(config.store())?;
        let revenues = RevenueBook::load(&config.config().financials.revenue_book_path);
        Ok(Self::new(config, store, revenues))
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// The shared store handle.
    pub fn store(&self) -> Arc<dyn RowStore> {
        Arc::clone(&self.store)
    }

    /// Payment recording.
    pub fn payroll(&self) -> &PayrollService {
        &self.payroll
    }

    /// Branch records.
    pub fn branches(&self) -> &BranchService {
        &self.branches
    }

    /// Complaint records.
    pub fn complaints(&self) -> &ComplaintService {
        &self.complaints
    }

    /// Staff records.
    pub fn staff(&self) -> &StaffService {
        &self.staff
    }

    /// Notification panel.
    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// The branch revenue book.
    pub fn revenues(&self) -> &Mutex<RevenueBook> {
        &self.revenues
    }
}
