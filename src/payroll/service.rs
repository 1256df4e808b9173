//! Recording payments against the store.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::UploadConfig;
use crate::error::OpsResult;
use crate::models::{Cleaner, SalaryLog};
use crate::receipt::{ReceiptArtifact, ReceiptFormat, ReceiptRenderer};
use crate::services::embed_image;
use crate::store::{EntityClient, Predicates, Row, RowStore, SortSpec, Stored};

use super::calculator::{
    PaymentMode, PayrollComputation, assemble_payment, compute_payroll, resolve_role,
    validate_draft,
};
use super::draft::{PaymentDraft, WorkLogDraftRow};

/// A saved payment and, when rendering succeeded, its receipt.
#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    /// The payment as stored.
    pub payment: Stored<SalaryLog>,
    /// The receipt, or `None` if rendering failed after the save.
    pub receipt: Option<ReceiptArtifact>,
}

/// Records, edits and lists payments.
///
/// Every draft is validated before the store is touched. Once a payment is
/// saved, a receipt failure is logged and never undoes the save.
#[derive(Clone)]
pub struct PayrollService {
    payments: EntityClient<SalaryLog>,
    staff: EntityClient<Cleaner>,
    receipts: ReceiptRenderer,
    default_daily_rate: Decimal,
    max_upload_bytes: usize,
}

impl PayrollService {
    /// Creates a service over the given store.
    pub fn new(store: Arc<dyn RowStore>, receipts: ReceiptRenderer, default_daily_rate: Decimal) -> Self {
        Self {
            payments: EntityClient::new(Arc::clone(&store)),
            staff: EntityClient::new(store),
            receipts,
            default_daily_rate,
            max_upload_bytes: UploadConfig::default().max_upload_bytes,
        }
    }

    /// Sets the largest accepted transaction slip.
    pub fn with_upload_limit(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    /// An empty work-log row with the default daily rate.
    pub fn blank_row(&self) -> WorkLogDraftRow {
        WorkLogDraftRow::blank(self.default_daily_rate)
    }

    /// Computes a draft's totals without validating or saving it.
    pub fn preview(&self, draft: &PaymentDraft) -> OpsResult<PayrollComputation> {
        compute_payroll(&draft.work_log, draft.deductions)
    }

    /// Renders a receipt for a draft without saving anything.
    ///
    /// The draft must pass the same checks as a real payment. The role is
    /// looked up on the roster as it would be at save time.
    pub async fn preview_receipt(
        &self,
        draft: &PaymentDraft,
        format: ReceiptFormat,
    ) -> OpsResult<ReceiptArtifact> {
        let computation = validate_draft(draft)?;
        let role = self.role_for(&draft.staff_name).await?;
        let payment = assemble_payment(draft, computation, role, PaymentMode::New);
        self.receipts.render(&payment, format)
    }

    /// Validates and saves a new payment, then renders its receipt.
    pub async fn record_payment(
        &self,
        draft: &PaymentDraft,
        format: ReceiptFormat,
    ) -> OpsResult<PaymentOutcome> {
        let computation = validate_draft(draft)?;
        let role = self.role_for(&draft.staff_name).await?;
        let payment = assemble_payment(draft, computation, role, PaymentMode::New);

        let stored = self.payments.create(&payment).await?;
        info!(
            id = %stored.id,
            payment_id = %stored.record.payment_id,
            staff_name = %stored.record.staff_name,
            net_pay = %stored.record.net_pay,
            "Payment recorded"
        );
        Ok(self.with_receipt(stored, format))
    }

    /// Validates and saves a corrected payment, keeping its payment id.
    ///
    /// Totals are recomputed from the draft's work log, and the role is
    /// taken afresh from the roster.
    pub async fn edit_payment(
        &self,
        id: &str,
        draft: &PaymentDraft,
        format: ReceiptFormat,
    ) -> OpsResult<PaymentOutcome> {
        let computation = validate_draft(draft)?;
        let existing = self.payments.get(id).await?;
        let role = self.role_for(&draft.staff_name).await?;
        let payment = assemble_payment(
            draft,
            computation,
            role,
            PaymentMode::Edit {
                payment_id: existing.record.payment_id,
            },
        );

        let stored = self.payments.update(id, &payment).await?;
        info!(
            id = %stored.id,
            payment_id = %stored.record.payment_id,
            net_pay = %stored.record.net_pay,
            "Payment updated"
        );
        Ok(self.with_receipt(stored, format))
    }

    /// Reopens a saved payment as an editable draft.
    pub async fn draft_for(&self, id: &str) -> OpsResult<PaymentDraft> {
        let stored = self.payments.get(id).await?;
        Ok(PaymentDraft::from_payment(
            &stored.record,
            today(),
            self.default_daily_rate,
        ))
    }

    /// Renders the receipt of a saved payment again.
    pub async fn receipt_for(&self, id: &str, format: ReceiptFormat) -> OpsResult<ReceiptArtifact> {
        let stored = self.payments.get(id).await?;
        self.receipts.render(&stored.record, format)
    }

    /// Lists payments newest first.
    pub async fn list_payments(&self, limit: Option<usize>) -> OpsResult<Vec<Stored<SalaryLog>>> {
        self.payments.list(Some(SortSpec::newest_first()), limit).await
    }

    /// Lists one staff member's payments, newest first.
    pub async fn payments_for(&self, staff_name: &str) -> OpsResult<Vec<Stored<SalaryLog>>> {
        let mut predicates = Predicates::new();
        predicates.insert("staff_name".to_string(), Value::String(staff_name.to_string()));
        self.payments
            .filter(predicates, Some(SortSpec::newest_first()), None)
            .await
    }

    /// Deletes a payment.
    pub async fn delete_payment(&self, id: &str) -> OpsResult<bool> {
        let deleted = self.payments.delete(id).await?;
        info!(id = %id, deleted, "Payment deleted");
        Ok(deleted)
    }

    /// Embeds an uploaded transaction slip on a saved payment.
    pub async fn attach_slip(&self, id: &str, mime: &str, bytes: &[u8]) -> OpsResult<Stored<SalaryLog>> {
        let url = embed_image("transaction_slip_url", mime, bytes, self.max_upload_bytes)?;
        let mut fields = Row::new();
        fields.insert("transaction_slip_url".to_string(), Value::String(url));
        let stored = self.payments.update_fields(id, fields).await?;
        info!(id = %stored.id, payment_id = %stored.record.payment_id, "Transaction slip attached");
        Ok(stored)
    }

    async fn role_for(&self, staff_name: &str) -> OpsResult<String> {
        let roster: Vec<Cleaner> = self
            .staff
            .list(None, None)
            .await?
            .into_iter()
            .map(|stored| stored.record)
            .collect();
        Ok(resolve_role(&roster, staff_name.trim()))
    }

    fn with_receipt(&self, payment: Stored<SalaryLog>, format: ReceiptFormat) -> PaymentOutcome {
        let receipt = match self.receipts.render(&payment.record, format) {
            Ok(receipt) => Some(receipt),
            Err(e) => {
                warn!(
                    id = %payment.id,
                    payment_id = %payment.record.payment_id,
                    error = %e,
                    "Payment saved but receipt could not be rendered"
                );
                None
            }
        };
        PaymentOutcome { payment, receipt }
    }
}

/// Today's date in local time, the default payment date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
