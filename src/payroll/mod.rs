//! Payroll computation.
//!
//! Turns an operator's draft (staff member, pay period, work-log rows and
//! deductions) into a finalized [`SalaryLog`](crate::models::SalaryLog),
//! and records it through the store.

mod calculator;
mod draft;
mod service;

pub use calculator::{
    PaymentMode, PayrollComputation, UNKNOWN_ROLE, assemble_payment, compute_payroll,
    finalize_payment, generate_payment_id, is_billable, resolve_role, row_total, validate_draft,
};
pub use draft::{PaymentDraft, WorkLogDraftRow, coerce_amount, month_of};
pub use service::{PaymentOutcome, PayrollService, today};
