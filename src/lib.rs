//! Cleaning Operations Engine
//!
//! This crate provides the business core of a cleaning-service operation:
//! payroll computation from per-branch work logs, payment receipts in text
//! and PDF form, financial roll-ups over payment history, derived
//! notifications, and a JSON API over a generic row store.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod financials;
pub mod models;
pub mod notifications;
pub mod payroll;
pub mod receipt;
pub mod services;
pub mod store;
