//! Plain-text receipts.

use std::fmt::{self, Write as _};

use crate::config::CompanyConfig;
use crate::models::{SalaryLog, WorkLogEntry};

use super::format::{format_amount, format_days, format_money};
use super::{FOOTER_DISCLAIMER, RECEIPT_TITLE};

const WIDTH: usize = 72;

/// Renders a receipt as fixed-width text.
pub fn render_text(
    payment: &SalaryLog,
    entries: &[WorkLogEntry],
    company: &CompanyConfig,
    generated_at: &str,
) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_receipt(&mut out, payment, entries, company, generated_at);
    out
}

fn write_receipt(
    out: &mut String,
    payment: &SalaryLog,
    entries: &[WorkLogEntry],
    company: &CompanyConfig,
    generated_at: &str,
) -> fmt::Result {
    let rule = "=".repeat(WIDTH);
    let thin_rule = "-".repeat(WIDTH);
    let currency = company.currency.as_str();
    let date = payment.date.map(|d| d.to_string()).unwrap_or_default();

    writeln!(out, "{}", company.name)?;
    writeln!(out, "{}", company.tagline)?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "{:^width$}", RECEIPT_TITLE, width = WIDTH)?;
    writeln!(
        out,
        "{:^width$}",
        format!("Receipt #: {}", payment.payment_id),
        width = WIDTH
    )?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "Date:  {:<24}Month: {}", date, payment.month_label())?;
    writeln!(out)?;

    writeln!(out, "STAFF INFORMATION")?;
    writeln!(out, "  Name: {}", payment.staff_name)?;
    writeln!(out, "  Role: {}", payment.role.as_deref().unwrap_or_default())?;
    writeln!(out)?;

    writeln!(out, "WORK LOG")?;
    writeln!(
        out,
        "  {:>3}  {:<30} {:>6} {:>12} {:>14}",
        "#",
        "Branch",
        "Days",
        format!("Rate ({})", currency),
        format!("Total ({})", currency)
    )?;
    writeln!(out, "  {}", "-".repeat(WIDTH - 2))?;
    for (index, entry) in entries.iter().enumerate() {
        writeln!(
            out,
            "  {:>3}  {:<30} {:>6} {:>12} {:>14}",
            index + 1,
            entry.branch,
            format_days(entry.days),
            format_amount(entry.rate),
            format_amount(entry.total)
        )?;
    }
    writeln!(out)?;

    writeln!(out, "PAYMENT SUMMARY")?;
    writeln!(out, "  {:<14}{:>20}", "Gross Total:", format_money(currency, payment.gross_total))?;
    writeln!(out, "  {:<14}{:>20}", "Deductions:", format_money(currency, payment.deductions))?;
    writeln!(out, "  {}", "-".repeat(34))?;
    writeln!(out, "  {:<14}{:>20}", "NET PAY:", format_money(currency, payment.net_pay))?;
    writeln!(out)?;

    writeln!(out, "{}", thin_rule)?;
    writeln!(out, "{}", FOOTER_DISCLAIMER)?;
    writeln!(out, "Generated on: {}", generated_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaymentStatus, WorkLogBlob};
    use chrono::{Month, NaiveDate};
    use rust_decimal::Decimal;

    fn payment() -> (SalaryLog, Vec<WorkLogEntry>) {
        let entries = vec![
            WorkLogEntry::new("Colombo 03", Decimal::from(10), Decimal::from(500)),
            WorkLogEntry::new("Kandy", Decimal::new(25, 1), Decimal::from(1200)),
        ];
        let payment = SalaryLog {
            payment_id: "PAY-1735689600000-abcd1234".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 31),
            month: Some(Month::January),
            staff_name: "Nimal Perera".to_string(),
            role: Some("Cleaner".to_string()),
            gross_total: Decimal::from(8000),
            deductions: Decimal::from(1000),
            net_pay: Decimal::from(7000),
            work_log: WorkLogBlob::from_entries(&entries),
            transaction_slip_url: None,
            status: PaymentStatus::Paid,
        };
        (payment, entries)
    }

    #[test]
    fn test_text_receipt_sections() {
        let (payment, entries) = payment();
        let text = render_text(&payment, &entries, &CompanyConfig::default(), "2025-01-31 09:15:00");

        assert!(text.starts_with("DCS\nProfessional Cleaning Services\n"));
        assert!(text.contains("PAYMENT RECEIPT"));
        assert!(text.contains("Receipt #: PAY-1735689600000-abcd1234"));
        assert!(text.contains("Month: January"));
        assert!(text.contains("  Name: Nimal Perera"));
        assert!(text.contains("  Role: Cleaner"));
        assert!(text.contains("Colombo 03"));
        assert!(text.contains("2.5"));
        assert!(text.contains("3,000"));
        assert!(text.contains("LKR 8,000"));
        assert!(text.contains("LKR 7,000"));
        assert!(text.contains(FOOTER_DISCLAIMER));
        assert!(text.ends_with("Generated on: 2025-01-31 09:15:00\n"));
    }

    #[test]
    fn test_rows_are_numbered_in_order() {
        let (payment, entries) = payment();
        let text = render_text(&payment, &entries, &CompanyConfig::default(), "now");

        let first = text.find("    1  Colombo 03").unwrap();
        let second = text.find("    2  Kandy").unwrap();
        assert!(first < second);
    }
}
