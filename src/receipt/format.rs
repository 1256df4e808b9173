//! Number and name formatting shared by every receipt format.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::SalaryLog;

/// Formats an amount with thousands separators and at most two decimals.
///
/// Halves round away from zero and trailing zero decimals are dropped.
///
/// ```
/// use cleaning_ops::receipt::format_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_amount(Decimal::from(1234567)), "1,234,567");
/// assert_eq!(format_amount(Decimal::new(-250050, 2)), "-2,500.5");
/// assert_eq!(format_amount(Decimal::ZERO), "0");
/// ```
pub fn format_amount(amount: Decimal) -> String {
    let text = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
        None => format!("{}{}", sign, grouped),
    }
}

/// Formats an amount prefixed with a currency label, e.g. `LKR 4,000`.
pub fn format_money(currency: &str, amount: Decimal) -> String {
    format!("{} {}", currency, format_amount(amount))
}

/// Formats a day count without trailing zeros.
pub fn format_days(days: Decimal) -> String {
    days.normalize().to_string()
}

/// Builds the download name for a payment's receipt.
///
/// Runs of whitespace in the staff name become a single underscore.
///
/// ```
/// use cleaning_ops::receipt::receipt_file_name;
/// use cleaning_ops::models::SalaryLog;
///
/// let payment: SalaryLog = serde_json::from_str(
///     r#"{"staff_name": "Nimal  Perera", "month": "January", "date": "2025-01-31"}"#,
/// )
/// .unwrap();
/// assert_eq!(
///     receipt_file_name(&payment, "pdf"),
///     "Receipt_Nimal_Perera_January_2025-01-31.pdf"
/// );
/// ```
pub fn receipt_file_name(payment: &SalaryLog, extension: &str) -> String {
    let staff = payment
        .staff_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    let date = payment.date.map(|d| d.to_string()).unwrap_or_default();
    format!(
        "Receipt_{}_{}_{}.{}",
        staff,
        payment.month_label(),
        date,
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_small_amounts_are_not_grouped() {
        assert_eq!(format_amount(Decimal::from(999)), "999");
        assert_eq!(format_amount(Decimal::from(1000)), "1,000");
        assert_eq!(format_amount(Decimal::from(-1000)), "-1,000");
    }

    #[test]
    fn test_amounts_round_to_two_places() {
        assert_eq!(format_amount(Decimal::from_str("1876.505").unwrap()), "1,876.51");
        assert_eq!(format_amount(Decimal::from_str("0.125").unwrap()), "0.13");
        assert_eq!(format_amount(Decimal::from_str("5000.00").unwrap()), "5,000");
    }

    #[test]
    fn test_money_and_days() {
        assert_eq!(format_money("LKR", Decimal::from(4000)), "LKR 4,000");
        assert_eq!(format_days(Decimal::from_str("2.50").unwrap()), "2.5");
    }

    #[test]
    fn test_file_name_without_date_or_month() {
        let payment: SalaryLog = serde_json::from_str(r#"{"staff_name": "Kamala"}"#).unwrap();
        assert_eq!(receipt_file_name(&payment, "txt"), "Receipt_Kamala_Unknown_.txt");
    }
}
