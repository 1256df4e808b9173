//! Page layout for paginated receipts.
//!
//! Lays a payment out as a list of pages of drawing operations in
//! millimetres, measured from the top-left corner. The PDF writer turns
//! these into content streams; tests inspect them directly.

use rust_decimal::Decimal;

use crate::config::{CompanyConfig, ReceiptLayout};
use crate::models::{SalaryLog, WorkLogEntry};

use super::format::{format_amount, format_days, format_money};
use super::{FOOTER_DISCLAIMER, RECEIPT_TITLE};

/// An RGB colour.
pub type Rgb = (u8, u8, u8);

/// Accent colour for the header band, net pay and bottom rule.
pub const PRIMARY: Rgb = (16, 185, 129);
/// Body text colour.
pub const SECONDARY: Rgb = (51, 65, 85);
/// Section header background.
pub const LIGHT_GRAY: Rgb = (241, 245, 249);
/// Table separator colour.
pub const RULE_GRAY: Rgb = (200, 200, 200);
/// Footer text colour.
pub const FOOTER_GRAY: Rgb = (150, 150, 150);
/// Header text on the accent band.
pub const WHITE: Rgb = (255, 255, 255);

/// Height of the generated header band.
const FALLBACK_HEADER_HEIGHT: f64 = 45.0;

/// Font face variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    /// Regular weight.
    Regular,
    /// Bold.
    Bold,
    /// Italic.
    Italic,
}

/// Horizontal anchoring of a text run relative to its x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Text starts at x.
    Left,
    /// Text is centred on x.
    Center,
    /// Text ends at x.
    Right,
}

/// One drawing operation. `y` of a text run is its baseline.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// A run of text.
    Text {
        x: f64,
        y: f64,
        text: String,
        style: FontStyle,
        size: f64,
        color: Rgb,
        align: Align,
    },
    /// A filled rectangle; `(x, y)` is its top-left corner.
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgb,
    },
    /// A straight line.
    Line {
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
        color: Rgb,
    },
    /// The letterhead image; `(x, y)` is its top-left corner.
    Letterhead {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

/// One page of drawing operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Operations in paint order.
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Returns every text run on the page, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// A laid-out receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptDocument {
    /// Page width.
    pub page_width: f64,
    /// Page height.
    pub page_height: f64,
    /// Pages in order; never empty.
    pub pages: Vec<Page>,
}

/// Drawing state, mirroring a pen that keeps its font and colours.
struct Canvas {
    pages: Vec<Page>,
    style: FontStyle,
    size: f64,
    color: Rgb,
}

impl Canvas {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            style: FontStyle::Regular,
            size: 10.0,
            color: SECONDARY,
        }
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn font(&mut self, style: FontStyle, size: f64) {
        self.style = style;
        self.size = size;
    }

    fn text(&mut self, x: f64, y: f64, text: impl Into<String>, align: Align) {
        let op = DrawOp::Text {
            x,
            y,
            text: text.into(),
            style: self.style,
            size: self.size,
            color: self.color,
            align,
        };
        self.push(op);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb) {
        self.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Rgb) {
        self.push(DrawOp::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn add_page(&mut self) {
        self.pages.push(Page::default());
    }
}

/// Lays out one payment's receipt.
///
/// # Arguments
///
/// * `payment` - The finalized payment
/// * `entries` - Its decoded work log
/// * `company` - Header text and currency label
/// * `layout` - Page geometry
/// * `letterhead_aspect` - Width/height of the letterhead image, or `None`
///   to draw the generated header
/// * `generated_at` - Timestamp text printed in the footer
///
/// Work-log rows are placed one per `row_height`. Before each row, and
/// before the payment summary, a new page is started if the cursor has
/// passed `page_break_threshold`; the cursor then resumes at `top_margin`.
/// The footer is drawn on the last page.
pub fn layout_receipt(
    payment: &SalaryLog,
    entries: &[WorkLogEntry],
    company: &CompanyConfig,
    layout: &ReceiptLayout,
    letterhead_aspect: Option<f64>,
    generated_at: &str,
) -> ReceiptDocument {
    let page_width = layout.page_width;
    let margin = layout.margin;
    let content_width = page_width - margin * 2.0;
    let currency = company.currency.as_str();
    let mut canvas = Canvas::new();

    // Header
    let mut y = match letterhead_aspect {
        Some(aspect) => {
            let height = layout.letterhead_height;
            let width = height * aspect;
            canvas.push(DrawOp::Letterhead {
                x: (page_width - width) / 2.0,
                y: 5.0,
                width,
                height,
            });
            height + 15.0
        }
        None => {
            canvas.fill_rect(0.0, 0.0, page_width, FALLBACK_HEADER_HEIGHT, PRIMARY);
            canvas.color = WHITE;
            canvas.font(FontStyle::Bold, 28.0);
            canvas.text(margin, 25.0, company.name.as_str(), Align::Left);
            canvas.font(FontStyle::Regular, 10.0);
            canvas.text(margin, 35.0, company.tagline.as_str(), Align::Left);
            FALLBACK_HEADER_HEIGHT + 10.0
        }
    };

    // Title
    canvas.color = SECONDARY;
    canvas.font(FontStyle::Bold, 16.0);
    canvas.text(page_width / 2.0, y, RECEIPT_TITLE, Align::Center);
    y += 5.0;
    canvas.font(FontStyle::Regular, 9.0);
    canvas.text(
        page_width / 2.0,
        y,
        format!("Receipt #: {}", payment.payment_id),
        Align::Center,
    );
    y += 15.0;

    // Period
    let date = payment.date.map(|d| d.to_string()).unwrap_or_default();
    labelled(&mut canvas, margin, margin + 30.0, y, "Date:", &date);
    labelled(&mut canvas, margin + 80.0, margin + 110.0, y, "Month:", payment.month_label());
    y += 15.0;

    // Staff
    section_header(&mut canvas, margin, y, content_width, "STAFF INFORMATION");
    y += 15.0;
    labelled(&mut canvas, margin + 5.0, margin + 40.0, y, "Name:", &payment.staff_name);
    y += 7.0;
    let role = payment.role.as_deref().unwrap_or_default();
    labelled(&mut canvas, margin + 5.0, margin + 40.0, y, "Role:", role);
    y += 15.0;

    // Work log
    section_header(&mut canvas, margin, y, content_width, "WORK LOG");
    y += 12.0;
    let total_x = page_width - margin - 30.0;
    canvas.font(FontStyle::Bold, 9.0);
    canvas.text(margin + 5.0, y, "#", Align::Left);
    canvas.text(margin + 15.0, y, "Branch", Align::Left);
    canvas.text(margin + 100.0, y, "Days", Align::Left);
    canvas.text(margin + 125.0, y, format!("Rate ({})", currency), Align::Left);
    canvas.text(total_x, y, format!("Total ({})", currency), Align::Left);
    canvas.line((margin, y + 2.0), (page_width - margin, y + 2.0), 0.2, RULE_GRAY);
    y += 8.0;

    canvas.font(FontStyle::Regular, 9.0);
    for (index, entry) in entries.iter().enumerate() {
        y = break_if_past_threshold(&mut canvas, layout, y);
        canvas.text(margin + 5.0, y, (index + 1).to_string(), Align::Left);
        canvas.text(margin + 15.0, y, entry.branch.as_str(), Align::Left);
        canvas.text(margin + 100.0, y, format_days(entry.days), Align::Left);
        canvas.text(margin + 125.0, y, format_amount(entry.rate), Align::Left);
        canvas.text(total_x, y, format_amount(entry.total), Align::Right);
        y += layout.row_height;
    }
    y += 5.0;

    // Summary
    y = break_if_past_threshold(&mut canvas, layout, y);
    section_header(&mut canvas, margin, y, content_width, "PAYMENT SUMMARY");
    y += 15.0;
    let summary_x = page_width - margin - 70.0;
    let right = page_width - margin;
    canvas.font(FontStyle::Regular, 10.0);
    summary_line(&mut canvas, summary_x, right, y, "Gross Total:", currency, payment.gross_total);
    y += 7.0;
    summary_line(&mut canvas, summary_x, right, y, "Deductions:", currency, payment.deductions);
    y += 2.0;
    canvas.line((summary_x, y), (right, y), 0.5, SECONDARY);
    y += 8.0;
    canvas.font(FontStyle::Bold, 12.0);
    canvas.color = PRIMARY;
    summary_line(&mut canvas, summary_x, right, y, "NET PAY:", currency, payment.net_pay);

    // Footer
    let footer_y = layout.page_height - 20.0;
    canvas.color = FOOTER_GRAY;
    canvas.font(FontStyle::Italic, 8.0);
    canvas.text(page_width / 2.0, footer_y, FOOTER_DISCLAIMER, Align::Center);
    canvas.text(
        page_width / 2.0,
        footer_y + 5.0,
        format!("Generated on: {}", generated_at),
        Align::Center,
    );
    let rule_y = layout.page_height - 10.0;
    canvas.line((0.0, rule_y), (page_width, rule_y), 2.0, PRIMARY);

    ReceiptDocument {
        page_width,
        page_height: layout.page_height,
        pages: canvas.pages,
    }
}

fn break_if_past_threshold(canvas: &mut Canvas, layout: &ReceiptLayout, y: f64) -> f64 {
    if y > layout.page_break_threshold {
        canvas.add_page();
        layout.top_margin
    } else {
        y
    }
}

fn labelled(canvas: &mut Canvas, label_x: f64, value_x: f64, y: f64, label: &str, value: &str) {
    canvas.font(FontStyle::Bold, 10.0);
    canvas.text(label_x, y, label, Align::Left);
    canvas.font(FontStyle::Regular, 10.0);
    canvas.text(value_x, y, value, Align::Left);
}

fn section_header(canvas: &mut Canvas, x: f64, y: f64, width: f64, title: &str) {
    canvas.fill_rect(x, y, width, 8.0, LIGHT_GRAY);
    canvas.font(FontStyle::Bold, 11.0);
    canvas.text(x + 2.0, y + 5.5, title, Align::Left);
}

fn summary_line(
    canvas: &mut Canvas,
    label_x: f64,
    amount_x: f64,
    y: f64,
    label: &str,
    currency: &str,
    amount: Decimal,
) {
    canvas.text(label_x, y, label, Align::Left);
    canvas.text(amount_x, y, format_money(currency, amount), Align::Right);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payroll::{PaymentDraft, PaymentMode, WorkLogDraftRow, finalize_payment};
    use chrono::{Month, NaiveDate};

    fn payment_with_rows(count: usize) -> (SalaryLog, Vec<WorkLogEntry>) {
        let draft = PaymentDraft {
            staff_name: "Nimal Perera".to_string(),
            month: Month::January,
            date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            deductions: Decimal::from(1000),
            work_log: (0..count)
                .map(|i| {
                    WorkLogDraftRow::new(format!("Branch {}", i), Decimal::ONE, Decimal::from(500))
                })
                .collect(),
            transaction_slip_url: None,
        };
        let payment = finalize_payment(
            &draft,
            "Cleaner",
            PaymentMode::Edit {
                payment_id: "PAY-1".to_string(),
            },
        )
        .unwrap();
        let entries = payment.work_log_entries().unwrap();
        (payment, entries)
    }

    fn layout_for(count: usize, letterhead: Option<f64>) -> ReceiptDocument {
        let (payment, entries) = payment_with_rows(count);
        layout_receipt(
            &payment,
            &entries,
            &CompanyConfig::default(),
            &ReceiptLayout::default(),
            letterhead,
            "2025-01-31 10:00:00",
        )
    }

    fn text_y(page: &Page, wanted: &str) -> Option<f64> {
        page.ops.iter().find_map(|op| match op {
            DrawOp::Text { text, y, .. } if text == wanted => Some(*y),
            _ => None,
        })
    }

    #[test]
    fn test_short_receipt_fits_one_page() {
        let doc = layout_for(2, None);
        assert_eq!(doc.pages.len(), 1);

        let texts: Vec<&str> = doc.pages[0].texts().collect();
        assert!(texts.contains(&"DCS"));
        assert!(texts.contains(&"Professional Cleaning Services"));
        assert!(texts.contains(&"PAYMENT RECEIPT"));
        assert!(texts.contains(&"Receipt #: PAY-1"));
        assert!(texts.contains(&"LKR 1,000"));
        assert!(texts.contains(&"LKR 0"));
        assert!(texts.contains(&FOOTER_DISCLAIMER));
        assert!(texts.contains(&"Generated on: 2025-01-31 10:00:00"));
    }

    #[test]
    fn test_fifteen_rows_fit_on_the_first_page() {
        let doc = layout_for(15, None);
        assert_eq!(text_y(&doc.pages[0], "Branch 14"), Some(245.0));

        // The cursor ends past the threshold, so the summary moves over.
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(text_y(&doc.pages[1], "PAYMENT SUMMARY"), Some(25.5));
    }

    #[test]
    fn test_fourteen_rows_keep_the_summary_on_one_page() {
        let doc = layout_for(14, None);
        assert_eq!(doc.pages.len(), 1);
    }

    #[test]
    fn test_sixteenth_row_starts_a_new_page_at_top_margin() {
        let doc = layout_for(16, None);
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(text_y(&doc.pages[0], "Branch 15"), None);
        assert_eq!(text_y(&doc.pages[1], "Branch 15"), Some(20.0));
        assert!(doc.pages[1].texts().any(|t| t == "NET PAY:"));
        assert!(doc.pages[1].texts().any(|t| t == FOOTER_DISCLAIMER));
    }

    #[test]
    fn test_letterhead_is_centered_and_pushes_content_down() {
        let doc = layout_for(1, Some(4.0));
        let image = doc.pages[0]
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Letterhead { x, y, width, height } => Some((*x, *y, *width, *height)),
                _ => None,
            })
            .unwrap();

        assert_eq!(image, (21.0, 5.0, 168.0, 42.0));
        assert_eq!(text_y(&doc.pages[0], "PAYMENT RECEIPT"), Some(57.0));
        assert!(!doc.pages[0].texts().any(|t| t == "DCS"));
    }

    #[test]
    fn test_net_pay_is_highlighted() {
        let doc = layout_for(1, None);
        let net = doc.pages[0].ops.iter().find_map(|op| match op {
            DrawOp::Text {
                text, style, color, ..
            } if text == "NET PAY:" => Some((*style, *color)),
            _ => None,
        });
        assert_eq!(net, Some((FontStyle::Bold, PRIMARY)));
    }
}
