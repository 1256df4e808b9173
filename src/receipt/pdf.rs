//! PDF output for laid-out receipts.
//!
//! Pages are written with `pdf-writer` using the standard Helvetica faces,
//! so no fonts are embedded. The letterhead JPEG, when present, is embedded
//! unchanged with the DCT filter.

use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str};

use super::layout::{Align, DrawOp, FontStyle, ReceiptDocument, Rgb};
use super::letterhead::{Letterhead, LetterheadColor};

/// Points per millimetre.
const MM_TO_PT: f32 = 72.0 / 25.4;

const CATALOG_ID: Ref = Ref::new(1);
const PAGE_TREE_ID: Ref = Ref::new(2);
const REGULAR_FONT_ID: Ref = Ref::new(3);
const BOLD_FONT_ID: Ref = Ref::new(4);
const ITALIC_FONT_ID: Ref = Ref::new(5);
const IMAGE_ID: Ref = Ref::new(6);
const FIRST_PAGE_ID: i32 = 7;

const LETTERHEAD_NAME: Name<'static> = Name(b"Im1");

/// Helvetica advance widths for ASCII 32..=126, in thousandths of an em.
/// Helvetica-Oblique shares them.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Helvetica-Bold advance widths for ASCII 32..=126.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    333, 333, 584, 584, 584, 611, 975, // ':'..'@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    333, 278, 333, 584, 556, 333, // '['..'`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a'..'m'
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n'..'z'
    389, 280, 389, 584, // '{'..'~'
];

/// Rendered width of `text` in points.
pub(crate) fn text_width(text: &str, style: FontStyle, size: f32) -> f32 {
    let widths = match style {
        FontStyle::Bold => &HELVETICA_BOLD_WIDTHS,
        FontStyle::Regular | FontStyle::Italic => &HELVETICA_WIDTHS,
    };
    let units: u32 = text
        .chars()
        .map(|c| match c as u32 {
            code @ 32..=126 => u32::from(widths[(code - 32) as usize]),
            _ => 556,
        })
        .sum();
    units as f32 / 1000.0 * size
}

/// Left edge of a run of `width` points anchored at `anchor`.
fn aligned_left(anchor: f32, width: f32, align: Align) -> f32 {
    match align {
        Align::Left => anchor,
        Align::Center => anchor - width / 2.0,
        Align::Right => anchor - width,
    }
}

/// Encodes text in WinAnsi, replacing anything outside it with `?`.
pub(crate) fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{20AC}' => 0x80,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{A0}'..='\u{FF}' => c as u8,
            _ => b'?',
        })
        .collect()
}

fn font_name(style: FontStyle) -> Name<'static> {
    match style {
        FontStyle::Regular => Name(b"F1"),
        FontStyle::Bold => Name(b"F2"),
        FontStyle::Italic => Name(b"F3"),
    }
}

fn unit_rgb((r, g, b): Rgb) -> (f32, f32, f32) {
    (
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
    )
}

/// Builds the content stream of one page.
///
/// Layout coordinates are millimetres from the top-left corner; PDF space
/// is points from the bottom-left.
fn page_content(ops: &[DrawOp], page_height: f64) -> Vec<u8> {
    let x_pt = |x: f64| x as f32 * MM_TO_PT;
    let y_pt = |y: f64| (page_height - y) as f32 * MM_TO_PT;
    let mut content = Content::new();

    for op in ops {
        match op {
            DrawOp::Text {
                x,
                y,
                text,
                style,
                size,
                color,
                align,
            } => {
                let size = *size as f32;
                let width = text_width(text, *style, size);
                let (r, g, b) = unit_rgb(*color);
                let encoded = win_ansi(text);
                content.begin_text();
                content.set_font(font_name(*style), size);
                content.set_fill_rgb(r, g, b);
                content.next_line(aligned_left(x_pt(*x), width, *align), y_pt(*y));
                content.show(Str(&encoded));
                content.end_text();
            }
            DrawOp::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => {
                let (r, g, b) = unit_rgb(*color);
                content.set_fill_rgb(r, g, b);
                content.rect(
                    x_pt(*x),
                    y_pt(y + height),
                    *width as f32 * MM_TO_PT,
                    *height as f32 * MM_TO_PT,
                );
                content.fill_nonzero();
            }
            DrawOp::Line {
                from,
                to,
                width,
                color,
            } => {
                let (r, g, b) = unit_rgb(*color);
                content.set_stroke_rgb(r, g, b);
                content.set_line_width(*width as f32 * MM_TO_PT);
                content.move_to(x_pt(from.0), y_pt(from.1));
                content.line_to(x_pt(to.0), y_pt(to.1));
                content.stroke();
            }
            DrawOp::Letterhead {
                x,
                y,
                width,
                height,
            } => {
                content.save_state();
                content.transform([
                    *width as f32 * MM_TO_PT,
                    0.0,
                    0.0,
                    *height as f32 * MM_TO_PT,
                    x_pt(*x),
                    y_pt(y + height),
                ]);
                content.x_object(LETTERHEAD_NAME);
                content.restore_state();
            }
        }
    }
    content.finish().to_vec()
}

fn write_letterhead(pdf: &mut Pdf, letterhead: &Letterhead) {
    let mut image = pdf.image_xobject(IMAGE_ID, &letterhead.jpeg);
    image.filter(Filter::DctDecode);
    image.width(letterhead.width as i32);
    image.height(letterhead.height as i32);
    match letterhead.color {
        LetterheadColor::Gray => image.color_space().device_gray(),
        LetterheadColor::Rgb => image.color_space().device_rgb(),
        LetterheadColor::Cmyk => image.color_space().device_cmyk(),
    };
    image.bits_per_component(8);
    image.finish();
}

/// Serializes a laid-out receipt to PDF bytes.
///
/// `letterhead` must be given when the document contains a
/// [`DrawOp::Letterhead`]; otherwise the image reference is left out.
pub fn write_pdf(doc: &ReceiptDocument, letterhead: Option<&Letterhead>) -> Vec<u8> {
    let page_ids: Vec<(Ref, Ref)> = (0..doc.pages.len() as i32)
        .map(|i| {
            let page_id = FIRST_PAGE_ID + i * 2;
            (Ref::new(page_id), Ref::new(page_id + 1))
        })
        .collect();

    let mut pdf = Pdf::new();
    pdf.set_version(1, 4);
    pdf.catalog(CATALOG_ID).pages(PAGE_TREE_ID);
    pdf.pages(PAGE_TREE_ID)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(page_ids.len() as i32);

    for (id, base_font) in [
        (REGULAR_FONT_ID, Name(b"Helvetica")),
        (BOLD_FONT_ID, Name(b"Helvetica-Bold")),
        (ITALIC_FONT_ID, Name(b"Helvetica-Oblique")),
    ] {
        pdf.type1_font(id)
            .base_font(base_font)
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    if let Some(image) = letterhead {
        write_letterhead(&mut pdf, image);
    }

    let media_box = Rect::new(
        0.0,
        0.0,
        doc.page_width as f32 * MM_TO_PT,
        doc.page_height as f32 * MM_TO_PT,
    );

    for (page, (page_id, content_id)) in doc.pages.iter().zip(&page_ids) {
        {
            let mut writer = pdf.page(*page_id);
            writer.parent(PAGE_TREE_ID);
            writer.media_box(media_box);
            writer.contents(*content_id);
            let mut resources = writer.resources();
            resources
                .fonts()
                .pair(font_name(FontStyle::Regular), REGULAR_FONT_ID)
                .pair(font_name(FontStyle::Bold), BOLD_FONT_ID)
                .pair(font_name(FontStyle::Italic), ITALIC_FONT_ID);
            if letterhead.is_some() {
                resources.x_objects().pair(LETTERHEAD_NAME, IMAGE_ID);
            }
        }
        pdf.stream(*content_id, &page_content(&page.ops, doc.page_height));
    }

    pdf.finish()
}
