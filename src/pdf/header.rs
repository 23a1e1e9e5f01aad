//! The six header layout variants.
//!
//! Each variant shares the same inputs and returns the vertical offset
//! where the next section starts. Unless a variant selects a family
//! explicitly, style changes keep whatever face is already active.

use crate::store::HeaderStyle;

use super::compose::Composer;
use super::model::{FontFamily, FontStyle, Rgb, PAGE_WIDTH};

pub struct HeaderInputs<'a> {
    pub company_name: &'a str,
    pub company_address: &'a str,
    pub company_city: &'a str,
    pub company_country: &'a str,
    pub report_title: &'a str,
    pub report_number: &'a str,
    pub margin: f32,
    pub y: f32,
    pub family: FontFamily,
    pub base_font_pt: f32,
    pub modern_background: Rgb,
    pub primary_text: Rgb,
    pub logo_data: Option<&'a str>,
}

pub fn render_header(style: HeaderStyle, c: &mut Composer, input: &HeaderInputs) -> f32 {
    match style {
        HeaderStyle::Compact => compact(c, input),
        HeaderStyle::Detailed => detailed(c, input),
        HeaderStyle::Modern => modern(c, input),
        HeaderStyle::Classic => classic(c, input),
        HeaderStyle::Minimal => minimal(c, input),
        HeaderStyle::Standard => standard(c, input),
    }
}

fn right_aligned(c: &Composer, text: &str, margin: f32) -> f32 {
    PAGE_WIDTH - margin - c.text_width(text)
}

fn compact(c: &mut Composer, input: &HeaderInputs) -> f32 {
    let margin = input.margin;
    let mut y = input.y;

    c.set_font_size(10.0);
    c.set_font(None, FontStyle::Normal);
    c.text(input.company_name, margin, y);
    y += 4.0;
    c.text(input.company_address, margin, y);
    y += 4.0;
    c.text(
        &format!("{}, {}", input.company_city, input.company_country),
        margin,
        y,
    );
    y += 8.0;

    c.set_font_size(16.0);
    c.set_font(None, FontStyle::Bold);
    let x = right_aligned(c, input.report_title, margin);
    c.text(input.report_title, x, y - 12.0);

    c.set_font_size(10.0);
    c.set_font(None, FontStyle::Normal);
    let x = right_aligned(c, input.report_number, margin);
    c.text(input.report_number, x, y - 8.0);

    y + 5.0
}

fn detailed(c: &mut Composer, input: &HeaderInputs) -> f32 {
    let margin = input.margin;
    let mut y = input.y;

    c.set_font_size(14.0);
    c.set_font(None, FontStyle::Bold);
    c.text(input.company_name, margin, y);
    y += 6.0;

    c.set_font_size(12.0);
    c.set_font(None, FontStyle::Normal);
    c.text(input.company_address, margin, y);
    y += 5.0;
    c.text(input.company_city, margin, y);
    y += 5.0;
    c.text(input.company_country, margin, y);
    y += 12.0;

    c.set_font_size(24.0);
    c.set_font(None, FontStyle::Bold);
    let x = right_aligned(c, input.report_title, margin);
    c.text(input.report_title, x, y - 12.0);

    c.set_font_size(14.0);
    c.set_font(None, FontStyle::Normal);
    let x = right_aligned(c, input.report_number, margin);
    c.text(input.report_number, x, y - 6.0);

    y + 8.0
}

fn modern(c: &mut Composer, input: &HeaderInputs) -> f32 {
    let margin = input.margin;
    let mut y = input.y;
    let has_logo = input
        .logo_data
        .is_some_and(|d| d.starts_with("data:image/"));

    // The colored block covers the logo and text together.
    let block_height = if has_logo { 25.0 + 18.0 } else { 25.0 };
    c.fill_rect(
        margin - 5.0,
        y - 5.0,
        180.0,
        block_height,
        input.modern_background,
    );

    if has_logo {
        let used = c.add_logo(input.logo_data, margin, y + 5.0, 25.0, 12.0);
        if used > 0.0 {
            y += used + 3.0;
        }
    }

    c.set_text_color(Rgb::new(255, 255, 255));
    c.set_font_size(input.base_font_pt + 1.0);
    c.set_font(Some(input.family), FontStyle::Bold);
    c.text(input.company_name, margin, y);
    y += 6.0;

    c.set_font_size(input.base_font_pt - 1.0);
    c.set_font(Some(input.family), FontStyle::Normal);
    c.text(input.company_address, margin, y);
    y += 5.0;
    c.text(
        &format!("{}, {}", input.company_city, input.company_country),
        margin,
        y,
    );

    c.set_font_size(18.0);
    c.set_font(Some(input.family), FontStyle::Bold);
    let x = right_aligned(c, input.report_title, margin);
    c.text(input.report_title, x, y - 8.0);

    c.set_font_size(10.0);
    c.set_font(Some(input.family), FontStyle::Normal);
    let x = right_aligned(c, input.report_number, margin);
    c.text(input.report_number, x, y - 3.0);

    c.set_text_color(input.primary_text);
    y + 15.0
}

fn classic(c: &mut Composer, input: &HeaderInputs) -> f32 {
    let margin = input.margin;
    let mut y = input.y;

    c.set_line_width(1.0);
    c.stroke_rect(margin - 5.0, y - 5.0, 180.0, 25.0);

    c.set_font_size(12.0);
    c.set_font(Some(FontFamily::Times), FontStyle::Bold);
    c.text(input.company_name, margin, y + 2.0);
    y += 6.0;

    c.set_font(Some(FontFamily::Times), FontStyle::Normal);
    c.text(input.company_address, margin, y);
    y += 5.0;
    c.text(input.company_city, margin, y);
    y += 5.0;
    c.text(input.company_country, margin, y);

    c.set_font_size(20.0);
    c.set_font(Some(FontFamily::Times), FontStyle::Bold);
    let title_x = right_aligned(c, input.report_title, margin);
    let title_width = c.text_width(input.report_title);
    c.text(input.report_title, title_x, y - 10.0);
    c.line(title_x, y - 8.0, title_x + title_width, y - 8.0);

    c.set_font_size(12.0);
    c.set_font(Some(FontFamily::Times), FontStyle::Normal);
    let x = right_aligned(c, input.report_number, margin);
    c.text(input.report_number, x, y - 4.0);

    y + 10.0
}

fn minimal(c: &mut Composer, input: &HeaderInputs) -> f32 {
    let y = input.y;

    c.set_font_size(22.0);
    c.set_font(None, FontStyle::Bold);
    let x = (PAGE_WIDTH - c.text_width(input.report_title)) / 2.0;
    c.text(input.report_title, x, y + 5.0);

    c.set_font_size(12.0);
    c.set_font(None, FontStyle::Normal);
    let x = (PAGE_WIDTH - c.text_width(input.report_number)) / 2.0;
    c.text(input.report_number, x, y + 12.0);

    y + 20.0
}

fn standard(c: &mut Composer, input: &HeaderInputs) -> f32 {
    let margin = input.margin;
    let mut y = input.y;

    let used = c.add_logo(input.logo_data, margin, y + 15.0, 30.0, 15.0);
    if used > 0.0 {
        y += used + 5.0;
    }

    c.set_font_size(input.base_font_pt + 2.0);
    c.set_font(Some(input.family), FontStyle::Bold);
    c.text(input.company_name, margin, y);
    y += 7.0;

    c.set_font_size(input.base_font_pt);
    c.set_font(Some(input.family), FontStyle::Normal);
    c.text(input.company_address, margin, y);
    y += 6.0;
    c.text(input.company_city, margin, y);
    y += 6.0;
    c.text(input.company_country, margin, y);
    y += 12.0;

    c.set_font_size(20.0);
    c.set_font(Some(input.family), FontStyle::Bold);
    let x = right_aligned(c, input.report_title, margin);
    c.text(input.report_title, x, y - 15.0);

    c.set_font_size(12.0);
    c.set_font(Some(input.family), FontStyle::Normal);
    let x = right_aligned(c, input.report_number, margin);
    c.text(input.report_number, x, y - 7.0);

    y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fonts;
    use crate::pdf::model::Op;
    use std::path::Path;

    fn inputs<'a>(logo: Option<&'a str>) -> HeaderInputs<'a> {
        HeaderInputs {
            company_name: "Acme Corp",
            company_address: "1 Main St",
            company_city: "Springfield, IL 62701",
            company_country: "USA",
            report_title: "Expense Report",
            report_number: "ER-10001",
            margin: 20.0,
            y: 20.0,
            family: FontFamily::Helvetica,
            base_font_pt: 10.5,
            modern_background: Rgb::from_hex("#667eea"),
            primary_text: Rgb::from_hex("#333333"),
            logo_data: logo,
        }
    }

    fn render(style: HeaderStyle, logo: Option<&str>) -> (f32, Vec<Op>) {
        let catalog = fonts::catalog(Path::new("/nonexistent"));
        let mut c = Composer::new(catalog);
        let y = render_header(style, &mut c, &inputs(logo));
        let doc = c.finish();
        (y, doc.pages.into_iter().next().unwrap().ops)
    }

    #[test]
    fn every_variant_places_title_and_number() {
        for style in [
            HeaderStyle::Standard,
            HeaderStyle::Compact,
            HeaderStyle::Detailed,
            HeaderStyle::Modern,
            HeaderStyle::Classic,
            HeaderStyle::Minimal,
        ] {
            let (end_y, ops) = render(style, None);
            assert!(end_y > 20.0, "{style:?} must advance the cursor");
            let texts: Vec<&str> = ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect();
            assert!(texts.contains(&"Expense Report"), "{style:?} missing title");
            assert!(texts.contains(&"ER-10001"), "{style:?} missing number");
        }
    }

    #[test]
    fn minimal_omits_company_info() {
        let (_, ops) = render(HeaderStyle::Minimal, None);
        let has_company = ops.iter().any(|op| {
            matches!(op, Op::Text { text, .. } if text == "Acme Corp")
        });
        assert!(!has_company);
    }

    #[test]
    fn classic_draws_box_underline_and_times() {
        let (_, ops) = render(HeaderStyle::Classic, None);
        assert!(ops.iter().any(|op| matches!(op, Op::StrokeRect { .. })));
        assert!(ops.iter().any(|op| matches!(op, Op::Line { .. })));
        assert!(ops.iter().all(|op| match op {
            Op::Text { family, .. } => *family == FontFamily::Times,
            _ => true,
        }));
    }

    #[test]
    fn modern_block_grows_for_logo() {
        let uri = format!("data:image/png;base64,{}", {
            use base64::engine::general_purpose::STANDARD;
            use base64::Engine;
            STANDARD.encode(b"\x89PNG\r\n\x1a\nstub")
        });
        let (_, without) = render(HeaderStyle::Modern, None);
        let (_, with) = render(HeaderStyle::Modern, Some(&uri));

        let block_height = |ops: &[Op]| {
            ops.iter()
                .find_map(|op| match op {
                    Op::FillRect { height, width, .. } if *width == 180.0 => Some(*height),
                    _ => None,
                })
                .unwrap()
        };
        assert_eq!(block_height(&without), 25.0);
        assert_eq!(block_height(&with), 43.0);
        assert!(with.iter().any(|op| matches!(op, Op::Image { .. })));
    }

    #[test]
    fn malformed_logo_uri_is_skipped_silently() {
        let (_, ops) = render(HeaderStyle::Standard, Some("not-a-data-uri"));
        assert!(!ops.iter().any(|op| matches!(op, Op::Image { .. })));
    }
}
