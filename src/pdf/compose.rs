//! Layout pass: turns a [`ReportSnapshot`] into a [`DocModel`].
//!
//! Geometry follows the on-screen report: A4 portrait, 20 mm margin,
//! header variant first, then the details block, the expense table with
//! page breaks, the total block, and the footer.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::warn;

use crate::store::format_date;

use super::fonts::FontCatalog;
use super::header::{render_header, HeaderInputs};
use super::model::{DocModel, FontFamily, FontStyle, Op, Rgb, PAGE_HEIGHT, PAGE_WIDTH};
use super::snapshot::ReportSnapshot;

pub const MARGIN: f32 = 20.0;
const TABLE_WIDTH: f32 = 170.0;
const BOTTOM_MARGIN: f32 = 30.0;

/// Stateful drawing surface. Mirrors the cursor-less parts of the
/// output device: current font, sizes, and colors persist across calls
/// the same way they persist across draw operations there.
pub struct Composer<'a> {
    doc: DocModel,
    catalog: &'a FontCatalog,
    family: FontFamily,
    style: FontStyle,
    size_pt: f32,
    text_color: Rgb,
    draw_color: Rgb,
    line_width: f32,
}

impl<'a> Composer<'a> {
    pub fn new(catalog: &'a FontCatalog) -> Self {
        Self {
            doc: DocModel::new(),
            catalog,
            family: FontFamily::Helvetica,
            style: FontStyle::Normal,
            size_pt: 16.0,
            text_color: Rgb::new(0, 0, 0),
            draw_color: Rgb::new(0, 0, 0),
            line_width: 0.2,
        }
    }

    /// Change face and style. `None` keeps the current family, so a
    /// style-only change survives whatever family the header selected.
    pub fn set_font(&mut self, family: Option<FontFamily>, style: FontStyle) {
        if let Some(family) = family {
            self.family = family;
        }
        self.style = style;
    }

    pub fn set_font_size(&mut self, size_pt: f32) {
        self.size_pt = size_pt;
    }

    pub fn set_text_color(&mut self, color: Rgb) {
        self.text_color = color;
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    pub fn set_draw_color(&mut self, color: Rgb) {
        self.draw_color = color;
    }

    pub fn text(&mut self, text: &str, x: f32, y: f32) {
        let op = Op::Text {
            text: text.to_string(),
            x,
            y,
            size_pt: self.size_pt,
            family: self.family,
            style: self.style,
            color: self.text_color,
        };
        self.doc.current_page().ops.push(op);
    }

    /// Width of `text` in mm under the current font state.
    pub fn text_width(&self, text: &str) -> f32 {
        self.catalog
            .text_width_mm(text, self.size_pt, self.family, self.style)
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.doc.current_page().ops.push(Op::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let op = Op::StrokeRect {
            x,
            y,
            width,
            height,
            color: self.draw_color,
            line_width: self.line_width,
        };
        self.doc.current_page().ops.push(op);
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let op = Op::Line {
            x1,
            y1,
            x2,
            y2,
            color: self.draw_color,
            line_width: self.line_width,
        };
        self.doc.current_page().ops.push(op);
    }

    /// Decode a `data:image/...` URI and place it in a bounding box
    /// whose bottom edge sits at `y`. Returns the vertical space used
    /// plus a small gap, or zero when there is nothing usable to place.
    pub fn add_logo(
        &mut self,
        logo_data: Option<&str>,
        x: f32,
        y: f32,
        max_width: f32,
        max_height: f32,
    ) -> f32 {
        let Some(uri) = logo_data else { return 0.0 };
        if !uri.starts_with("data:image/") {
            return 0.0;
        }
        let Some((_, payload)) = uri.split_once("base64,") else {
            warn!("logo data URI has no base64 payload, skipping logo");
            return 0.0;
        };
        match STANDARD.decode(payload) {
            Ok(data) => {
                self.doc.current_page().ops.push(Op::Image {
                    data,
                    x,
                    y: y - max_height,
                    max_width,
                    max_height,
                });
                max_height + 3.0
            }
            Err(e) => {
                warn!("could not decode logo data, skipping logo: {e}");
                0.0
            }
        }
    }

    pub fn add_page(&mut self) {
        self.doc.add_page();
    }

    /// Greedy word wrap under the current font state.
    pub fn wrap_text(&self, text: &str, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();
        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if !current.is_empty() && self.text_width(&candidate) > max_width {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            } else {
                current = candidate;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    pub fn finish(self) -> DocModel {
        self.doc
    }
}

/// Lay out the whole report.
pub fn compose(snapshot: &ReportSnapshot, catalog: &FontCatalog) -> DocModel {
    let mut c = Composer::new(catalog);
    let styles = &snapshot.styles;
    let labels = &snapshot.settings.labels;
    let family = styles.family;
    let base_font_pt = styles.base_font_size_px * 0.75;

    let mut y = render_header(
        snapshot.header_style(),
        &mut c,
        &HeaderInputs {
            company_name: &labels.company_name,
            company_address: &labels.company_address,
            company_city: &labels.company_city,
            company_country: &labels.company_country,
            report_title: &labels.report_title,
            report_number: &snapshot.report_number,
            margin: MARGIN,
            y: 20.0,
            family,
            base_font_pt,
            modern_background: Rgb::from_hex(&snapshot.settings.styling.colors.modern_header_background),
            primary_text: Rgb::from_hex(&snapshot.settings.styling.colors.primary_text),
            logo_data: snapshot.logo_data.as_deref(),
        },
    );

    // Details block, two columns of label/value pairs.
    let meta = &snapshot.sheet.meta;
    c.set_font_size(10.0);

    c.set_font(None, FontStyle::Bold);
    c.text("Submitted By:", MARGIN, y);
    c.set_font(None, FontStyle::Normal);
    c.text(&meta.submitted_by, MARGIN + 30.0, y);
    y += 7.0;

    c.set_font(None, FontStyle::Bold);
    c.text("Report To:", MARGIN, y);
    c.set_font(None, FontStyle::Normal);
    c.text(&meta.report_to, MARGIN + 30.0, y);
    y += 7.0;

    c.set_font(None, FontStyle::Bold);
    c.text("Report Title:", MARGIN, y);
    c.set_font(None, FontStyle::Normal);
    c.text(&meta.report_title, MARGIN + 30.0, y);
    y += 10.0;

    let mut right_y = y - 21.0;
    c.set_font(None, FontStyle::Bold);
    c.text("Submitted On:", 110.0, right_y);
    c.set_font(None, FontStyle::Normal);
    c.text(&meta.submitted_on, 140.0, right_y);
    right_y += 7.0;

    c.set_font(None, FontStyle::Bold);
    c.text("Reporting Period:", 110.0, right_y);
    c.set_font(None, FontStyle::Normal);
    let period = if !meta.period_from.is_empty() && !meta.period_to.is_empty() {
        format!("{} to {}", meta.period_from, meta.period_to)
    } else {
        String::new()
    };
    c.text(&period, 140.0, right_y);

    if !meta.business_purpose.is_empty() {
        y += 5.0;
        c.set_font(None, FontStyle::Bold);
        c.text("Business Purpose:", MARGIN, y);
        c.set_font(None, FontStyle::Normal);
        y += 5.0;

        let lines = c.wrap_text(&meta.business_purpose, 170.0);
        for (i, line) in lines.iter().enumerate() {
            c.text(line, MARGIN, y + i as f32 * 4.0);
        }
        y += lines.len() as f32 * 4.0;
    }

    y += 10.0;

    // Table header bar.
    let th = styles.table_header;
    let header_height = th.font_size_px * 0.35 + th.padding_px * 0.35;
    c.fill_rect(MARGIN, y - 3.0, TABLE_WIDTH, header_height, th.background);

    c.set_text_color(th.color);
    c.set_font_size(th.font_size_px * 0.75);
    c.set_font(Some(family), FontStyle::Bold);

    let headers = &snapshot.settings.table_headers;
    c.text(&headers.date, MARGIN + 2.0, y + 2.0);
    c.text(&headers.description, MARGIN + 32.0, y + 2.0);
    c.text(&headers.merchant, MARGIN + 92.0, y + 2.0);
    c.text(&headers.amount, MARGIN + 142.0, y + 2.0);

    let row_style = styles.table_row;
    c.set_text_color(row_style.color);
    y += 10.0;

    // Rows. Blank rows are skipped; the stripe color follows the
    // position among included rows, not the sheet position.
    let symbol = &snapshot.settings.currency.symbol;
    let display_format = snapshot.settings.date_format.display;
    let mut row_index = 0usize;
    for row in snapshot.sheet.rows.iter().filter(|r| !r.is_blank()) {
        let row_height = row_style.font_size_px * 0.35 + row_style.padding_px * 0.35;
        let background = if row_index % 2 == 0 {
            row_style.even_background
        } else {
            row_style.odd_background
        };
        c.fill_rect(MARGIN, y - 3.0, TABLE_WIDTH, row_height, background);

        c.set_font(Some(family), FontStyle::Normal);
        c.set_font_size(row_style.font_size_px * 0.75);

        c.text(&format_date(display_format, &row.date), MARGIN + 2.0, y);
        c.text(&row.description, MARGIN + 32.0, y);
        c.text(&row.merchant, MARGIN + 92.0, y);
        c.text(&format!("{symbol}{:.2}", row.amount_value()), MARGIN + 142.0, y);

        y += 6.0;
        row_index += 1;

        if y > PAGE_HEIGHT - BOTTOM_MARGIN {
            c.add_page();
            y = 20.0;
        }
    }

    // Total block, filled and outlined.
    y += 5.0;
    let total = styles.total;
    let total_height = total.font_size_px * 0.5;
    c.fill_rect(MARGIN + 120.0, y - 3.0, 50.0, total_height, total.background);
    c.set_line_width(0.3);
    c.set_draw_color(total.border);
    c.stroke_rect(MARGIN + 120.0, y - 3.0, 50.0, total_height);

    c.set_font_size(total.font_size_px * 0.75);
    c.set_font(Some(family), FontStyle::Bold);
    c.set_text_color(total.color);

    c.text(&snapshot.settings.labels.total, MARGIN + 125.0, y + 3.0);
    c.text(
        &format!("{symbol}{}", snapshot.sheet.total_text()),
        MARGIN + 145.0,
        y + 3.0,
    );

    // Footer: gray timestamp, with an optional branding line above it.
    c.set_text_color(Rgb::new(128, 128, 128));
    c.set_font_size(8.0);
    c.set_font(None, FontStyle::Normal);

    let footer_y = PAGE_HEIGHT - 10.0;
    let generated = format!("Generated on {}", snapshot.generated_at);
    if let Some(branding) = &snapshot.branding {
        c.set_text_color(Rgb::new(0, 178, 137));
        c.set_font_size(9.0);
        c.set_font(None, FontStyle::Bold);
        let width = c.text_width(branding);
        c.text(branding, (PAGE_WIDTH - width) / 2.0, footer_y - 10.0);

        c.set_text_color(Rgb::new(128, 128, 128));
        c.set_font_size(8.0);
        c.set_font(None, FontStyle::Normal);
        c.text(&generated, MARGIN, footer_y - 20.0);
    } else {
        c.text(&generated, MARGIN, footer_y);
    }

    c.finish()
}
