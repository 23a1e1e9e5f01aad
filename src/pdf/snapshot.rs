//! Everything the layout pass needs, captured up front.
//!
//! The browser original read half of these values back out of rendered
//! DOM computed styles. Here the same values are derived directly from
//! the settings tree, which is the single source the stylesheet rules
//! were generated from in the first place.

use chrono::Local;

use crate::sheet::Sheet;
use crate::store::{HeaderStyle, Settings};

use super::model::{FontFamily, Rgb};

/// Styles for one rendered region, in CSS pixel units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionStyle {
    pub font_size_px: f32,
    pub padding_px: f32,
    pub color: Rgb,
    pub background: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowStyle {
    pub font_size_px: f32,
    pub padding_px: f32,
    pub color: Rgb,
    pub odd_background: Rgb,
    pub even_background: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TotalStyle {
    pub font_size_px: f32,
    pub color: Rgb,
    pub background: Rgb,
    pub border: Rgb,
}

/// The resolved appearance of the report regions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedStyles {
    pub base_font_size_px: f32,
    pub family: FontFamily,
    pub table_header: RegionStyle,
    pub table_row: RowStyle,
    pub total: TotalStyle,
}

/// Leading number of a CSS size like `14px` or `16px 20px`; shorthand
/// values resolve to their first (top) component.
pub fn parse_px(value: &str, fallback: f32) -> f32 {
    let digits: String = value
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().unwrap_or(fallback)
}

/// Reduce a CSS font stack to one of the three output families.
/// Generic `sans-serif` does not count as serif.
pub fn map_font_family(stack: &str) -> FontFamily {
    let lower = stack.to_lowercase();
    if lower.contains("courier") || lower.contains("mono") {
        FontFamily::Courier
    } else if lower.contains("times") || lower.replace("sans-serif", "").contains("serif") {
        FontFamily::Times
    } else {
        FontFamily::Helvetica
    }
}

pub fn resolve_computed_styles(settings: &Settings) -> ComputedStyles {
    let colors = &settings.styling.colors;
    let fonts = &settings.styling.fonts;
    let layout = &settings.styling.layout;

    let base = parse_px(&fonts.base_size, 14.0);
    let table_padding = parse_px(&layout.table_padding, 16.0);

    ComputedStyles {
        base_font_size_px: base,
        family: map_font_family(&fonts.family),
        table_header: RegionStyle {
            font_size_px: base,
            padding_px: table_padding,
            color: Rgb::from_hex(&colors.header_text),
            background: Rgb::from_hex(&colors.header_background),
        },
        table_row: RowStyle {
            font_size_px: base,
            padding_px: table_padding,
            color: Rgb::from_hex(&colors.primary_text),
            odd_background: Rgb::from_hex(&colors.table_row_odd),
            even_background: Rgb::from_hex(&colors.table_row_even),
        },
        total: TotalStyle {
            font_size_px: parse_px(&fonts.title_size, 16.0),
            color: Rgb::from_hex(&colors.primary_text),
            background: Rgb::from_hex(&colors.total_background),
            border: Rgb::from_hex(&colors.total_border),
        },
    }
}

/// A frozen view of everything that goes on the page. Captured once per
/// export so the layout pass sees a consistent state.
#[derive(Debug, Clone)]
pub struct ReportSnapshot {
    pub settings: Settings,
    pub sheet: Sheet,
    pub styles: ComputedStyles,
    pub report_number: String,
    /// Logo as a `data:` URI, when one is set.
    pub logo_data: Option<String>,
    /// Optional branding line centered above the footer timestamp.
    pub branding: Option<String>,
    /// Human-readable generation timestamp for the footer.
    pub generated_at: String,
}

impl ReportSnapshot {
    pub fn capture(
        settings: Settings,
        sheet: Sheet,
        report_number: String,
        logo_data: Option<String>,
        branding: Option<String>,
    ) -> Self {
        let styles = resolve_computed_styles(&settings);
        Self {
            settings,
            sheet,
            styles,
            report_number,
            logo_data,
            branding,
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    pub fn header_style(&self) -> HeaderStyle {
        self.settings.header_style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn px_parsing_takes_the_leading_component() {
        assert_eq!(parse_px("14px", 0.0), 14.0);
        assert_eq!(parse_px("16px 20px", 0.0), 16.0);
        assert_eq!(parse_px("1fr", 12.0), 1.0);
        assert_eq!(parse_px("auto", 12.0), 12.0);
    }

    #[test]
    fn font_stack_mapping_covers_the_three_families() {
        assert_eq!(map_font_family("Georgia, 'Times New Roman', serif"), FontFamily::Times);
        assert_eq!(map_font_family("'Courier New', monospace"), FontFamily::Courier);
        assert_eq!(map_font_family("Arial, sans-serif"), FontFamily::Helvetica);
        // The default stack ends in sans-serif and must stay sans.
        assert_eq!(
            map_font_family(&Settings::default().styling.fonts.family),
            FontFamily::Helvetica
        );
    }

    #[test]
    fn default_styles_resolve_to_expected_pdf_units() {
        let styles = resolve_computed_styles(&Settings::default());
        assert_eq!(styles.base_font_size_px, 14.0);
        assert_eq!(styles.table_header.padding_px, 16.0);
        assert_eq!(styles.table_header.background, Rgb::new(108, 117, 125));
        assert_eq!(styles.table_row.even_background, Rgb::new(248, 249, 250));
        assert_eq!(styles.total.font_size_px, 16.0);
    }
}
