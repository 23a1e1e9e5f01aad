//! Text measurement for the built-in PDF fonts.
//!
//! Widths come from the Adobe core-14 AFM files, reduced to the
//! printable ASCII range the report actually uses. Users can override a
//! face by dropping the full AFM file into `<config>/metrics/`; the
//! embedded tables are the fallback so measurement always works offline.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::{debug, warn};

use super::model::{FontFamily, FontStyle};

const FIRST_CHAR: usize = 32;
const LAST_CHAR: usize = 126;
const CHAR_COUNT: usize = LAST_CHAR - FIRST_CHAR + 1;

/// Per-mille advance widths for the printable ASCII range of one face.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    widths: [u16; CHAR_COUNT],
}

impl FontMetrics {
    fn uniform(width: u16) -> Self {
        Self {
            widths: [width; CHAR_COUNT],
        }
    }

    fn from_table(widths: [u16; CHAR_COUNT]) -> Self {
        Self { widths }
    }

    fn width_of(&self, ch: char) -> u16 {
        let code = ch as usize;
        if (FIRST_CHAR..=LAST_CHAR).contains(&code) {
            self.widths[code - FIRST_CHAR]
        } else {
            // Unmeasured characters get the space width, jsPDF-style.
            self.widths[0]
        }
    }

    /// Width of `text` in millimeters at the given point size.
    pub fn text_width_mm(&self, text: &str, size_pt: f32) -> f32 {
        let per_mille: u32 = text.chars().map(|c| u32::from(self.width_of(c))).sum();
        per_mille as f32 / 1000.0 * size_pt * 0.352_778
    }
}

/// Metrics for every face the painter can emit.
pub struct FontCatalog {
    helvetica: FontMetrics,
    helvetica_bold: FontMetrics,
    times: FontMetrics,
    times_bold: FontMetrics,
    courier: FontMetrics,
}

impl FontCatalog {
    pub fn metrics(&self, family: FontFamily, style: FontStyle) -> &FontMetrics {
        match (family, style) {
            (FontFamily::Helvetica, FontStyle::Normal) => &self.helvetica,
            (FontFamily::Helvetica, FontStyle::Bold) => &self.helvetica_bold,
            (FontFamily::Times, FontStyle::Normal) => &self.times,
            (FontFamily::Times, FontStyle::Bold) => &self.times_bold,
            // Courier is monospaced, bold included.
            (FontFamily::Courier, _) => &self.courier,
        }
    }

    pub fn text_width_mm(
        &self,
        text: &str,
        size_pt: f32,
        family: FontFamily,
        style: FontStyle,
    ) -> f32 {
        self.metrics(family, style).text_width_mm(text, size_pt)
    }
}

/// Catalog acquisition, memoized for the process lifetime. Each face is
/// resolved from the first source that yields it: a user AFM file under
/// `metrics_dir`, then the embedded table.
pub fn catalog(metrics_dir: &Path) -> &'static FontCatalog {
    static CATALOG: OnceLock<FontCatalog> = OnceLock::new();
    CATALOG.get_or_init(|| FontCatalog {
        helvetica: resolve(metrics_dir, "Helvetica", &HELVETICA_WIDTHS),
        helvetica_bold: resolve(metrics_dir, "Helvetica-Bold", &HELVETICA_BOLD_WIDTHS),
        times: resolve(metrics_dir, "Times-Roman", &TIMES_WIDTHS),
        times_bold: resolve(metrics_dir, "Times-Bold", &TIMES_BOLD_WIDTHS),
        courier: FontMetrics::uniform(600),
    })
}

fn resolve(metrics_dir: &Path, face: &str, embedded: &[u16; CHAR_COUNT]) -> FontMetrics {
    let override_path: PathBuf = metrics_dir.join(format!("{face}.afm"));
    if override_path.exists() {
        match fs::read_to_string(&override_path) {
            Ok(content) => match parse_afm_widths(&content) {
                Some(metrics) => {
                    debug!("using AFM override for {face} from {}", override_path.display());
                    return metrics;
                }
                None => warn!(
                    "AFM override {} has no usable width entries, using embedded metrics",
                    override_path.display()
                ),
            },
            Err(e) => warn!(
                "failed to read AFM override {}: {e}, using embedded metrics",
                override_path.display()
            ),
        }
    }
    FontMetrics::from_table(*embedded)
}

/// Pull `C <code> ; WX <width> ;` entries out of an AFM CharMetrics
/// section. Codes outside the printable ASCII range are ignored; gaps
/// keep the space width.
fn parse_afm_widths(content: &str) -> Option<FontMetrics> {
    let mut widths = [0u16; CHAR_COUNT];
    let mut seen = 0usize;

    for line in content.lines() {
        let mut code: Option<i32> = None;
        let mut width: Option<u16> = None;
        for field in line.split(';') {
            let mut parts = field.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some("C"), Some(v)) => code = v.parse().ok(),
                (Some("WX"), Some(v)) => width = v.parse().ok(),
                _ => {}
            }
        }
        if let (Some(code), Some(width)) = (code, width) {
            if (FIRST_CHAR as i32..=LAST_CHAR as i32).contains(&code) {
                widths[code as usize - FIRST_CHAR] = width;
                seen += 1;
            }
        }
    }

    if seen == 0 {
        return None;
    }
    let space = widths[0];
    for w in widths.iter_mut() {
        if *w == 0 {
            *w = space;
        }
    }
    Some(FontMetrics::from_table(widths))
}

// Adobe core-14 AFM widths, chars 32..=126, in per-mille of the em.

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; CHAR_COUNT] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; CHAR_COUNT] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
const TIMES_WIDTHS: [u16; CHAR_COUNT] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_BOLD_WIDTHS: [u16; CHAR_COUNT] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn courier_is_monospaced() {
        let metrics = FontMetrics::uniform(600);
        let narrow = metrics.text_width_mm("iiii", 12.0);
        let wide = metrics.text_width_mm("WWWW", 12.0);
        assert!((narrow - wide).abs() < f32::EPSILON);
    }

    #[test]
    fn helvetica_space_is_278_per_mille() {
        let metrics = FontMetrics::from_table(HELVETICA_WIDTHS);
        // 278/1000 * 10pt * 0.352778 mm/pt
        let expected = 0.278 * 10.0 * 0.352_778;
        assert!((metrics.text_width_mm(" ", 10.0) - expected).abs() < 1e-4);
    }

    #[test]
    fn bold_text_is_wider_than_regular() {
        let regular = FontMetrics::from_table(HELVETICA_WIDTHS);
        let bold = FontMetrics::from_table(HELVETICA_BOLD_WIDTHS);
        let text = "Expense Report";
        assert!(bold.text_width_mm(text, 12.0) > regular.text_width_mm(text, 12.0));
    }

    #[test]
    fn afm_parser_reads_charmetrics_lines() {
        let afm = "StartCharMetrics 3\n\
                   C 32 ; WX 250 ; N space ;\n\
                   C 65 ; WX 700 ; N A ;\n\
                   C 200 ; WX 999 ; N out-of-range ;\n\
                   EndCharMetrics\n";
        let metrics = parse_afm_widths(afm).unwrap();
        assert_eq!(metrics.width_of(' '), 250);
        assert_eq!(metrics.width_of('A'), 700);
        // Missing chars inherit the space width.
        assert_eq!(metrics.width_of('B'), 250);
    }

    #[test]
    fn afm_without_widths_is_rejected() {
        assert!(parse_afm_widths("FontName Broken\n").is_none());
    }
}
