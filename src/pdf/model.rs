//! Device-independent description of a rendered report.
//!
//! The layout pass produces a [`DocModel`]; the painter turns it into an
//! actual PDF. Keeping the two apart lets layout be tested without
//! parsing PDF output.

/// A4 portrait, in millimeters.
pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFamily {
    Helvetica,
    Times,
    Courier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional). Anything else yields the
    /// neutral gray used throughout as the fallback.
    pub fn from_hex(hex: &str) -> Self {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
            let byte = |i| u8::from_str_radix(&digits[i..i + 2], 16).unwrap_or(0);
            Self::new(byte(0), byte(2), byte(4))
        } else {
            Self::new(108, 117, 125)
        }
    }
}

/// One drawing operation. Coordinates are millimeters from the top-left
/// corner of the page; the painter flips y for PDF space.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Text {
        text: String,
        x: f32,
        y: f32,
        size_pt: f32,
        family: FontFamily,
        style: FontStyle,
        color: Rgb,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
        line_width: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Rgb,
        line_width: f32,
    },
    Image {
        /// Raw image bytes, PNG or JPEG.
        data: Vec<u8>,
        x: f32,
        y: f32,
        max_width: f32,
        max_height: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<Op>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocModel {
    pub pages: Vec<Page>,
}

impl DocModel {
    pub fn new() -> Self {
        Self {
            pages: vec![Page::default()],
        }
    }

    pub fn current_page(&mut self) -> &mut Page {
        self.pages.last_mut().expect("document always has a page")
    }

    pub fn add_page(&mut self) {
        self.pages.push(Page::default());
    }

    /// All text operations across every page, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|p| &p.ops).filter_map(|op| {
            if let Op::Text { text, .. } = op {
                Some(text.as_str())
            } else {
                None
            }
        })
    }

    pub fn has_image(&self) -> bool {
        self.pages
            .iter()
            .flat_map(|p| &p.ops)
            .any(|op| matches!(op, Op::Image { .. }))
    }
}

impl Default for DocModel {
    fn default() -> Self {
        Self::new()
    }
}
