//! Paint a [`DocModel`] into an actual PDF file via printpdf.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Polygon,
    Px,
};

use crate::error::{ExpenseError, Result};

use super::model::{DocModel, FontFamily, FontStyle, Op, Rgb, PAGE_HEIGHT, PAGE_WIDTH};

struct Fonts {
    helvetica: IndirectFontRef,
    helvetica_bold: IndirectFontRef,
    times: IndirectFontRef,
    times_bold: IndirectFontRef,
    courier: IndirectFontRef,
    courier_bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, family: FontFamily, style: FontStyle) -> &IndirectFontRef {
        match (family, style) {
            (FontFamily::Helvetica, FontStyle::Normal) => &self.helvetica,
            (FontFamily::Helvetica, FontStyle::Bold) => &self.helvetica_bold,
            (FontFamily::Times, FontStyle::Normal) => &self.times,
            (FontFamily::Times, FontStyle::Bold) => &self.times_bold,
            (FontFamily::Courier, FontStyle::Normal) => &self.courier,
            (FontFamily::Courier, FontStyle::Bold) => &self.courier_bold,
        }
    }
}

fn pdf_color(color: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        f32::from(color.r) / 255.0,
        f32::from(color.g) / 255.0,
        f32::from(color.b) / 255.0,
        None,
    ))
}

fn pdf_err(e: impl std::fmt::Display) -> ExpenseError {
    ExpenseError::PdfGeneration(e.to_string())
}

/// Write the document to `path`. Model coordinates are top-down; PDF
/// space is bottom-up, so every y gets flipped here.
pub fn paint(model: &DocModel, title: &str, path: &Path) -> Result<()> {
    let (doc, page1, layer1) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");

    let fonts = Fonts {
        helvetica: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?,
        helvetica_bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_err)?,
        times: doc.add_builtin_font(BuiltinFont::TimesRoman).map_err(pdf_err)?,
        times_bold: doc.add_builtin_font(BuiltinFont::TimesBold).map_err(pdf_err)?,
        courier: doc.add_builtin_font(BuiltinFont::Courier).map_err(pdf_err)?,
        courier_bold: doc
            .add_builtin_font(BuiltinFont::CourierBold)
            .map_err(pdf_err)?,
    };

    for (index, page) in model.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(page1).get_layer(layer1)
        } else {
            let (new_page, new_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            doc.get_page(new_page).get_layer(new_layer)
        };

        for op in &page.ops {
            paint_op(&layer, &fonts, op)?;
        }
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer).map_err(pdf_err)?;
    Ok(())
}

fn paint_op(layer: &PdfLayerReference, fonts: &Fonts, op: &Op) -> Result<()> {
    match op {
        Op::Text {
            text,
            x,
            y,
            size_pt,
            family,
            style,
            color,
        } => {
            layer.set_fill_color(pdf_color(*color));
            layer.use_text(
                text.clone(),
                *size_pt,
                Mm(*x),
                Mm(PAGE_HEIGHT - y),
                fonts.get(*family, *style),
            );
        }
        Op::FillRect {
            x,
            y,
            width,
            height,
            color,
        } => {
            layer.set_fill_color(pdf_color(*color));
            let polygon = Polygon {
                rings: vec![rect_ring(*x, *y, *width, *height)],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            };
            layer.add_polygon(polygon);
        }
        Op::StrokeRect {
            x,
            y,
            width,
            height,
            color,
            line_width,
        } => {
            layer.set_outline_color(pdf_color(*color));
            layer.set_outline_thickness(*line_width);
            let line = Line {
                points: rect_ring(*x, *y, *width, *height),
                is_closed: true,
            };
            layer.add_line(line);
        }
        Op::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            line_width,
        } => {
            layer.set_outline_color(pdf_color(*color));
            layer.set_outline_thickness(*line_width);
            let line = Line {
                points: vec![
                    (Point::new(Mm(*x1), Mm(PAGE_HEIGHT - y1)), false),
                    (Point::new(Mm(*x2), Mm(PAGE_HEIGHT - y2)), false),
                ],
                is_closed: false,
            };
            layer.add_line(line);
        }
        Op::Image {
            data,
            x,
            y,
            max_width,
            max_height,
        } => place_image(layer, data, *x, *y, *max_width, *max_height)?,
    }
    Ok(())
}

fn rect_ring(x: f32, y: f32, width: f32, height: f32) -> Vec<(Point, bool)> {
    // Flip the top-down rect into PDF space: bottom edge first.
    let bottom = PAGE_HEIGHT - y - height;
    let top = PAGE_HEIGHT - y;
    vec![
        (Point::new(Mm(x), Mm(bottom)), false),
        (Point::new(Mm(x + width), Mm(bottom)), false),
        (Point::new(Mm(x + width), Mm(top)), false),
        (Point::new(Mm(x), Mm(top)), false),
    ]
}

/// Decode the image and scale it to fit the bounding box, preserving
/// aspect ratio and anchoring at the box's top-left corner.
fn place_image(
    layer: &PdfLayerReference,
    data: &[u8],
    x: f32,
    y: f32,
    max_width: f32,
    max_height: f32,
) -> Result<()> {
    let img = image::ImageReader::new(std::io::Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ExpenseError::PdfGeneration(format!("logo format detection failed: {e}")))?
        .decode()
        .map_err(|e| ExpenseError::PdfGeneration(format!("logo decoding failed: {e}")))?;

    let img_width = img.width();
    let img_height = img.height();
    let rgb = img.to_rgb8();

    let pdf_image = printpdf::Image::from(printpdf::ImageXObject {
        width: Px(img_width as usize),
        height: Px(img_height as usize),
        color_space: printpdf::ColorSpace::Rgb,
        bits_per_component: printpdf::ColorBits::Bit8,
        interpolate: true,
        image_data: rgb.into_raw(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    let aspect = img_width as f32 / img_height as f32;
    let (render_w, render_h) = if aspect > max_width / max_height {
        (max_width, max_width / aspect)
    } else {
        (max_height * aspect, max_height)
    };

    // At 72 dpi one pixel is one point, so scale is mm-target over the
    // image's natural mm size.
    let dpi = 72.0;
    let natural_w_mm = img_width as f32 * 25.4 / dpi;
    let natural_h_mm = img_height as f32 * 25.4 / dpi;

    pdf_image.add_to_layer(
        layer.clone(),
        printpdf::ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(PAGE_HEIGHT - y - render_h)),
            scale_x: Some(render_w / natural_w_mm),
            scale_y: Some(render_h / natural_h_mm),
            dpi: Some(dpi),
            ..Default::default()
        },
    );

    Ok(())
}
