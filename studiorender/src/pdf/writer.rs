use printpdf::{
    image_crate::{
        DynamicImage,
        GenericImageView,
    },
    path::PaintMode,
    BuiltinFont,
    Color as PdfColor,
    Image,
    ImageTransform,
    IndirectFontRef,
    Mm,
    PdfDocument,
    PdfLayerReference,
    Rect,
    Rgb,
};

use crate::error::Error;
use super::layout::{
    Color,
    DrawOp,
    Layout,
    PAGE_HEIGHT,
    PAGE_WIDTH,
};

const BORDER_THICKNESS: f32 = 0.3;

fn pdf_error(e: impl std::fmt::Display) -> Error {
    Error::Pdf(e.to_string())
}

fn pdf_color(color: Color) -> PdfColor {
    PdfColor::Rgb(Rgb::new(
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
        None,
    ))
}

// Layout measures down from the top edge, PDF up from the bottom.
fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
    Rect::new(
        Mm(x),
        Mm(PAGE_HEIGHT - y - h),
        Mm(x + w),
        Mm(PAGE_HEIGHT - y),
    )
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn draw(layer: &PdfLayerReference, fonts: &Fonts, layout: &Layout, op: &DrawOp) {
    match op {
        DrawOp::Text { x, y, size, bold, color, text } => {
            let font = if *bold { &fonts.bold } else { &fonts.regular };
            layer.set_fill_color(pdf_color(*color));
            layer.use_text(text.as_str(), *size, Mm(*x), Mm(PAGE_HEIGHT - y), font);
        }
        DrawOp::FillRect { x, y, w, h, color } => {
            layer.set_fill_color(pdf_color(*color));
            layer.add_rect(rect(*x, *y, *w, *h).with_mode(PaintMode::Fill));
        }
        DrawOp::StrokeRect { x, y, w, h, color } => {
            layer.set_outline_color(pdf_color(*color));
            layer.set_outline_thickness(BORDER_THICKNESS);
            layer.add_rect(rect(*x, *y, *w, *h).with_mode(PaintMode::Stroke));
        }
        DrawOp::Image { image, x, y, w, h } => {
            let Some(source) = layout.images.get(*image) else {
                log::warn!("layout refers to missing image {image}");
                return;
            };
            let (pw, _) = source.dimensions();
            // Transparency is flattened.
            let rgb = DynamicImage::ImageRgb8(source.to_rgb8());
            Image::from_dynamic_image(&rgb).add_to_layer(layer.clone(), ImageTransform {
                translate_x: Some(Mm(*x)),
                translate_y: Some(Mm(PAGE_HEIGHT - y - h)),
                dpi: Some(pw as f32 * 25.4 / w),
                ..Default::default()
            });
        }
    }
}

/// Serializes a layout, one PDF page per layout page.
pub fn write(layout: &Layout, title: &str) -> Result<Vec<u8>, Error> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        title,
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "content",
    );
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?,
    };
    let mut first = Some((first_page, first_layer));
    for page in layout.pages.iter() {
        let (page_index, layer_index) = first.take().unwrap_or_else(|| {
            doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content")
        });
        let layer = doc.get_page(page_index).get_layer(layer_index);
        for op in page.ops.iter() {
            draw(&layer, &fonts, layout, op);
        }
    }
    doc.save_to_bytes().map_err(pdf_error)
}
