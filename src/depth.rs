//! Depth source adapter.
//!
//! The synthesizer only ever reads the R channel of a depth raster, with 0
//! as the far plane and 255 as the near plane. That raster comes from one of
//! two places: a text string rasterized through a font, where the glyph
//! silhouette carries a single user-chosen depth value, or a grayscale depth
//! map loaded from disk as-is.

use std::path::Path;

use ab_glyph::{point, Font, FontArc, PxScale, ScaleFont};

use crate::error::Error;
use crate::raster::{pack, Raster};

/// Glyph coverage at or above this counts as solid in the silhouette.
const SOLID_COVERAGE: f32 = 0.5;

/// Rasterize `text` as a solid silhouette at depth `value`.
///
/// The output raster is sized to the laid-out text; silhouette pixels are
/// (value, value, value) and the background stays at zero, the far plane.
pub fn from_text(font_path: &Path, size: u32, text: &str, value: u8) -> Result<Raster, Error> {
    let data = std::fs::read(font_path).map_err(|err| Error::load(font_path, err))?;
    let font = FontArc::try_from_vec(data).map_err(|err| Error::load(font_path, err))?;
    render_text_solid(&font, size as f32, text, value)
}

/// Load a depth map image as-is, converted to the canvas pixel format.
pub fn from_map(path: &Path) -> Result<Raster, Error> {
    let image = image::open(path).map_err(|err| Error::load(path, err))?;
    Ok(Raster::from_rgba_image(&image.to_rgba8()))
}

fn render_text_solid(font: &FontArc, size: f32, text: &str, value: u8) -> Result<Raster, Error> {
    let scale = PxScale::from(size);
    let scaled = font.as_scaled(scale);
    let ascent = scaled.ascent();
    let height = (ascent - scaled.descent()).ceil() as u32;
    let width = measure_text(font, scale, text).ceil() as u32;
    if width == 0 || height == 0 {
        return Err(Error::Config(format!(
            "text {text:?} renders to an empty image"
        )));
    }

    let mut out = Raster::new(width, height);
    let foreground = pack(value, value, value, 0xFF);

    let mut cursor_x = 0.0f32;
    let mut previous = None;
    for ch in text.chars() {
        if ch.is_control() {
            continue;
        }
        let glyph = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            cursor_x += scaled.kern(prev, glyph);
        }
        let advance = scaled.h_advance(glyph);
        let mut positioned = scaled.scaled_glyph(ch);
        positioned.position = point(cursor_x, ascent);
        if let Some(outline) = font.outline_glyph(positioned) {
            let bounds = outline.px_bounds();
            outline.draw(|gx, gy, coverage| {
                if coverage < SOLID_COVERAGE {
                    return;
                }
                let x = bounds.min.x + gx as f32;
                let y = bounds.min.y + gy as f32;
                if x >= 0.0 && y >= 0.0 && (x as u32) < width && (y as u32) < height {
                    out.set(x as u32, y as u32, foreground);
                }
            });
        }
        cursor_x += advance;
        previous = Some(glyph);
    }

    Ok(out)
}

fn measure_text(font: &FontArc, scale: PxScale, text: &str) -> f32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut previous = None;
    for ch in text.chars() {
        if ch.is_control() {
            continue;
        }
        let glyph = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            width += scaled.kern(prev, glyph);
        }
        width += scaled.h_advance(glyph);
        previous = Some(glyph);
    }
    width.max(0.0)
}
