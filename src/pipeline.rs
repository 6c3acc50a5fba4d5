//! End-to-end synthesis: load inputs, check geometry, run both passes.

use std::path::Path;

use tracing::{info, warn};

use crate::config::{DepthSource, Settings};
use crate::depth;
use crate::error::Error;
use crate::raster::Raster;
use crate::render;
use crate::synth::SynthOptions;

/// Tiles beyond this size cannot be addressed by the coordinate gradient.
pub const MAX_TILE_DIM: u32 = 65_536;

/// Produce the finished stereogram canvas for the given settings.
pub fn run(settings: &Settings) -> Result<Raster, Error> {
    let tile = load_tile(&settings.tile_path)?;
    let depth_raster = match &settings.depth {
        DepthSource::Text {
            font_path,
            size,
            text,
            value,
        } => depth::from_text(font_path, *size, text, *value)?,
        DepthSource::Map { path } => depth::from_map(path)?,
    };
    check_geometry(settings.width, settings.height, &tile, &depth_raster)?;

    info!(
        width = settings.width,
        height = settings.height,
        tile = %settings.tile_path.display(),
        cross_eyed = settings.cross_eyed,
        "synthesizing stereogram"
    );
    let options = SynthOptions {
        cross_eyed: settings.cross_eyed,
        pattern_divisor: settings.pattern_divisor,
    };
    Ok(render::render(
        &tile,
        &depth_raster,
        settings.width,
        settings.height,
        &options,
    ))
}

/// Encode the canvas as a 32-bpp PNG.
pub fn save_png(canvas: &Raster, path: &Path) -> Result<(), Error> {
    canvas
        .to_rgba_image()
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|err| Error::Encode(err.to_string()))
}

fn load_tile(path: &Path) -> Result<Raster, Error> {
    let image = image::open(path).map_err(|err| Error::load(path, err))?;
    let image = image.to_rgba8();
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::Format("tile image is empty".into()));
    }
    if image.width() > MAX_TILE_DIM || image.height() > MAX_TILE_DIM {
        return Err(Error::Format(format!(
            "tile image too big; max. dimensions {MAX_TILE_DIM}x{MAX_TILE_DIM}"
        )));
    }
    Ok(Raster::from_rgba_image(&image))
}

fn check_geometry(width: u32, height: u32, tile: &Raster, depth: &Raster) -> Result<(), Error> {
    if width < tile.width() || height < tile.height() {
        return Err(Error::Format(
            "output must be at least as big as the tile in both dimensions".into(),
        ));
    }
    // One tile width of seed pattern on each side of the perceived image.
    let minimum = tile.width() * 2 + depth.width();
    if width < minimum {
        warn!(minimum, "output not wide enough for the full depth image");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_smaller_than_tile_is_rejected() {
        let tile = Raster::new(32, 32);
        let depth_raster = Raster::new(8, 8);
        assert!(matches!(
            check_geometry(16, 64, &tile, &depth_raster),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            check_geometry(64, 16, &tile, &depth_raster),
            Err(Error::Format(_))
        ));
        assert!(check_geometry(72, 32, &tile, &depth_raster).is_ok());
    }
}
