//! The two-pass stereogram renderer.
//!
//! Pass 1 synthesizes the whole canvas from a coordinate-gradient tile, so
//! every output pixel records which tile coordinate landed there. Pass 2
//! inverts that record row by row: it pre-scrambles a copy of the real tile
//! so that, once the synthesizer distorts it again, the central strip of the
//! final image reassembles into the original tile.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::gradient;
use crate::raster::{Raster, Rect, OPAQUE_BLACK};
use crate::synth::{self, SynthOptions};

/// Both passes reseed to the same constant so one set of inputs always
/// produces one output.
const PASS_SEED: u64 = 42;

/// Render the full stereogram onto a fresh canvas.
#[must_use]
pub fn render(
    tile: &Raster,
    depth: &Raster,
    width: u32,
    height: u32,
    options: &SynthOptions,
) -> Raster {
    let mut canvas = Raster::new(width, height);
    if tile.width() == 0 || tile.height() == 0 {
        return canvas;
    }
    let gradient_tile = gradient::coordinate_tile(tile.width(), tile.height());

    // Pass 1: build the offset map.
    let mut rng = StdRng::seed_from_u64(PASS_SEED);
    blit_depth(&mut canvas, depth, tile.width());
    seed_left_columns(&mut canvas, &gradient_tile);
    for y in 0..height {
        synth::synthesize_row(&mut canvas, &gradient_tile, y, options, &mut rng);
    }
    let offsets = canvas.clone();

    // Pass 2: re-render row by row from per-row rearranged tiles. The offset
    // map lives in its own buffer for the whole pass; the canvas restarts
    // from black.
    canvas.fill(OPAQUE_BLACK);
    let mut rng = StdRng::seed_from_u64(PASS_SEED);
    blit_depth(&mut canvas, depth, tile.width());
    let mut rearranged = tile.clone();
    for row in 0..height {
        rearranged.blit(tile, None, 0, 0);
        rearrange_row(&mut rearranged, tile, &offsets, row);
        let line = Rect {
            x: 0,
            y: row % tile.height(),
            width: tile.width(),
            height: 1,
        };
        canvas.blit(&rearranged, Some(line), 0, row as i32);
        synth::synthesize_row(&mut canvas, &rearranged, row, options, &mut rng);
    }
    canvas
}

/// Place the depth raster centered on the canvas, shifted right by half a
/// tile. The left tile-width of every row is the seed pattern region, so the
/// perceived image sits half a period further right than the raw center.
fn blit_depth(canvas: &mut Raster, depth: &Raster, tile_width: u32) {
    let x = (canvas.width() as i32 / 2 - depth.width() as i32 / 2) + tile_width as i32 / 2;
    let y = canvas.height() as i32 / 2 - depth.height() as i32 / 2;
    canvas.blit(depth, None, x, y);
}

/// Tile `src` down the full canvas height so columns `[0, tile width)` of
/// every row hold a seed pattern.
fn seed_left_columns(canvas: &mut Raster, src: &Raster) {
    let mut y = 0;
    while y < canvas.height() {
        canvas.blit(src, None, 0, y as i32);
        y += src.height();
    }
}

/// Scramble one row's tile using the offset map as an inverse coordinate
/// map: the gradient pixel found at central column i names the tile slot
/// that will surface there, so the pixel destined for that spot is written
/// into the named slot.
fn rearrange_row(rearranged: &mut Raster, tile: &Raster, offsets: &Raster, row: u32) {
    let tw = tile.width();
    let src_y = row % tile.height();
    let center = offsets.width() / 2 - tw / 2;
    for i in 0..tw {
        let (xo, yo) = gradient::decode(offsets.get(center + i, row));
        if xo < tw && yo < tile.height() {
            rearranged.set(xo, yo, tile.get(i, src_y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_sits_half_a_tile_right_of_center() {
        let mut canvas = Raster::new(100, 40);
        let mut depth = Raster::new(10, 4);
        depth.fill(0xFFFF_FFFF);
        blit_depth(&mut canvas, &depth, 20);
        // x = 50 - 5 + 10, y = 20 - 2.
        assert_eq!(canvas.get(55, 18), 0xFFFF_FFFF);
        assert_eq!(canvas.get(54, 18), 0);
        assert_eq!(canvas.get(64, 21), 0xFFFF_FFFF);
        assert_eq!(canvas.get(65, 21), 0);
    }

    #[test]
    fn left_columns_tile_vertically() {
        let mut canvas = Raster::new(12, 10);
        let tile = gradient::coordinate_tile(4, 4);
        seed_left_columns(&mut canvas, &tile);
        for y in 0..10 {
            for x in 0..4 {
                assert_eq!(gradient::decode(canvas.get(x, y)), (x, y % 4));
            }
        }
    }
}
