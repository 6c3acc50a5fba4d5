//! Row-by-row stereogram synthesis via pattern-length modulation.
//!
//! Each output row carries a repeating pattern of pixels whose length tracks
//! the depth value under the current column: a depth step toward the viewer
//! shortens the pattern, a step away lengthens it (swapped in cross-eyed
//! mode). The pattern length is kept as a real number so that shallow depth
//! slopes accumulate fractional adjustments instead of losing them to
//! rounding at every column.

use rand::rngs::StdRng;
use rand::Rng;

use crate::raster::{red, Raster};

/// Knobs shared by both synthesis passes.
#[derive(Debug, Clone, Copy)]
pub struct SynthOptions {
    /// Swap the shorten/lengthen branches for cross-eyed viewing.
    pub cross_eyed: bool,
    /// Pattern length at the near plane is tile width divided by this.
    pub pattern_divisor: f64,
}

/// The per-row repeating pattern: a pixel buffer, a cursor, and the
/// fractional length the buffer is rounded from.
///
/// After every mutation the buffer length equals `len.round()` and the
/// cursor stays within the buffer.
pub(crate) struct Pattern {
    pixels: Vec<u32>,
    cursor: usize,
    len: f64,
}

impl Pattern {
    pub(crate) fn new(seed: &[u32]) -> Self {
        Self {
            pixels: seed.to_vec(),
            cursor: 0,
            len: seed.len() as f64,
        }
    }

    #[inline]
    pub(crate) fn current(&self) -> u32 {
        self.pixels[self.cursor]
    }

    #[inline]
    pub(crate) fn advance(&mut self) {
        self.cursor += 1;
        if self.cursor == self.pixels.len() {
            self.cursor = 0;
        }
    }

    /// Shorten the fractional length by `amount` and erase however many
    /// whole pixels that crosses, starting at the cursor and wrapping to the
    /// front of the buffer when the tail runs out.
    ///
    /// The length never drops below one pixel, so a degenerate one-pixel
    /// tile cannot empty the buffer.
    pub(crate) fn shrink(&mut self, amount: f64) {
        let new_len = (self.len - amount).max(1.0);
        let target = new_len.round() as usize;
        let delta = self.pixels.len().saturating_sub(target);
        if delta > 0 {
            let tail = self.pixels.len() - self.cursor;
            if delta <= tail {
                self.pixels.drain(self.cursor..self.cursor + delta);
                self.cursor %= self.pixels.len();
            } else {
                let rest = delta - tail;
                self.pixels.truncate(self.cursor);
                let offset = self.cursor - rest;
                self.pixels.drain(..rest);
                self.cursor = offset % self.pixels.len();
            }
        }
        self.len = new_len;
    }

    /// Lengthen the fractional length by `amount`, inserting however many
    /// whole pixels that crosses at the cursor. New pixels come from
    /// `tile_row` starting at column `px`, wrapping to the start of the row
    /// if the tile edge is reached. The cursor keeps its index, so the next
    /// pixel written is the first inserted one.
    pub(crate) fn grow(&mut self, amount: f64, tile_row: &[u32], px: usize) {
        let new_len = self.len + amount;
        let delta = (new_len.round() as usize).saturating_sub(self.pixels.len());
        if delta > 0 {
            let take = delta.min(tile_row.len() - px);
            let at = self.cursor;
            self.pixels
                .splice(at..at, tile_row[px..px + take].iter().copied());
            if delta > take {
                let rest = (delta - take).min(tile_row.len());
                let wrap_at = at + 1 + take;
                self.pixels
                    .splice(wrap_at..wrap_at, tile_row[..rest].iter().copied());
            }
        }
        self.len = new_len;
    }

    #[cfg(test)]
    pub(crate) fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[cfg(test)]
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> f64 {
        self.len
    }
}

/// Synthesize one canvas row in place.
///
/// Expects the seed pattern (one tile row) already blitted into columns
/// `[0, tile_width)` of the row and the depth values already present in the
/// R channel of the remaining columns; those columns are overwritten with
/// pattern pixels as the cursor sweeps right.
pub fn synthesize_row(
    canvas: &mut Raster,
    tile: &Raster,
    y: u32,
    options: &SynthOptions,
    rng: &mut StdRng,
) {
    let tw = tile.width() as usize;
    let th = tile.height();
    let w = canvas.width() as usize;
    if tw == 0 || th == 0 || w <= tw {
        return;
    }

    // One depth step out of 256 moves the pattern length by this many pixels,
    // which also caps how short the pattern can get relative to the tile.
    let coeff = (tile.width() as f64 / options.pattern_divisor) / 256.0;

    let row = canvas.row_mut(y);
    let mut pattern = Pattern::new(&row[..tw]);
    let mut prev: u32 = 0;

    for x in tw..w {
        let cur = red(row[x]) as u32;
        // The comparisons look inverted because depth maps are inverted:
        // 0 is the far plane, 255 the near plane.
        let (shorten, lengthen) = if options.cross_eyed {
            (cur < prev, cur > prev)
        } else {
            (cur > prev, cur < prev)
        };
        if shorten {
            let disparity = cur.abs_diff(prev);
            pattern.shrink(disparity as f64 * coeff);
        } else if lengthen {
            let disparity = cur.abs_diff(prev);
            // Pull fresh pixels from 1 to 5 rows above in the tile; the
            // jitter keeps alternating depth values from minting an
            // accidental second repeat period.
            let jitter = rng.gen_range(1..=5i64);
            let py = (y as i64 - jitter).rem_euclid(th as i64) as u32;
            let px = x % tw;
            pattern.grow(disparity as f64 * coeff, tile.row(py), px);
        }
        row[x] = pattern.current();
        prev = cur;
        pattern.advance();
    }
}
