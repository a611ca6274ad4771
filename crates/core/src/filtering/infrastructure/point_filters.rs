//! Filters whose output pixel depends only on the input pixel at the same
//! position.

use crate::parallel::domain::band::Band;
use crate::shared::raster::{BandBuffer, Raster};

/// Widens an 8-bit channel to the 16-bit range (`0xAB → 0xABAB`).
#[inline]
pub(crate) fn widen(v: u8) -> u32 {
    v as u32 * 257
}

pub fn grayscale_band(src: &Raster, band: Band) -> Vec<u8> {
    map_band(src, band, |[r, g, b, _]| {
        let avg16 = (widen(r) + widen(g) + widen(b)) / 3;
        let avg = (avg16 >> 8) as u8;
        [avg, avg, avg, 255]
    })
}

pub fn invert_band(src: &Raster, band: Band) -> Vec<u8> {
    map_band(src, band, |[r, g, b, _]| [255 - r, 255 - g, 255 - b, 255])
}

fn map_band(src: &Raster, band: Band, f: impl Fn([u8; 4]) -> [u8; 4]) -> Vec<u8> {
    let width = src.width() as usize;
    let mut out = BandBuffer::new(src.width(), band);
    for y in band.rows() {
        for x in 0..width {
            out.put(x, y, f(src.pixel(x, y)));
        }
    }
    out.into_bytes()
}
