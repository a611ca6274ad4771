use crate::filtering::domain::filter::BrushSize;
use crate::parallel::domain::band::Band;
use crate::shared::raster::{BandBuffer, Raster};

/// Packs an RGB triple into one comparable key.
#[inline]
fn encode_rgb(p: [u8; 4]) -> u32 {
    (p[0] as u32) << 16 | (p[1] as u32) << 8 | p[2] as u32
}

#[inline]
fn decode_rgb(key: u32) -> [u8; 4] {
    [(key >> 16) as u8, (key >> 8) as u8, key as u8, 255]
}

/// Oil paint: each pixel takes the most frequent exact RGB triple found in
/// the brush window (clipped to the image).
///
/// Ties go to the lowest encoded `(R<<16)|(G<<8)|B` value.
pub fn oil_paint_band(src: &Raster, band: Band, brush: BrushSize) -> Vec<u8> {
    let radius = brush.radius();
    let width = src.width() as usize;
    let height = src.height() as usize;
    let mut out = BandBuffer::new(src.width(), band);
    let mut keys: Vec<u32> = Vec::new();

    for y in band.rows() {
        let y0 = y.saturating_sub(radius);
        let y1 = y.saturating_add(radius).min(height - 1);
        for x in 0..width {
            let x0 = x.saturating_sub(radius);
            let x1 = x.saturating_add(radius).min(width - 1);

            keys.clear();
            for ny in y0..=y1 {
                for nx in x0..=x1 {
                    keys.push(encode_rgb(src.pixel(nx, ny)));
                }
            }
            out.put(x, y, decode_rgb(most_frequent(&mut keys)));
        }
    }

    out.into_bytes()
}

/// Mode of `keys`, lowest key on ties. `keys` must be non-empty.
fn most_frequent(keys: &mut [u32]) -> u32 {
    keys.sort_unstable();
    let mut best_key = keys[0];
    let mut best_count = 0;
    let mut start = 0;
    while start < keys.len() {
        let key = keys[start];
        let run = keys[start..].iter().take_while(|&&k| k == key).count();
        // Runs arrive in ascending key order; strict `>` keeps the lowest.
        if run > best_count {
            best_count = run;
            best_key = key;
        }
        start += run;
    }
    best_key
}
