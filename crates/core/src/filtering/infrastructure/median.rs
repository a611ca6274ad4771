use crate::parallel::domain::band::Band;
use crate::shared::raster::{BandBuffer, Raster};

/// Per-channel 3×3 median.
///
/// Neighbours outside the image count as 0 rather than being dropped, so
/// border medians lean towards black.
pub fn median_band(src: &Raster, band: Band) -> Vec<u8> {
    let width = src.width() as usize;
    let height = src.height() as usize;
    let mut out = BandBuffer::new(src.width(), band);

    for y in band.rows() {
        for x in 0..width {
            let mut channels = [[0u8; 9]; 3];
            let mut i = 0;
            for dy in -1isize..=1 {
                for dx in -1isize..=1 {
                    let nx = x as isize + dx;
                    let ny = y as isize + dy;
                    if nx >= 0 && (nx as usize) < width && ny >= 0 && (ny as usize) < height {
                        let p = src.pixel(nx as usize, ny as usize);
                        for c in 0..3 {
                            channels[c][i] = p[c];
                        }
                    }
                    i += 1;
                }
            }
            for values in channels.iter_mut() {
                values.sort_unstable();
            }
            out.put(x, y, [channels[0][4], channels[1][4], channels[2][4], 255]);
        }
    }

    out.into_bytes()
}
