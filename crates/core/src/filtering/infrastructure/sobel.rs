use crate::parallel::domain::band::Band;
use crate::shared::raster::{BandBuffer, Raster};

const GX: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
const GY: [[i32; 3]; 3] = [[1, 2, 1], [0, 0, 0], [-1, -2, -1]];

/// Sobel gradient magnitude of the red channel, written as gray.
///
/// The red channel stands in for luma. The outermost ring of pixels is not
/// computed and stays transparent black.
pub fn sobel_band(src: &Raster, band: Band) -> Vec<u8> {
    let width = src.width() as usize;
    let height = src.height() as usize;
    let mut out = BandBuffer::new(src.width(), band);

    if width < 3 || height < 3 {
        return out.into_bytes();
    }

    for y in band.start.max(1)..band.end.min(height - 1) {
        for x in 1..width - 1 {
            let mut gx = 0i32;
            let mut gy = 0i32;
            for ky in 0..3 {
                for kx in 0..3 {
                    let red = src.pixel(x + kx - 1, y + ky - 1)[0] as i32;
                    gx += red * GX[ky][kx];
                    gy += red * GY[ky][kx];
                }
            }
            let magnitude = ((gx * gx + gy * gy) as f64).sqrt().min(255.0) as u8;
            out.put(x, y, [magnitude, magnitude, magnitude, 255]);
        }
    }

    out.into_bytes()
}
