use crate::parallel::domain::band::Band;
use crate::shared::raster::{BandBuffer, Raster};

/// Binomial approximation of a Gaussian, 5 taps.
const TAPS: [u32; 5] = [1, 4, 6, 4, 1];

/// Half the kernel side; also the width of the uncomputed border.
pub const KERNEL_RADIUS: usize = 2;

/// Outer product of the 1D taps. The weights sum to 256.
pub fn kernel_2d() -> [[u32; 5]; 5] {
    let mut kernel = [[0u32; 5]; 5];
    for (ky, row) in kernel.iter_mut().enumerate() {
        for (kx, w) in row.iter_mut().enumerate() {
            *w = TAPS[ky] * TAPS[kx];
        }
    }
    kernel
}

/// 5×5 weighted mean, truncated.
///
/// Pixels closer than [`KERNEL_RADIUS`] to any edge are left at the
/// zero default (transparent black).
pub fn gaussian_band(src: &Raster, band: Band) -> Vec<u8> {
    let kernel = kernel_2d();
    let sum_weights: u32 = kernel.iter().flatten().sum();
    let width = src.width() as usize;
    let height = src.height() as usize;
    let mut out = BandBuffer::new(src.width(), band);

    if width <= 2 * KERNEL_RADIUS || height <= 2 * KERNEL_RADIUS {
        return out.into_bytes();
    }

    let y_start = band.start.max(KERNEL_RADIUS);
    let y_end = band.end.min(height - KERNEL_RADIUS);
    for y in y_start..y_end {
        for x in KERNEL_RADIUS..width - KERNEL_RADIUS {
            let mut sum = [0u32; 3];
            for (ky, row) in kernel.iter().enumerate() {
                for (kx, &w) in row.iter().enumerate() {
                    let p = src.pixel(x + kx - KERNEL_RADIUS, y + ky - KERNEL_RADIUS);
                    for c in 0..3 {
                        sum[c] += p[c] as u32 * w;
                    }
                }
            }
            out.put(
                x,
                y,
                [
                    (sum[0] / sum_weights) as u8,
                    (sum[1] / sum_weights) as u8,
                    (sum[2] / sum_weights) as u8,
                    255,
                ],
            );
        }
    }

    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whole(src: &Raster) -> Band {
        Band::new(0, src.height() as usize)
    }

    #[test]
    fn test_kernel_sums_to_256() {
        let sum: u32 = kernel_2d().iter().flatten().sum();
        assert_eq!(sum, 256);
    }

    #[test]
    fn test_kernel_is_symmetric() {
        let k = kernel_2d();
        for y in 0..5 {
            for x in 0..5 {
                assert_eq!(k[y][x], k[x][y]);
                assert_eq!(k[y][x], k[4 - y][4 - x]);
            }
        }
    }

    #[test]
    fn test_kernel_center_is_largest() {
        let k = kernel_2d();
        assert_eq!(k[2][2], 36);
        assert!(k.iter().flatten().all(|&w| w <= 36));
    }

    #[test]
    fn test_uniform_interior_unchanged_border_zero() {
        let src = Raster::filled(8, 7, [90, 180, 45, 255]);
        let out = Raster::new(gaussian_band(&src, whole(&src)), 8, 7);
        for y in 0..7 {
            for x in 0..8 {
                let interior = (2..6).contains(&x) && (2..5).contains(&y);
                let expected = if interior {
                    [90, 180, 45, 255]
                } else {
                    [0, 0, 0, 0]
                };
                assert_eq!(out.pixel(x, y), expected, "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn test_image_too_small_is_all_zero() {
        let src = Raster::filled(4, 9, [255, 255, 255, 255]);
        let out = gaussian_band(&src, whole(&src));
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_single_bright_pixel_weighted_by_center() {
        let mut data = vec![0u8; 5 * 5 * 4];
        data[(2 * 5 + 2) * 4] = 255;
        let src = Raster::new(data, 5, 5);
        let out = Raster::new(gaussian_band(&src, whole(&src)), 5, 5);
        // 255 * 36 / 256 = 35 (truncated)
        assert_eq!(out.pixel(2, 2), [35, 0, 0, 255]);
    }
}
