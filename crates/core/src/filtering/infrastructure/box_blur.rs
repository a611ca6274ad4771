use crate::filtering::domain::filter::BlurRadius;
use crate::parallel::domain::band::Band;
use crate::shared::raster::{BandBuffer, Raster};

use super::point_filters::widen;

/// Unweighted mean over the `(2r+1)²` window around each pixel.
///
/// Neighbours outside the image are skipped and the divisor is the number
/// of in-bounds pixels, so edges are not darkened. Averaging happens in the
/// 16-bit channel range and the result keeps the high byte.
pub fn box_blur_band(src: &Raster, band: Band, radius: BlurRadius) -> Vec<u8> {
    let r = radius.get();
    let width = src.width() as usize;
    let height = src.height() as usize;
    let mut out = BandBuffer::new(src.width(), band);

    for y in band.rows() {
        let y0 = y.saturating_sub(r);
        let y1 = y.saturating_add(r).min(height - 1);
        for x in 0..width {
            let x0 = x.saturating_sub(r);
            let x1 = x.saturating_add(r).min(width - 1);

            let mut sum = [0u64; 3];
            for ny in y0..=y1 {
                for nx in x0..=x1 {
                    let p = src.pixel(nx, ny);
                    for c in 0..3 {
                        sum[c] += widen(p[c]) as u64;
                    }
                }
            }
            let count = ((y1 - y0 + 1) * (x1 - x0 + 1)) as u64;
            let avg = |c: usize| ((sum[c] / count) >> 8) as u8;
            out.put(x, y, [avg(0), avg(1), avg(2), 255]);
        }
    }

    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn whole(src: &Raster) -> Band {
        Band::new(0, src.height() as usize)
    }

    #[rstest]
    #[case::radius_1(1)]
    #[case::radius_3(3)]
    #[case::radius_larger_than_image(50)]
    fn test_uniform_image_unchanged(#[case] radius: i32) {
        let src = Raster::filled(7, 5, [37, 128, 250, 255]);
        let out = box_blur_band(&src, whole(&src), BlurRadius::new(radius));
        assert_eq!(out, src.data());
    }

    #[test]
    fn test_corner_divides_by_in_bounds_count() {
        // 2x2: only one bright pixel; radius 1 covers the whole image from
        // every position, so every output is the mean of 4 pixels.
        let mut data = vec![0u8; 16];
        data[..4].copy_from_slice(&[200, 100, 40, 255]);
        for p in data[4..].chunks_mut(4) {
            p[3] = 255;
        }
        let src = Raster::new(data, 2, 2);
        let out = box_blur_band(&src, whole(&src), BlurRadius::new(1));
        // (200*257/4) >> 8 = 50, (100*257/4) >> 8 = 25, (40*257/4) >> 8 = 10
        assert_eq!(&out[..4], &[50, 25, 10, 255]);
        assert_eq!(&out[12..16], &[50, 25, 10, 255]);
    }

    #[test]
    fn test_single_bright_pixel_spreads() {
        let mut src_data = vec![0u8; 5 * 5 * 4];
        let center = (2 * 5 + 2) * 4;
        src_data[center] = 255;
        let src = Raster::new(src_data, 5, 5);
        let out = box_blur_band(&src, whole(&src), BlurRadius::new(1));

        assert!(out[center] < 255);
        let neighbor = (2 * 5 + 3) * 4;
        assert!(out[neighbor] > 0);
        let far = 0;
        assert_eq!(out[far], 0);
    }
}
