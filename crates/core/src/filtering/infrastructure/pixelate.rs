use crate::filtering::domain::filter::BlockSize;
use crate::parallel::domain::band::Band;
use crate::shared::raster::{BandBuffer, Raster};

/// Mosaic effect: each `block×block` cell becomes its mean colour.
///
/// Cells are aligned to the image origin, so a band may start or end in the
/// middle of a cell row; it still averages the whole cell (reading the
/// shared source) but only writes its own rows. Cells cut by the right or
/// bottom edge average just their in-bounds pixels.
pub fn pixelate_band(src: &Raster, band: Band, block: BlockSize) -> Vec<u8> {
    let block = block.get();
    let width = src.width() as usize;
    let height = src.height() as usize;
    let mut out = BandBuffer::new(src.width(), band);

    let mut cell_y = band.start / block * block;
    while cell_y < band.end {
        let cell_y_end = cell_y.saturating_add(block).min(height);
        let mut cell_x = 0;
        while cell_x < width {
            let cell_x_end = cell_x.saturating_add(block).min(width);
            let mean = cell_mean(src, cell_x..cell_x_end, cell_y..cell_y_end);
            for y in cell_y.max(band.start)..cell_y_end.min(band.end) {
                for x in cell_x..cell_x_end {
                    out.put(x, y, mean);
                }
            }
            cell_x = cell_x_end;
        }
        cell_y = cell_y_end;
    }

    out.into_bytes()
}

fn cell_mean(
    src: &Raster,
    xs: std::ops::Range<usize>,
    ys: std::ops::Range<usize>,
) -> [u8; 4] {
    let mut sum = [0u64; 3];
    let mut count = 0u64;
    for y in ys {
        for x in xs.clone() {
            let p = src.pixel(x, y);
            for c in 0..3 {
                sum[c] += p[c] as u64;
            }
            count += 1;
        }
    }
    [
        (sum[0] / count) as u8,
        (sum[1] / count) as u8,
        (sum[2] / count) as u8,
        255,
    ]
}
