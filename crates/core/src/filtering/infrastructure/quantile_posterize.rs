use crate::filtering::domain::filter::QuantileLevels;
use crate::parallel::domain::band::Band;
use crate::shared::raster::{BandBuffer, Raster};

pub type Lut = [u8; 256];

/// One lookup table per colour channel, built from the whole image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelLuts {
    pub red: Lut,
    pub green: Lut,
    pub blue: Lut,
}

impl ChannelLuts {
    /// Sorts each channel's values over every pixel and derives its LUT.
    pub fn from_raster(src: &Raster, levels: QuantileLevels) -> Self {
        let n = src.pixel_count();
        let mut channels = [
            Vec::with_capacity(n),
            Vec::with_capacity(n),
            Vec::with_capacity(n),
        ];
        for p in src.data().chunks_exact(4) {
            for c in 0..3 {
                channels[c].push(p[c]);
            }
        }
        let [mut red, mut green, mut blue] = channels;
        red.sort_unstable();
        green.sort_unstable();
        blue.sort_unstable();

        Self {
            red: build_quantile_lut(&red, levels.get()),
            green: build_quantile_lut(&green, levels.get()),
            blue: build_quantile_lut(&blue, levels.get()),
        }
    }
}

/// Maps raw values to quantile representatives.
///
/// `sorted` is split into `levels` contiguous bins of near-equal population
/// (`[i·n/levels, (i+1)·n/levels)`, the last bin taking the remainder). Each
/// bin is represented by the integer mean of its members, and a raw value
/// maps to the first bin whose largest member is at least that value.
/// More levels than values collapse to one bin per value.
pub fn build_quantile_lut(sorted: &[u8], levels: usize) -> Lut {
    let mut lut = [0u8; 256];
    let n = sorted.len();
    if n == 0 || levels < 2 {
        for (v, slot) in lut.iter_mut().enumerate() {
            *slot = v as u8;
        }
        return lut;
    }
    let levels = levels.min(n);

    let mut representatives = Vec::with_capacity(levels);
    let mut bin_max = Vec::with_capacity(levels);
    for b in 0..levels {
        let start = b * n / levels;
        let end = if b == levels - 1 { n } else { (b + 1) * n / levels };
        let bin = &sorted[start..end];
        let sum: u64 = bin.iter().map(|&v| v as u64).sum();
        representatives.push((sum / bin.len() as u64) as u8);
        bin_max.push(bin[bin.len() - 1]);
    }

    let mut b = 0;
    for (v, slot) in lut.iter_mut().enumerate() {
        while b < levels - 1 && v as u8 > bin_max[b] {
            b += 1;
        }
        *slot = representatives[b];
    }
    lut
}

/// Applies the per-channel LUTs; alpha passes through unchanged.
pub fn posterize_band(src: &Raster, band: Band, luts: &ChannelLuts) -> Vec<u8> {
    let width = src.width() as usize;
    let mut out = BandBuffer::new(src.width(), band);
    for y in band.rows() {
        for x in 0..width {
            let [r, g, b, a] = src.pixel(x, y);
            out.put(
                x,
                y,
                [
                    luts.red[r as usize],
                    luts.green[g as usize],
                    luts.blue[b as usize],
                    a,
                ],
            );
        }
    }
    out.into_bytes()
}
