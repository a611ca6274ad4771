use std::sync::Arc;

use crate::filtering::domain::filter::{BlockSize, BlurRadius, BrushSize, Filter};
use crate::parallel::domain::band::{partition, Band};
use crate::parallel::domain::band_executor::{BandExecutor, BandJob, EngineError};
use crate::shared::raster::Raster;

use super::box_blur::box_blur_band;
use super::gaussian::gaussian_band;
use super::median::median_band;
use super::oil_paint::oil_paint_band;
use super::pixelate::pixelate_band;
use super::point_filters::{grayscale_band, invert_band};
use super::quantile_posterize::{posterize_band, ChannelLuts};
use super::sobel::sobel_band;

/// A filter ready to run on bands, with any whole-image pre-pass done.
enum BandPlan {
    Grayscale,
    Invert,
    BoxBlur(BlurRadius),
    Gaussian,
    Sobel,
    Median,
    Pixelate(BlockSize),
    OilPaint(BrushSize),
    Posterize(ChannelLuts),
}

impl BandPlan {
    fn prepare(filter: Filter, src: &Raster) -> Self {
        match filter {
            Filter::Grayscale => Self::Grayscale,
            Filter::Invert => Self::Invert,
            Filter::BoxBlur(radius) => Self::BoxBlur(radius),
            Filter::Gaussian => Self::Gaussian,
            Filter::Sobel => Self::Sobel,
            Filter::Median => Self::Median,
            Filter::Pixelate(block) => Self::Pixelate(block),
            Filter::OilPaint(brush) => Self::OilPaint(brush),
            Filter::PosterizeQuantiles(levels) => {
                Self::Posterize(ChannelLuts::from_raster(src, levels))
            }
        }
    }

    fn render(&self, src: &Raster, band: Band) -> Vec<u8> {
        match self {
            Self::Grayscale => grayscale_band(src, band),
            Self::Invert => invert_band(src, band),
            Self::BoxBlur(radius) => box_blur_band(src, band, *radius),
            Self::Gaussian => gaussian_band(src, band),
            Self::Sobel => sobel_band(src, band),
            Self::Median => median_band(src, band),
            Self::Pixelate(block) => pixelate_band(src, band, *block),
            Self::OilPaint(brush) => oil_paint_band(src, band, *brush),
            Self::Posterize(luts) => posterize_band(src, band, luts),
        }
    }
}

/// Applies filters by splitting the image into row bands and running one
/// job per band on the configured executor.
///
/// The source raster is shared read-only by every job; each job returns the
/// bytes of its own rows, and the output is stitched together in band
/// order once all of them have finished.
#[derive(Clone)]
pub struct FilterEngine {
    executor: Arc<dyn BandExecutor>,
}

impl FilterEngine {
    pub fn new(executor: Arc<dyn BandExecutor>) -> Self {
        Self { executor }
    }

    /// Runs `filter` over `source` with `workers` requested bands.
    ///
    /// `workers` is clamped to `[1, height]`. The result always has the
    /// same dimensions as the source.
    pub fn apply(
        &self,
        filter: Filter,
        source: Arc<Raster>,
        workers: usize,
    ) -> Result<Raster, EngineError> {
        let width = source.width();
        let height = source.height();
        let bands = partition(height as usize, workers);
        log::debug!(
            "Applying {} to {}x{} over {} band(s)",
            filter.name(),
            width,
            height,
            bands.len()
        );

        let plan = Arc::new(BandPlan::prepare(filter, &source));
        let jobs: Vec<BandJob> = bands
            .into_iter()
            .map(|band| {
                let plan = Arc::clone(&plan);
                let source = Arc::clone(&source);
                Box::new(move || plan.render(&source, band)) as BandJob
            })
            .collect();

        let outputs = self.executor.run_all(jobs)?;
        Ok(Raster::from_bands(width, height, outputs))
    }
}
