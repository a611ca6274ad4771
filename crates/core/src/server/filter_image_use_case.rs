use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::filtering::domain::filter::Filter;
use crate::filtering::infrastructure::filter_engine::FilterEngine;
use crate::imaging::domain::image_format::ImageFormat;
use crate::imaging::infrastructure::image_codec;
use crate::server::domain::dispatch_error::DispatchError;
use crate::shared::constants::available_parallelism;

/// An encoded output image plus what it took to compute it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilteredImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    /// Filter computation only; decode and encode are excluded.
    pub elapsed: Duration,
}

/// Single-image filtering: decode → resolve filter → apply → re-encode.
pub struct FilterImageUseCase {
    engine: FilterEngine,
    default_workers: usize,
}

impl FilterImageUseCase {
    /// `default_workers` of zero defers to the machine's parallelism.
    pub fn new(engine: FilterEngine, default_workers: usize) -> Self {
        Self {
            engine,
            default_workers,
        }
    }

    /// Band count for a requested worker value. Non-positive requests fall
    /// back to the configured default; positive ones pass through and are
    /// clamped to the image height later.
    pub fn effective_workers(&self, requested: i32) -> usize {
        if requested > 0 {
            requested as usize
        } else if self.default_workers > 0 {
            self.default_workers
        } else {
            available_parallelism()
        }
    }

    pub fn execute(
        &self,
        filter_name: &str,
        param: i32,
        workers: i32,
        image: &[u8],
    ) -> Result<FilteredImage, DispatchError> {
        let (raster, format) = image_codec::decode(image)?;
        let filter = Filter::resolve(filter_name, param)?;
        let workers = self.effective_workers(workers);
        let (width, height) = (raster.width(), raster.height());

        let started = Instant::now();
        let output = self.engine.apply(filter, Arc::new(raster), workers)?;
        let elapsed = started.elapsed();

        let bytes = image_codec::encode(&output, format)?;
        log::debug!(
            "{} on {}x{} {} with {} worker(s) took {:?}",
            filter.name(),
            width,
            height,
            format,
            workers,
            elapsed
        );

        Ok(FilteredImage {
            bytes,
            format,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::domain::filter::FilterError;
    use crate::imaging::infrastructure::image_codec::ImageCodecError;
    use crate::parallel::infrastructure::inline_executor::InlineExecutor;
    use crate::shared::raster::Raster;
    use rstest::rstest;

    fn use_case(default_workers: usize) -> FilterImageUseCase {
        FilterImageUseCase::new(FilterEngine::new(Arc::new(InlineExecutor)), default_workers)
    }

    fn png(raster: &Raster) -> Vec<u8> {
        image_codec::encode(raster, ImageFormat::Png).unwrap()
    }

    #[rstest]
    #[case::positive_verbatim(6, 3, 6)]
    #[case::zero_uses_default(0, 3, 3)]
    #[case::negative_uses_default(-4, 5, 5)]
    fn test_effective_workers(#[case] requested: i32, #[case] default: usize, #[case] expected: usize) {
        assert_eq!(use_case(default).effective_workers(requested), expected);
    }

    #[test]
    fn test_effective_workers_without_default_uses_parallelism() {
        assert_eq!(use_case(0).effective_workers(0), available_parallelism());
    }

    #[test]
    fn test_invert_png() {
        let red = Raster::filled(2, 2, [255, 0, 0, 255]);
        let result = use_case(0).execute("invert", 0, 4, &png(&red)).unwrap();
        assert_eq!(result.format, ImageFormat::Png);

        let (decoded, _) = image_codec::decode(&result.bytes).unwrap();
        assert_eq!(decoded, Raster::filled(2, 2, [0, 255, 255, 255]));
    }

    #[test]
    fn test_output_keeps_input_format() {
        let src = Raster::filled(4, 4, [10, 20, 30, 255]);
        let gif = image_codec::encode(&src, ImageFormat::Gif).unwrap();
        let result = use_case(2).execute("grayscale", 0, 0, &gif).unwrap();
        assert_eq!(image_codec::sniff_format(&result.bytes).unwrap(), ImageFormat::Gif);
    }

    #[test]
    fn test_unknown_filter() {
        let src = Raster::filled(2, 2, [0, 0, 0, 255]);
        let err = use_case(0).execute("foo", 0, 1, &png(&src)).unwrap_err();
        assert!(matches!(err, DispatchError::Filter(FilterError::Unknown { .. })));
        assert!(err.to_string().contains("posterizequantilescolor"));
    }

    #[test]
    fn test_undecodable_image() {
        let err = use_case(0).execute("invert", 0, 1, b"not an image").unwrap_err();
        assert!(matches!(err, DispatchError::Image(ImageCodecError::UnsupportedFormat)));
    }
}
