use std::ops::Range;

/// A half-open range of image rows `[start, end)` owned by one job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Band {
    pub start: usize,
    pub end: usize,
}

impl Band {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, y: usize) -> bool {
        (self.start..self.end).contains(&y)
    }

    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Number of bands actually used: the request clamped to `[1, height]`.
pub fn effective_workers(height: usize, requested: usize) -> usize {
    requested.clamp(1, height.max(1))
}

/// Splits `height` rows into contiguous bands for `requested` workers.
///
/// Every band but the last spans `height / n` rows; the last one also
/// absorbs the `height % n` remainder. The bands cover `[0, height)`
/// exactly once, in ascending order.
pub fn partition(height: usize, requested: usize) -> Vec<Band> {
    if height == 0 {
        return Vec::new();
    }
    let n = effective_workers(height, requested);
    let size = height / n;
    (0..n)
        .map(|i| {
            let start = i * size;
            let end = if i == n - 1 { height } else { start + size };
            Band::new(start, end)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::zero_requested(10, 0, 1)]
    #[case::one(10, 1, 1)]
    #[case::exact(10, 5, 5)]
    #[case::more_than_rows(3, 64, 3)]
    #[case::single_row(1, 8, 1)]
    fn test_effective_workers(
        #[case] height: usize,
        #[case] requested: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(effective_workers(height, requested), expected);
    }

    #[test]
    fn test_remainder_goes_to_last_band() {
        let bands = partition(10, 3);
        assert_eq!(
            bands,
            vec![Band::new(0, 3), Band::new(3, 6), Band::new(6, 10)]
        );
    }

    #[test]
    fn test_more_workers_than_rows_gives_one_row_each() {
        let bands = partition(3, 10);
        assert_eq!(
            bands,
            vec![Band::new(0, 1), Band::new(1, 2), Band::new(2, 3)]
        );
    }

    #[test]
    fn test_zero_height_yields_no_bands() {
        assert!(partition(0, 4).is_empty());
    }

    #[test]
    fn test_bands_cover_every_row_exactly_once() {
        for height in 1..=1000usize {
            for requested in 0..=64usize {
                let bands = partition(height, requested);
                assert_eq!(bands.len(), requested.clamp(1, height));

                let mut next = 0;
                for band in &bands {
                    assert_eq!(band.start, next, "gap or overlap at h={height} w={requested}");
                    assert!(!band.is_empty());
                    next = band.end;
                }
                assert_eq!(next, height);

                let first_len = bands[0].len();
                for band in &bands[..bands.len() - 1] {
                    assert_eq!(band.len(), first_len);
                }
            }
        }
    }

    #[test]
    fn test_band_contains_is_half_open() {
        let band = Band::new(2, 5);
        assert!(band.contains(2));
        assert!(band.contains(4));
        assert!(!band.contains(5));
        assert_eq!(band.rows().count(), 3);
    }
}
