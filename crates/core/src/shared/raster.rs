use crate::parallel::domain::band::Band;

/// Bytes per pixel: R, G, B, A.
pub const CHANNELS: usize = 4;

/// An RGBA8 image: contiguous bytes in row-major order.
///
/// Format conversion happens at the codec boundary only; filters see
/// nothing but straight (non-premultiplied) RGBA pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Raster {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * CHANNELS,
            "data length must equal width * height * 4"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// A raster filled with one colour.
    #[cfg(test)]
    pub(crate) fn filled(width: u32, height: u32, pixel: [u8; 4]) -> Self {
        let count = (width as usize) * (height as usize);
        let data = pixel.iter().copied().cycle().take(count * CHANNELS).collect();
        Self::new(data, width, height)
    }

    /// Reassembles a raster from per-band row buffers given in band order.
    pub fn from_bands(width: u32, height: u32, bands: Vec<Vec<u8>>) -> Self {
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * CHANNELS);
        for band in bands {
            data.extend_from_slice(&band);
        }
        Self::new(data, width, height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width as usize + x) * CHANNELS
    }
}

/// Output buffer for one band of a filter call.
///
/// Owns exactly the rows `[band.start, band.end)` of the destination image,
/// zero-initialised, and is addressed with absolute image coordinates.
pub struct BandBuffer {
    data: Vec<u8>,
    width: usize,
    band: Band,
}

impl BandBuffer {
    pub fn new(width: u32, band: Band) -> Self {
        let width = width as usize;
        Self {
            data: vec![0; band.len() * width * CHANNELS],
            width,
            band,
        }
    }

    #[inline]
    pub fn put(&mut self, x: usize, y: usize, pixel: [u8; 4]) {
        debug_assert!(self.band.contains(y), "row {y} outside {:?}", self.band);
        let i = ((y - self.band.start) * self.width + x) * CHANNELS;
        self.data[i..i + CHANNELS].copy_from_slice(&pixel);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 16]; // 2x2x4
        let raster = Raster::new(data.clone(), 2, 2);
        assert_eq!(raster.width(), 2);
        assert_eq!(raster.height(), 2);
        assert_eq!(raster.pixel_count(), 4);
        assert_eq!(raster.data(), &data[..]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "data length must equal width * height * 4")]
    fn test_mismatched_data_length_panics_in_debug() {
        Raster::new(vec![0u8; 10], 2, 2);
    }

    #[test]
    fn test_pixel_access_is_row_major() {
        let mut data = vec![0u8; 2 * 3 * 4];
        // row=1, col=1
        data[(3 + 1) * 4..(3 + 1) * 4 + 4].copy_from_slice(&[1, 2, 3, 4]);
        let raster = Raster::new(data, 3, 2);
        assert_eq!(raster.pixel(1, 1), [1, 2, 3, 4]);
        assert_eq!(raster.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_filled_repeats_pixel() {
        let raster = Raster::filled(3, 2, [9, 8, 7, 6]);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(raster.pixel(x, y), [9, 8, 7, 6]);
            }
        }
    }

    #[test]
    fn test_band_buffer_uses_absolute_rows() {
        let mut buffer = BandBuffer::new(2, Band::new(3, 5));
        buffer.put(1, 4, [10, 20, 30, 40]);
        let bytes = buffer.into_bytes();
        assert_eq!(bytes.len(), 2 * 2 * 4);
        assert_eq!(&bytes[12..16], &[10, 20, 30, 40]);
        assert!(bytes[..12].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_from_bands_concatenates_in_order() {
        let top = vec![1u8; 2 * 4];
        let bottom = vec![2u8; 2 * 2 * 4];
        let raster = Raster::from_bands(2, 3, vec![top, bottom]);
        assert_eq!(raster.pixel(0, 0), [1, 1, 1, 1]);
        assert_eq!(raster.pixel(1, 2), [2, 2, 2, 2]);
    }
}
