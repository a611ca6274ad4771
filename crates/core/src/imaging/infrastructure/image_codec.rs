use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};
use thiserror::Error;

use crate::imaging::domain::image_format::ImageFormat;
use crate::shared::constants::JPEG_QUALITY;
use crate::shared::raster::Raster;

#[derive(Debug, Error)]
pub enum ImageCodecError {
    #[error("unrecognized image format (expected jpeg, png or gif)")]
    UnsupportedFormat,
    #[error("failed to decode {format} image: {source}")]
    Decode {
        format: ImageFormat,
        #[source]
        source: image::ImageError,
    },
    #[error("image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
    #[error("failed to encode {format} image: {source}")]
    Encode {
        format: ImageFormat,
        #[source]
        source: image::ImageError,
    },
}

/// Detects the encoding from the leading magic bytes.
pub fn sniff_format(bytes: &[u8]) -> Result<ImageFormat, ImageCodecError> {
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Jpeg) => Ok(ImageFormat::Jpeg),
        Ok(image::ImageFormat::Png) => Ok(ImageFormat::Png),
        Ok(image::ImageFormat::Gif) => Ok(ImageFormat::Gif),
        _ => Err(ImageCodecError::UnsupportedFormat),
    }
}

/// Decodes JPEG/PNG/GIF bytes into straight RGBA8, reporting the format
/// that was detected.
pub fn decode(bytes: &[u8]) -> Result<(Raster, ImageFormat), ImageCodecError> {
    let format = sniff_format(bytes)?;
    let decoded = image::load_from_memory_with_format(bytes, to_image_format(format))
        .map_err(|source| ImageCodecError::Decode { format, source })?;

    let rgba = decoded.into_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ImageCodecError::Empty { width, height });
    }
    Ok((Raster::new(rgba.into_raw(), width, height), format))
}

/// Encodes a raster in `format`: JPEG at quality 95 (alpha dropped),
/// lossless RGBA PNG, or GIF with the encoder's quantized palette.
pub fn encode(raster: &Raster, format: ImageFormat) -> Result<Vec<u8>, ImageCodecError> {
    let (width, height) = (raster.width(), raster.height());
    let mut buf = Vec::new();

    let result = match format {
        ImageFormat::Png => PngEncoder::new(&mut buf).write_image(
            raster.data(),
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
        ImageFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(to_rgba_image(raster)).into_rgb8();
            JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY).write_image(
                rgb.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )
        }
        ImageFormat::Gif => {
            let mut encoder = GifEncoder::new(&mut buf);
            encoder.encode_frame(image::Frame::new(to_rgba_image(raster)))
        }
    };

    result.map_err(|source| ImageCodecError::Encode { format, source })?;
    Ok(buf)
}

fn to_rgba_image(raster: &Raster) -> RgbaImage {
    RgbaImage::from_fn(raster.width(), raster.height(), |x, y| {
        image::Rgba(raster.pixel(x as usize, y as usize))
    })
}

fn to_image_format(format: ImageFormat) -> image::ImageFormat {
    match format {
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Gif => image::ImageFormat::Gif,
    }
}
