//! Decoding through the `image` crate.

use std::path::Path;

use image::error::{ImageError, UnsupportedErrorKind};
use image::{DynamicImage, ImageReader};
use pixview_core::{PixelData, Rgba16Buffer, SourceBuffer, normalize_to_rgba16};
use tracing::debug;

use crate::{IoError, IoResult};

/// File extensions the decoder recognizes, lowercase, without the dot.
pub fn supported_extensions() -> &'static [&'static str] {
    &[
        "png", "jpg", "jpeg", "tif", "tiff", "exr", "hdr", "webp", "bmp", "gif", "tga",
    ]
}

/// `true` if the extension of `path` is in [`supported_extensions`].
pub fn is_supported<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .is_some_and(|e| supported_extensions().contains(&e.as_str()))
}

/// Decodes a file, keeping its native sample precision.
pub fn decode_source<P: AsRef<Path>>(path: P) -> IoResult<SourceBuffer> {
    let path = path.as_ref();
    let reader = ImageReader::open(path)?
        .with_guessed_format()
        .map_err(IoError::Io)?;

    let format = reader.format();
    // once the file is open, every failure belongs to the decoder
    let img = reader.decode().map_err(|e| match e {
        ImageError::Unsupported(u) if matches!(u.kind(), UnsupportedErrorKind::Format(_)) => {
            IoError::UnsupportedFormat(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            )
        }
        other => IoError::read(path, other.to_string()),
    })?;

    debug!(
        path = %path.display(),
        format = ?format,
        width = img.width(),
        height = img.height(),
        "decoded"
    );
    dynamic_to_source(img)
}

/// Decodes a file into the 16-bit RGBA layout the viewport displays.
pub fn decode<P: AsRef<Path>>(path: P) -> IoResult<Rgba16Buffer> {
    let source = decode_source(path)?;
    Ok(normalize_to_rgba16(&source))
}

fn dynamic_to_source(img: DynamicImage) -> IoResult<SourceBuffer> {
    let (width, height) = (img.width(), img.height());

    let (channels, data) = match img {
        DynamicImage::ImageLuma8(buf) => (1, PixelData::U8(buf.into_raw())),
        DynamicImage::ImageLumaA8(buf) => (2, PixelData::U8(buf.into_raw())),
        DynamicImage::ImageRgb8(buf) => (3, PixelData::U8(buf.into_raw())),
        DynamicImage::ImageRgba8(buf) => (4, PixelData::U8(buf.into_raw())),
        DynamicImage::ImageLuma16(buf) => (1, PixelData::U16(buf.into_raw())),
        DynamicImage::ImageLumaA16(buf) => (2, PixelData::U16(buf.into_raw())),
        DynamicImage::ImageRgb16(buf) => (3, PixelData::U16(buf.into_raw())),
        DynamicImage::ImageRgba16(buf) => (4, PixelData::U16(buf.into_raw())),
        DynamicImage::ImageRgb32F(buf) => (3, PixelData::F32(buf.into_raw())),
        DynamicImage::ImageRgba32F(buf) => (4, PixelData::F32(buf.into_raw())),
        // Future layouts go through 16-bit RGBA
        other => (4, PixelData::U16(other.to_rgba16().into_raw())),
    };

    Ok(SourceBuffer::new(width, height, channels, data)?)
}
