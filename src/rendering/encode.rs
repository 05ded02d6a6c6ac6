//! Image encoders for finished rasters.

use crate::{Error, Result};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use std::fmt;
use std::str::FromStr;

/// Default lossy quality for WebP and JPEG output.
pub const DEFAULT_QUALITY: u8 = 85;

/// Output container and, for lossy formats, the quality (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg(u8),
    WebP(u8),
}

impl OutputFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg(_) => "image/jpeg",
            OutputFormat::WebP(_) => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg(_) => "jpg",
            OutputFormat::WebP(_) => "webp",
        }
    }

    pub fn with_quality(self, quality: u8) -> Self {
        let q = quality.min(100);
        match self {
            OutputFormat::Png => OutputFormat::Png,
            OutputFormat::Jpeg(_) => OutputFormat::Jpeg(q),
            OutputFormat::WebP(_) => OutputFormat::WebP(q),
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::WebP(DEFAULT_QUALITY)
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg(DEFAULT_QUALITY)),
            "webp" => Ok(OutputFormat::WebP(DEFAULT_QUALITY)),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Encode `img` in `format`.
pub fn encode_image(img: &RgbaImage, format: OutputFormat) -> Result<Vec<u8>> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(Error::Encode(format!("cannot encode an empty {}x{} raster", w, h)));
    }
    let mut buf = Vec::new();
    match format {
        OutputFormat::Png => {
            image::codecs::png::PngEncoder::new(&mut buf).write_image(img.as_raw(), w, h, ExtendedColorType::Rgba8)?;
        }
        OutputFormat::Jpeg(quality) => {
            let rgb = image::DynamicImage::ImageRgba8(img.clone()).to_rgb8();
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
                .write_image(rgb.as_raw(), w, h, ExtendedColorType::Rgb8)?;
        }
        OutputFormat::WebP(quality) => {
            buf = encode_webp(img, quality)?;
        }
    }
    Ok(buf)
}

#[cfg(feature = "webp")]
fn encode_webp(img: &RgbaImage, quality: u8) -> Result<Vec<u8>> {
    let encoder = webp::Encoder::from_rgba(img.as_raw(), img.width(), img.height());
    let mem = encoder
        .encode_simple(false, quality.min(100) as f32)
        .map_err(|e| Error::Encode(format!("webp: {:?}", e)))?;
    Ok(mem.to_vec())
}

#[cfg(not(feature = "webp"))]
fn encode_webp(_img: &RgbaImage, _quality: u8) -> Result<Vec<u8>> {
    Err(Error::UnsupportedFormat("webp (built without the `webp` feature)".into()))
}
