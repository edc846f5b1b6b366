//! Built-in `"resize"` generator: pure Rust, zero external dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Resize | `image::DynamicImage::resize` with `Lanczos3` filter |
//! | Encode → JPEG / PNG / WebP | `image` codecs |
//!
//! The resize is a proportional fit: the target width constrains, the
//! aspect ratio is preserved, and nothing is ever upscaled by the planner.

use crate::config::OutputFormat;
use crate::generator::{GenerateParams, GeneratedImage, GeneratorError, VariantGenerator};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader};
use std::path::Path;

pub struct ResizeGenerator;

impl ResizeGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ResizeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn load_image(path: &Path) -> Result<DynamicImage, GeneratorError> {
    ImageReader::open(path)
        .map_err(GeneratorError::Io)?
        .decode()
        .map_err(|e| {
            GeneratorError::Failed(format!("failed to decode {}: {}", path.display(), e))
        })
}

/// Resolve the encode format: the explicit config format wins, else the
/// source extension decides.
fn output_format(params: &GenerateParams) -> Result<OutputFormat, GeneratorError> {
    if let Some(format) = params.format {
        return Ok(format);
    }
    params
        .source
        .extension()
        .and_then(|e| e.to_str())
        .and_then(OutputFormat::from_extension)
        .ok_or_else(|| {
            GeneratorError::Failed(format!(
                "no encodable format for {}",
                params.source.display()
            ))
        })
}

fn save_image(
    img: &DynamicImage,
    path: &Path,
    format: OutputFormat,
    quality: Option<u32>,
) -> Result<(), GeneratorError> {
    let file = std::fs::File::create(path).map_err(GeneratorError::Io)?;
    let writer = std::io::BufWriter::new(file);
    let encode_err =
        |e: image::ImageError| GeneratorError::Failed(format!("encode failed: {}", e));

    match format {
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = img.to_rgb8();
            let encoder = match quality {
                Some(q) => JpegEncoder::new_with_quality(writer, q as u8),
                None => JpegEncoder::new(writer),
            };
            encoder
                .write_image(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    ExtendedColorType::Rgb8,
                )
                .map_err(encode_err)
        }
        OutputFormat::Png => {
            let rgba = img.to_rgba8();
            PngEncoder::new(writer)
                .write_image(
                    rgba.as_raw(),
                    rgba.width(),
                    rgba.height(),
                    ExtendedColorType::Rgba8,
                )
                .map_err(encode_err)
        }
        OutputFormat::Webp => {
            // The image crate's WebP encoder is lossless; quality applies
            // to JPEG only.
            let rgba = img.to_rgba8();
            WebPEncoder::new_lossless(writer)
                .write_image(
                    rgba.as_raw(),
                    rgba.width(),
                    rgba.height(),
                    ExtendedColorType::Rgba8,
                )
                .map_err(encode_err)
        }
    }
}

impl VariantGenerator for ResizeGenerator {
    fn generate(&self, params: &GenerateParams) -> Result<GeneratedImage, GeneratorError> {
        let img = load_image(&params.source)?;
        // Proportional fit: the width constrains, the height bound stays
        // open unless the planner derived one.
        let resized = img.resize(
            params.width,
            params.height.unwrap_or(u32::MAX),
            FilterType::Lanczos3,
        );
        let format = output_format(params)?;
        save_image(
            &resized,
            &params.output,
            format,
            params.quality.map(|q| q.value()),
        )?;
        Ok(GeneratedImage {
            path: params.output.clone(),
            width: resized.width(),
            height: resized.height(),
        })
    }
}
