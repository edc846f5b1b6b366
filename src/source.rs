//! Source image probing.
//!
//! Turns a file on disk into a [`SourceImage`]: raster sources get their
//! dimensions read from the file header (no full decode), SVG sources are
//! vector and get dimensions from the root element's `width`/`height`
//! attributes or its `viewBox`.
//!
//! The width-set builder never touches the filesystem; it consumes the
//! `SourceImage` this module produces.

use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unreadable image {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

/// Immutable description of a source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceImage {
    /// Opaque reference carried into descriptors and markup (path or URL).
    pub reference: String,
    pub kind: SourceKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceKind {
    /// Pixel-based source; always has positive dimensions and a format name
    /// such as `"JPEG"`.
    Raster {
        width: u32,
        height: u32,
        format: String,
    },
    /// Scalable source (SVG). Dimensions are whatever the document declares,
    /// which may be nothing.
    Vector {
        width: Option<u32>,
        height: Option<u32>,
    },
}

impl SourceImage {
    /// Construct a raster source from known metadata.
    pub fn raster(
        reference: impl Into<String>,
        width: u32,
        height: u32,
        format: impl Into<String>,
    ) -> Self {
        Self {
            reference: reference.into(),
            kind: SourceKind::Raster {
                width,
                height,
                format: format.into(),
            },
        }
    }

    /// Construct a vector source, with dimensions if declared.
    pub fn vector(reference: impl Into<String>, dimensions: Option<(u32, u32)>) -> Self {
        let (width, height) = match dimensions {
            Some((w, h)) => (Some(w), Some(h)),
            None => (None, None),
        };
        Self {
            reference: reference.into(),
            kind: SourceKind::Vector { width, height },
        }
    }

    pub fn is_raster(&self) -> bool {
        matches!(self.kind, SourceKind::Raster { .. })
    }

    /// Declared dimensions, when both are known.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self.kind {
            SourceKind::Raster { width, height, .. } => Some((width, height)),
            SourceKind::Vector { width, height } => width.zip(height),
        }
    }
}

/// Probe an image on disk, using its path as the reference.
pub fn probe(path: &Path) -> Result<SourceImage, SourceError> {
    probe_with_reference(path, &path.to_string_lossy())
}

/// Probe an image on disk with an explicit reference (e.g. its public URL).
pub fn probe_with_reference(path: &Path, reference: &str) -> Result<SourceImage, SourceError> {
    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

    if is_svg {
        let content = fs::read_to_string(path)?;
        let dims = svg_dimensions(&content, path)?;
        return Ok(SourceImage::vector(reference, dims));
    }

    let (width, height) = image::image_dimensions(path).map_err(|e| SourceError::Unreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let format = image::ImageFormat::from_path(path)
        .map(|f| format!("{f:?}").to_uppercase())
        .unwrap_or_else(|_| "UNKNOWN".to_string());
    Ok(SourceImage::raster(reference, width, height, format))
}

/// Extract declared dimensions from SVG text.
///
/// Prefers the root element's `width`/`height` attributes; when either is
/// missing, falls back to the third and fourth `viewBox` values. Returns
/// `None` when neither yields a usable pair (e.g. percentage lengths).
fn svg_dimensions(content: &str, path: &Path) -> Result<Option<(u32, u32)>, SourceError> {
    let doc = roxmltree::Document::parse(content).map_err(|e| SourceError::Unreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let root = doc.root_element();

    let width = root.attribute("width").and_then(parse_svg_length);
    let height = root.attribute("height").and_then(parse_svg_length);
    if let (Some(w), Some(h)) = (width, height) {
        return Ok(Some((w, h)));
    }

    Ok(root
        .attribute("viewBox")
        .and_then(parse_view_box)
        .map(|(w, h)| (w, h)))
}

/// Parse an SVG length attribute to pixels. Accepts bare numbers and `px`
/// units; relative units (`%`, `em`, ...) yield `None`.
fn parse_svg_length(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    let trimmed = trimmed.strip_suffix("px").unwrap_or(trimmed);
    let n: f64 = trimmed.trim().parse().ok()?;
    (n > 0.0).then(|| n.round() as u32)
}

/// Width and height from a `viewBox="min-x min-y width height"` attribute.
fn parse_view_box(value: &str) -> Option<(u32, u32)> {
    let mut parts = value.split([' ', ',']).filter(|s| !s.is_empty());
    let _min_x = parts.next()?;
    let _min_y = parts.next()?;
    let w: f64 = parts.next()?.parse().ok()?;
    let h: f64 = parts.next()?.parse().ok()?;
    (w > 0.0 && h > 0.0).then(|| (w.round() as u32, h.round() as u32))
}
