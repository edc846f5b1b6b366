//! Srcset configuration: named breakpoint sets resolved against defaults.
//!
//! Configuration lives in a single `srcset.toml` loaded once at startup into
//! an immutable [`ConfigRegistry`]. The registry holds the process-wide
//! defaults (`enabled`, `threshold`, `generator`) and a table of named
//! configs; [`ConfigRegistry::resolve`] merges a named config with the
//! defaults into a [`SrcsetConfig`] ready for the width-set builder.
//!
//! ## Config File
//!
//! ```toml
//! # Process-wide defaults
//! enabled = true
//! threshold = 69
//! generator = "resize"
//!
//! [configs.default]
//! # breakpoints is the only setting you must define
//! breakpoints = [1920, 1580, 1280, 1024, 640]
//! max_width = 2560
//! quality = 91
//! format = "webp"
//!
//! [configs.thumbnails]
//! breakpoints = [400, 200]
//! threshold = 20
//! ```
//!
//! ## Merge Policy
//!
//! Per-config values override the registry defaults, which override the
//! library built-ins (threshold 69, generator `"resize"`). `max_width`,
//! `quality` and `format` have no built-in default: absent means "inherit
//! from the source image" downstream.
//!
//! Unknown keys are rejected to catch typos early. Resolution is pure:
//! identical name and registry always yield an identical config.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unknown srcset config: {0:?}")]
    NotFound(String),
    #[error("config validation error: {0}")]
    Invalid(String),
}

/// Built-in default for the minimum width delta between two variants.
pub const DEFAULT_THRESHOLD: u32 = 69;

/// Built-in default generator id.
pub const DEFAULT_GENERATOR: &str = "resize";

/// Target encode format for generated variants.
///
/// Absent in config means the source format is inherited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    Webp,
}

impl OutputFormat {
    /// File extension used for generated variants.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
        }
    }

    /// Map a file extension to a format, case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "webp" => Some(OutputFormat::Webp),
            _ => None,
        }
    }
}

/// A named config as written in `srcset.toml`.
///
/// Only `breakpoints` is required (checked at resolve time, not parse time,
/// so the error can name the config). Everything else falls back to the
/// registry defaults or stays absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// Declared target pixel widths. Need not be sorted or unique.
    pub breakpoints: Vec<u32>,
    /// Cap on generated widths; clamped to the source width downstream.
    pub max_width: Option<u32>,
    /// Encoding quality (1-100). Absent lets the encoder choose.
    pub quality: Option<u32>,
    /// Target encode format. Absent inherits the source format.
    pub format: Option<OutputFormat>,
    /// Minimum width delta between two variants; overrides the registry
    /// default.
    pub threshold: Option<u32>,
    /// Generator id; overrides the registry default.
    pub generator: Option<String>,
}

/// Registry of named configs plus the process-wide defaults.
///
/// Loaded once at process start and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigRegistry {
    /// When false the markup layer emits plain `src` images and no variants
    /// are generated.
    pub enabled: bool,
    /// Default minimum width delta between two variants.
    pub threshold: u32,
    /// Default generator id for configs that don't name one.
    pub generator: String,
    /// Named configs, keyed by the name callers resolve.
    pub configs: BTreeMap<String, RawConfig>,
}

impl Default for ConfigRegistry {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DEFAULT_THRESHOLD,
            generator: DEFAULT_GENERATOR.to_string(),
            configs: BTreeMap::new(),
        }
    }
}

/// A fully resolved configuration, ready for the width-set builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SrcsetConfig {
    pub breakpoints: Vec<u32>,
    pub max_width: Option<u32>,
    pub quality: Option<u32>,
    pub format: Option<OutputFormat>,
    pub threshold: u32,
    pub generator: String,
}

impl ConfigRegistry {
    /// Parse a registry from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load the registry from a `srcset.toml` file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Add a named config, builder-style. Mainly for library users and tests.
    pub fn with_config(mut self, name: impl Into<String>, raw: RawConfig) -> Self {
        self.configs.insert(name.into(), raw);
        self
    }

    /// Resolve a named config against the registry defaults.
    ///
    /// Fails with [`ConfigError::NotFound`] for unregistered names and
    /// [`ConfigError::Invalid`] when the merged result is unusable (no
    /// breakpoints, zero breakpoint, quality out of range, zero max width).
    pub fn resolve(&self, name: &str) -> Result<SrcsetConfig, ConfigError> {
        let raw = self
            .configs
            .get(name)
            .ok_or_else(|| ConfigError::NotFound(name.to_string()))?;

        if raw.breakpoints.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "config {name:?} must declare at least one breakpoint"
            )));
        }
        if raw.breakpoints.contains(&0) {
            return Err(ConfigError::Invalid(format!(
                "config {name:?} breakpoints must be positive"
            )));
        }
        if let Some(q) = raw.quality
            && !(1..=100).contains(&q)
        {
            return Err(ConfigError::Invalid(format!(
                "config {name:?} quality must be 1-100, got {q}"
            )));
        }
        if raw.max_width == Some(0) {
            return Err(ConfigError::Invalid(format!(
                "config {name:?} max_width must be positive"
            )));
        }

        Ok(SrcsetConfig {
            breakpoints: raw.breakpoints.clone(),
            max_width: raw.max_width,
            quality: raw.quality,
            format: raw.format,
            threshold: raw.threshold.unwrap_or(self.threshold),
            generator: raw
                .generator
                .clone()
                .unwrap_or_else(|| self.generator.clone()),
        })
    }
}

/// Returns a fully-commented stock `srcset.toml` with all keys explained.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# lazy-srcset Configuration
# =========================
# Process-wide defaults live at the top level; named configs live under
# [configs.<name>]. Per-config values override the defaults.

# When false, markup falls back to a plain <img src> with width/height and
# no variants are generated. Useful during development.
enabled = true

# Minimum width difference (px) required between two generated variants.
# Candidates closer together than this collapse into the larger one.
threshold = 69

# Generator used for configs that don't name one. "resize" is the built-in
# proportional Lanczos3 resizer.
generator = "resize"

# ---------------------------------------------------------------------------
# Named configs, resolved by name, e.g. `lazy-srcset plan --config default`
# ---------------------------------------------------------------------------
[configs.default]
# breakpoints is the only setting you must define
breakpoints = [1920, 1580, 1280, 1024, 640]

# Cap on generated widths. Always clamped to the source image width; it's a
# good idea to set this so huge originals don't produce huge variants.
max_width = 2560

# Encoding quality (1-100). If not provided the encoder picks a default.
quality = 91

# Target format for generated variants: "jpeg", "png" or "webp".
# If not provided the source image format is used.
format = "webp"

# Per-config overrides of the process-wide defaults:
# threshold = 10
# generator = "resize"
"##
}
