//! The variant generation seam.
//!
//! The planner only ever carries an opaque generator id; this module maps
//! those ids to concrete [`VariantGenerator`] implementations through a
//! [`GeneratorRegistry`]. The registry is populated once at startup and
//! read-only afterwards. Every generator must be `Sync` so batch generation
//! can fan out across threads.
//!
//! [`GenerateParams`] describes *what* to produce, not *how*: the seam
//! between planning (which decides widths) and execution (which moves
//! pixels). This separation allows swapping generators (e.g. for testing
//! with a mock) without changing planning logic.

use crate::config::{OutputFormat, SrcsetConfig};
use crate::srcset::VariantDescriptor;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown generator: {0:?}")]
    Unknown(String),
    #[error("generation failed: {0}")]
    Failed(String),
}

/// Quality setting for lossy image encoding (1-100). Clamped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Full specification for producing one variant on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Target width; the generator must not exceed it.
    pub width: u32,
    /// Target height. `None` lets the width alone constrain the resize.
    pub height: Option<u32>,
    /// Encoding quality. `None` lets the encoder choose.
    pub quality: Option<Quality>,
    /// Encode format. `None` inherits the source format.
    pub format: Option<OutputFormat>,
}

impl GenerateParams {
    /// Combine a planned descriptor with its config into concrete params.
    pub fn from_descriptor(
        descriptor: &VariantDescriptor,
        config: &SrcsetConfig,
        source: &Path,
        output: &Path,
    ) -> Self {
        Self {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            width: descriptor.width,
            height: descriptor.height,
            quality: config.quality.map(Quality::new),
            format: config.format,
        }
    }
}

/// Dimensions and location of a generated variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// A strategy that turns a variant specification into encoded bytes on disk.
pub trait VariantGenerator: Send + Sync {
    fn generate(&self, params: &GenerateParams) -> Result<GeneratedImage, GeneratorError>;
}

/// Named generator registry.
///
/// Configs reference generators by id; markup and planning never resolve
/// the id themselves.
pub struct GeneratorRegistry {
    generators: HashMap<String, Box<dyn VariantGenerator>>,
}

impl GeneratorRegistry {
    /// An empty registry. Use [`GeneratorRegistry::with_builtins`] unless
    /// you are wiring custom generators only.
    pub fn new() -> Self {
        Self {
            generators: HashMap::new(),
        }
    }

    /// Registry with the built-in `"resize"` generator installed.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(
            crate::config::DEFAULT_GENERATOR,
            Box::new(crate::resize::ResizeGenerator::new()),
        );
        registry
    }

    pub fn register(&mut self, id: impl Into<String>, generator: Box<dyn VariantGenerator>) {
        self.generators.insert(id.into(), generator);
    }

    pub fn get(&self, id: &str) -> Result<&dyn VariantGenerator, GeneratorError> {
        self.generators
            .get(id)
            .map(|g| g.as_ref())
            .ok_or_else(|| GeneratorError::Unknown(id.to_string()))
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
