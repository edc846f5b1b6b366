//! The variant descriptor: the unit of output of the width-set builder.

use serde::Serialize;
use std::hash::{Hash, Hasher};

/// One responsive rendition: the resolved width, height and generator for a
/// source image.
///
/// Descriptors are keys, not artifacts. The generation collaborator turns a
/// descriptor into bytes on demand; the markup layer turns an ordered
/// sequence of descriptors into `srcset`/`sizes` attributes.
#[derive(Debug, Clone, Eq, Serialize)]
pub struct VariantDescriptor {
    /// Opaque reference back to the source image (a path or URL).
    pub source: String,
    /// Target pixel width.
    pub width: u32,
    /// Target pixel height. `None` when the source has no known aspect
    /// ratio; the encoder determines it, or markup omits it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Id of the registered generator that will produce the bytes.
    pub generator: String,
}

// Identity is (source, width, generator). Height is derived from the width
// and the source aspect ratio, so it carries no extra information; two
// descriptors with equal tuples address the same variant.
impl PartialEq for VariantDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.width == other.width
            && self.generator == other.generator
    }
}

impl Hash for VariantDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.width.hash(state);
        self.generator.hash(state);
    }
}
