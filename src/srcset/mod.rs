//! Breakpoint-to-width resolution and variant-set construction.
//!
//! The module is split into:
//! - **Calculations**: pure functions for width math (unit testable)
//! - **Builder**: [`build`], which turns a source, a resolved config and optional
//!   relative-width hints into the ordered descriptor sequence
//! - **Descriptor**: [`VariantDescriptor`], the output unit
//!
//! Everything here is pure and synchronous. Collaborators that do real work
//! (probing files, resizing pixels, rendering markup) live in the
//! [`source`](crate::source), [`generator`](crate::generator) and
//! [`markup`](crate::markup) modules.

mod builder;
mod calculations;
mod descriptor;

pub use builder::{BuildError, build};
pub use calculations::{
    apply_hints, clamp_candidates, dedupe_by_threshold, derive_height, effective_bound,
};
pub use descriptor::VariantDescriptor;
