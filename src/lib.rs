//! # lazy-srcset
//!
//! Responsive image srcset planning. Given a source image and a named
//! configuration, lazy-srcset derives a deduplicated, descending list of
//! target widths, maps each to a variant descriptor, and emits the
//! `srcset`/`sizes`/`width`/`height` attributes a responsive `<img>` needs.
//! Variants themselves are produced lazily, by name-registered generators,
//! under deterministic file names, so repeated renders address the same
//! variants instead of minting new ones.
//!
//! # Architecture: Plan, Then Generate
//!
//! Planning and generation are separate stages:
//!
//! ```text
//! 1. Probe     file       →  SourceImage       (dimensions, raster/vector)
//! 2. Resolve   name       →  SrcsetConfig      (breakpoints + defaults)
//! 3. Build     source+cfg →  [VariantDescriptor]  (the plan; pure)
//! 4. Render    plan       →  <img> attributes  (maud markup)
//! 5. Generate  descriptor →  bytes on disk     (on demand, cacheable)
//! ```
//!
//! Steps 2 and 3 are pure functions: no I/O, no shared mutable state, safe
//! to call concurrently without locking. That purity is what makes the
//! whole scheme lazy: a page render only computes names; pixels move when
//! a generator is actually asked for a variant that doesn't exist yet.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `srcset.toml` loading, named configs, defaults merge, validation |
//! | [`source`] | Source probing: raster header reads, SVG width/height/viewBox |
//! | [`srcset`] | The planner: width math, threshold dedup, descriptor emission |
//! | [`generator`] | `VariantGenerator` trait + named registry |
//! | [`resize`] | Built-in `"resize"` generator (Lanczos3 + JPEG/PNG/WebP encode) |
//! | [`markup`] | Maud `<img>` rendering: srcset, sizes, SVG role, disabled mode |
//! | [`cache`] | Deterministic variant names (key hash) and orphan cleanup |
//!
//! # Design Decisions
//!
//! ## Never Upscale
//!
//! Every planned width is clamped to the source width (and to the config's
//! `max_width` below that). Upscaling produces larger files with no quality
//! gain, so the clamp is unconditional, and the largest variant is always
//! exactly the effective bound.
//!
//! ## Threshold Deduplication
//!
//! Breakpoint sets and per-call hints routinely produce near-duplicate
//! widths (1024 next to 1020 helps nobody). Candidates within `threshold`
//! pixels of the last kept width collapse into it, larger widths winning.
//! `threshold = 0` keeps every distinct width.
//!
//! ## Descriptors Are Keys
//!
//! A [`srcset::VariantDescriptor`] is identified by `(source, width,
//! generator)`; height is derived, not identity. File names embed a hash
//! of the full variant key, so caching, cleanup and concurrent generation
//! all converge on the same names without coordination.
//!
//! ## SVG Is Lazy Already
//!
//! Vector sources scale by themselves, so they bypass the width pipeline
//! entirely: one descriptor with the document's declared dimensions, and
//! markup with `role="img"` for screen readers. No variants are generated
//! for them.

pub mod cache;
pub mod config;
pub mod generator;
pub mod markup;
pub mod resize;
pub mod source;
pub mod srcset;
