//! Width-set construction: from breakpoints to an ordered variant plan.
//!
//! [`build`] is the entry point. It is pure (no I/O, no shared state), so
//! repeated calls with the same inputs return the same plan and concurrent
//! callers need no locking. Repeated page renders therefore address the same
//! cached variants instead of minting new ones.

use super::calculations::{
    apply_hints, clamp_candidates, dedupe_by_threshold, derive_height, effective_bound,
};
use super::descriptor::VariantDescriptor;
use crate::config::SrcsetConfig;
use crate::source::{SourceImage, SourceKind};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BuildError {
    #[error("invalid source image: {0}")]
    InvalidSource(String),
    #[error("relative width hint must be positive")]
    InvalidHint,
}

/// Resolve the variant plan for a source image under a config.
///
/// Raster sources go through the full pipeline: breakpoints are clamped to
/// the effective upper bound (config max width, never above the source
/// width), optionally scaled by relative-width hints, joined by the bound
/// itself, sorted descending and threshold-deduplicated. Each surviving
/// width becomes one descriptor with a height derived from the source
/// aspect ratio.
///
/// Vector sources are served as-is: a single descriptor carrying the
/// source's own declared dimensions, regardless of breakpoints, threshold
/// or max width. Vector sources without a declared width are rejected;
/// the markup layer renders those directly from the [`SourceImage`].
///
/// `hints` are percentages of the rendered width at each breakpoint,
/// aligned with the breakpoints sorted largest-first. Fewer hints than
/// breakpoints broadcast the last hint to the remaining slots; extra hints
/// are ignored; a zero hint is an error.
///
/// The returned sequence is strictly descending in width, never exceeds
/// the source width, and its largest entry always equals the effective
/// bound.
pub fn build(
    source: &SourceImage,
    config: &SrcsetConfig,
    hints: Option<&[u32]>,
) -> Result<Vec<VariantDescriptor>, BuildError> {
    if let Some(hints) = hints
        && hints.contains(&0)
    {
        return Err(BuildError::InvalidHint);
    }

    match source.kind {
        SourceKind::Vector { width, height } => {
            let width = width
                .filter(|&w| w > 0)
                .ok_or_else(|| BuildError::InvalidSource("vector source has no declared width".into()))?;
            Ok(vec![VariantDescriptor {
                source: source.reference.clone(),
                width,
                height,
                generator: config.generator.clone(),
            }])
        }
        SourceKind::Raster {
            width: source_width,
            height: source_height,
            ..
        } => {
            if source_width == 0 || source_height == 0 {
                return Err(BuildError::InvalidSource(format!(
                    "raster source has degenerate dimensions {source_width}x{source_height}"
                )));
            }

            let bound = effective_bound(source_width, config.max_width);

            let mut candidates = clamp_candidates(&config.breakpoints, bound);
            candidates.sort_unstable_by(|a, b| b.cmp(a));
            if let Some(hints) = hints {
                candidates = apply_hints(&candidates, hints);
            }

            // The largest rendered size must always be available, even when
            // no breakpoint lands on it exactly.
            candidates.push(bound);

            let mut candidates: Vec<u32> = candidates
                .into_iter()
                .map(|w| w.min(bound))
                .filter(|&w| w > 0)
                .collect();
            candidates.sort_unstable_by(|a, b| b.cmp(a));

            let widths = dedupe_by_threshold(&candidates, config.threshold);

            Ok(widths
                .into_iter()
                .map(|width| VariantDescriptor {
                    source: source.reference.clone(),
                    width,
                    height: Some(derive_height(width, source_width, source_height)),
                    generator: config.generator.clone(),
                })
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(breakpoints: Vec<u32>, max_width: Option<u32>, threshold: u32) -> SrcsetConfig {
        SrcsetConfig {
            breakpoints,
            max_width,
            quality: None,
            format: None,
            threshold,
            generator: "resize".into(),
        }
    }

    fn raster(width: u32, height: u32) -> SourceImage {
        SourceImage::raster("media/photo.jpg", width, height, "JPEG")
    }

    fn widths(descriptors: &[VariantDescriptor]) -> Vec<u32> {
        descriptors.iter().map(|d| d.width).collect()
    }

    // =========================================================================
    // Raster pipeline
    // =========================================================================

    #[test]
    fn bound_included_and_threshold_zero_keeps_all() {
        // max_width 2560 clamps to the 2000px source; the bound joins the
        // clamped breakpoints and with threshold 0 nothing collapses.
        let descriptors = build(
            &raster(2000, 1500),
            &config(vec![1920, 1580, 1280, 1024, 640], Some(2560), 0),
            None,
        )
        .unwrap();
        assert_eq!(widths(&descriptors), vec![2000, 1920, 1580, 1280, 1024, 640]);
    }

    #[test]
    fn small_source_collapses_to_single_descriptor() {
        // Both breakpoints clamp to the 800px source, then merge with the
        // bound into one variant.
        let descriptors = build(
            &raster(800, 600),
            &config(vec![1920, 1580], None, 10),
            None,
        )
        .unwrap();
        assert_eq!(widths(&descriptors), vec![800]);
        assert_eq!(descriptors[0].height, Some(600));
    }

    #[test]
    fn hints_scale_candidates() {
        let descriptors = build(
            &raster(2000, 1000),
            &config(vec![1200, 800, 400], None, 5),
            Some(&[25, 33, 50]),
        )
        .unwrap();
        // Scaled candidates [300, 264, 200] plus the bound 2000
        assert_eq!(widths(&descriptors), vec![2000, 300, 264, 200]);
        for pair in descriptors.windows(2) {
            assert!(pair[0].width - pair[1].width > 5);
        }
    }

    #[test]
    fn equal_breakpoints_collapse_even_at_threshold_zero() {
        let descriptors = build(
            &raster(1500, 1000),
            &config(vec![1000, 1000], None, 0),
            None,
        )
        .unwrap();
        assert_eq!(widths(&descriptors), vec![1500, 1000]);
    }

    #[test]
    fn equal_breakpoints_at_source_width_yield_one_variant() {
        let descriptors = build(
            &raster(1000, 800),
            &config(vec![1000, 1000], None, 0),
            None,
        )
        .unwrap();
        assert_eq!(widths(&descriptors), vec![1000]);
    }

    #[test]
    fn no_upscaling_past_source() {
        let descriptors = build(
            &raster(500, 400),
            &config(vec![1920, 1280, 640], Some(2560), 69),
            None,
        )
        .unwrap();
        assert!(descriptors.iter().all(|d| d.width <= 500));
        assert_eq!(widths(&descriptors), vec![500]);
    }

    #[test]
    fn max_width_caps_below_source() {
        let descriptors = build(
            &raster(4000, 3000),
            &config(vec![1920, 640], Some(1600), 0),
            None,
        )
        .unwrap();
        // 1920 clamps onto the 1600 bound and merges with it
        assert_eq!(widths(&descriptors), vec![1600, 640]);
    }

    #[test]
    fn bound_inclusion_with_single_breakpoint() {
        let descriptors = build(&raster(3000, 2000), &config(vec![1024], None, 69), None).unwrap();
        assert_eq!(widths(&descriptors), vec![3000, 1024]);

        let descriptors = build(
            &raster(3000, 2000),
            &config(vec![1024], Some(1024), 69),
            None,
        )
        .unwrap();
        assert_eq!(widths(&descriptors), vec![1024]);
    }

    #[test]
    fn heights_follow_aspect_ratio() {
        let descriptors = build(
            &raster(2000, 1500),
            &config(vec![1000, 500], None, 0),
            None,
        )
        .unwrap();
        let heights: Vec<Option<u32>> = descriptors.iter().map(|d| d.height).collect();
        assert_eq!(heights, vec![Some(1500), Some(750), Some(375)]);
    }

    #[test]
    fn descriptors_carry_generator_and_source() {
        let descriptors = build(&raster(1000, 800), &config(vec![640], None, 0), None).unwrap();
        for d in &descriptors {
            assert_eq!(d.generator, "resize");
            assert_eq!(d.source, "media/photo.jpg");
        }
    }

    #[test]
    fn build_is_deterministic() {
        let source = raster(2000, 1500);
        let cfg = config(vec![1920, 1280, 640], Some(2560), 69);
        let first = build(&source, &cfg, Some(&[50, 75])).unwrap();
        let second = build(&source, &cfg, Some(&[50, 75])).unwrap();
        assert_eq!(first, second);
        assert_eq!(widths(&first), widths(&second));
    }

    #[test]
    fn hints_inverting_order_are_resorted() {
        // A large hint on the small breakpoint inverts the natural order;
        // the final sort restores monotonicity before dedup.
        let descriptors = build(
            &raster(2000, 1000),
            &config(vec![1000, 400], Some(1000), 0),
            Some(&[30, 90]),
        )
        .unwrap();
        // candidates: 1000*30% = 300, 400*90% = 360, plus bound 1000
        assert_eq!(widths(&descriptors), vec![1000, 360, 300]);
    }

    #[test]
    fn hint_scaled_zero_width_is_dropped() {
        let descriptors = build(
            &raster(2000, 1000),
            &config(vec![1000, 1], Some(1000), 0),
            Some(&[100, 10]),
        )
        .unwrap();
        // 1 * 10% rounds to 0 and is discarded
        assert_eq!(widths(&descriptors), vec![1000]);
    }

    #[test]
    fn hints_above_100_clamp_back_to_bound() {
        let descriptors = build(
            &raster(1000, 800),
            &config(vec![800], None, 0),
            Some(&[150]),
        )
        .unwrap();
        // 800 * 150% = 1200 re-clamps to the 1000 bound and merges with it
        assert_eq!(widths(&descriptors), vec![1000]);
    }

    #[test]
    fn threshold_collapse_prefers_larger_width() {
        let descriptors = build(
            &raster(2000, 1000),
            &config(vec![1024, 1020, 640], Some(1024), 10),
            None,
        )
        .unwrap();
        assert_eq!(widths(&descriptors), vec![1024, 640]);
    }

    // =========================================================================
    // Vector path
    // =========================================================================

    #[test]
    fn vector_passthrough_ignores_config() {
        let svg = SourceImage::vector("static/logo.svg", Some((120, 60)));
        let descriptors = build(
            &svg,
            &config(vec![1920, 1580, 640], Some(2560), 69),
            Some(&[25, 50]),
        )
        .unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].width, 120);
        assert_eq!(descriptors[0].height, Some(60));
    }

    #[test]
    fn vector_without_width_is_invalid_source() {
        let svg = SourceImage::vector("static/logo.svg", None);
        assert!(matches!(
            build(&svg, &config(vec![640], None, 0), None),
            Err(BuildError::InvalidSource(_))
        ));
    }

    // =========================================================================
    // Failure modes
    // =========================================================================

    #[test]
    fn zero_hint_is_invalid() {
        let result = build(
            &raster(1000, 800),
            &config(vec![640], None, 0),
            Some(&[50, 0]),
        );
        assert_eq!(result, Err(BuildError::InvalidHint));
    }

    #[test]
    fn zero_width_source_is_invalid() {
        let result = build(&raster(0, 800), &config(vec![640], None, 0), None);
        assert!(matches!(result, Err(BuildError::InvalidSource(_))));
    }

    #[test]
    fn zero_height_source_is_invalid() {
        let result = build(&raster(800, 0), &config(vec![640], None, 0), None);
        assert!(matches!(result, Err(BuildError::InvalidSource(_))));
    }
}
