//! Pure calculation functions for target width resolution.
//!
//! All functions here are pure and testable without any I/O or images.

/// Upper bound for generated widths.
///
/// The configured max width wins when it is smaller than the source; the
/// source width wins otherwise. Upscaling past the source produces larger
/// files with no quality gain, so no candidate may ever exceed it.
pub fn effective_bound(source_width: u32, max_width: Option<u32>) -> u32 {
    match max_width {
        Some(max) if max < source_width => max,
        _ => source_width,
    }
}

/// Clamp each breakpoint to the bound, discarding non-positive candidates.
pub fn clamp_candidates(breakpoints: &[u32], bound: u32) -> Vec<u32> {
    breakpoints
        .iter()
        .map(|&bp| bp.min(bound))
        .filter(|&w| w > 0)
        .collect()
}

/// Scale candidates by relative-width hints (percentages).
///
/// Candidates must arrive sorted descending; the hint at each index applies
/// to the candidate at the same index. When fewer hints than candidates are
/// supplied, the last hint is reused for the remaining (smaller) candidates.
/// Extra hints are ignored. Hints must be positive; the builder validates
/// them before calling.
///
/// # Examples
/// ```
/// # use lazy_srcset::srcset::apply_hints;
/// assert_eq!(apply_hints(&[1200, 800, 400], &[25, 33, 50]), vec![300, 264, 200]);
/// // Last hint broadcast to remaining candidates
/// assert_eq!(apply_hints(&[1200, 800, 400], &[50]), vec![600, 400, 200]);
/// ```
pub fn apply_hints(candidates: &[u32], hints: &[u32]) -> Vec<u32> {
    let Some(&last_hint) = hints.last() else {
        return candidates.to_vec();
    };
    candidates
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let hint = hints.get(i).copied().unwrap_or(last_hint);
            (w as f64 * hint as f64 / 100.0).round() as u32
        })
        .collect()
}

/// Collapse near-duplicate widths.
///
/// Input must be sorted descending. A candidate survives only when it sits
/// more than `threshold` below the last survivor, so of two widths that
/// collapse the larger one wins. The comparison is against the last *kept*
/// width, not the previous candidate. A threshold of 0 keeps every distinct
/// width; equal widths still collapse (a gap of 0 is not greater than 0).
pub fn dedupe_by_threshold(sorted: &[u32], threshold: u32) -> Vec<u32> {
    let mut kept: Vec<u32> = Vec::with_capacity(sorted.len());
    for &width in sorted {
        match kept.last() {
            Some(&last) if last - width <= threshold => {}
            _ => kept.push(width),
        }
    }
    kept
}

/// Height preserving the source aspect ratio at the given width.
pub fn derive_height(width: u32, source_width: u32, source_height: u32) -> u32 {
    (width as f64 * source_height as f64 / source_width as f64).round() as u32
}
