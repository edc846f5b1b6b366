//! `<img>` markup emission.
//!
//! Turns an ordered descriptor sequence into the attributes a responsive
//! `<img>` needs: `src`, `srcset`, `sizes`, `width`, `height`. Rendering
//! uses [maud](https://maud.lambda.xyz/): type-safe, auto-escaped, no
//! template files.
//!
//! Contract with the planner: descriptors arrive pre-sorted descending by
//! width and already deduplicated; this layer never re-sorts or re-filters
//! them. A single-element sequence renders as a plain `src` image; one
//! variant needs no srcset.
//!
//! URLs are the caller's concern: every rendering function takes a
//! `url_for` closure mapping a descriptor to the address where the
//! generation collaborator will serve it.

use crate::config::SrcsetConfig;
use crate::source::{SourceImage, SourceKind};
use crate::srcset::VariantDescriptor;
use maud::{Markup, html};

/// The `srcset` attribute: one `"{url} {width}w"` entry per variant.
pub fn srcset_attr<F>(descriptors: &[VariantDescriptor], url_for: F) -> String
where
    F: Fn(&VariantDescriptor) -> String,
{
    descriptors
        .iter()
        .map(|d| format!("{} {}w", url_for(d), d.width))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The `sizes` attribute from breakpoints and relative-width hints.
///
/// Media-conditioned entries come first, ascending by breakpoint, so each
/// condition gets a chance to match before a wider one swallows it; the
/// bare fallback (the largest breakpoint's relative width) goes last.
/// Hints align with the breakpoints sorted largest-first, the last hint
/// broadcasting down, exactly as in the width-set builder; without hints
/// every slot is `100vw`.
pub fn sizes_attr(breakpoints: &[u32], hints: Option<&[u32]>) -> String {
    let mut sorted: Vec<u32> = breakpoints.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.dedup();

    let hint_at = |i: usize| -> u32 {
        match hints {
            Some(hints) if !hints.is_empty() => {
                hints.get(i).copied().unwrap_or(*hints.last().unwrap())
            }
            _ => 100,
        }
    };

    let mut entries: Vec<String> = sorted
        .iter()
        .enumerate()
        .map(|(i, &bp)| format!("(max-width: {}px) {}vw", bp, hint_at(i)))
        .collect();
    entries.reverse();
    entries.push(format!("{}vw", hint_at(0)));
    entries.join(", ")
}

/// A responsive `<img>` element for a raster source.
///
/// The first (largest) descriptor provides `src`, `width` and `height`.
/// With a single descriptor the responsive attributes are omitted
/// entirely.
pub fn img_markup<F>(
    descriptors: &[VariantDescriptor],
    config: &SrcsetConfig,
    hints: Option<&[u32]>,
    alt: &str,
    url_for: F,
) -> Markup
where
    F: Fn(&VariantDescriptor) -> String,
{
    let Some(largest) = descriptors.first() else {
        return html! {};
    };
    if descriptors.len() == 1 {
        return html! {
            img src=(url_for(largest))
                width=(largest.width)
                height=[largest.height]
                alt=(alt);
        };
    }
    html! {
        img src=(url_for(largest))
            srcset=(srcset_attr(descriptors, &url_for))
            sizes=(sizes_attr(&config.breakpoints, hints))
            width=(largest.width)
            height=[largest.height]
            alt=(alt);
    }
}

/// An `<img>` element for an SVG source.
///
/// SVG scales by itself, so no srcset is needed; `role="img"` helps screen
/// readers announce it as an image. Width and height are emitted only when
/// both are declared by the document.
pub fn svg_markup(source: &SourceImage, url: &str, alt: &str) -> Markup {
    let dims = match source.kind {
        SourceKind::Vector { width, height } => width.zip(height),
        SourceKind::Raster { width, height, .. } => Some((width, height)),
    };
    html! {
        img src=(url)
            role="img"
            width=[dims.map(|d| d.0)]
            height=[dims.map(|d| d.1)]
            alt=(alt);
    }
}

/// The disabled-mode fallback: a plain image straight from the source, no
/// srcset and no generation.
pub fn plain_markup(source: &SourceImage, url: &str, alt: &str) -> Markup {
    let dims = source.dimensions();
    html! {
        img src=(url)
            width=[dims.map(|d| d.0)]
            height=[dims.map(|d| d.1)]
            alt=(alt);
    }
}
