//! Variant file naming and orphan cleanup.
//!
//! Generated variants are **content-keyed**: the file name embeds a hash of
//! the full variant key `(source reference, width, generator, quality,
//! format)`. Because the planner is deterministic, repeated renders address
//! the same file names: generation collaborators can skip work when the
//! file already exists, and concurrent requests for the same variant
//! converge on one path.
//!
//! ## Naming
//!
//! ```text
//! photo.jpg  →  photo.3f2a9c41d7b0.webp
//!               \___/ \__________/ \__/
//!               stem   key hash     target ext
//! ```
//!
//! The stem ties a variant back to its source, which is what makes
//! [`cleanup`] possible: walk the variant directory, strip the hash
//! segment, and delete variants whose source no longer exists.

use crate::config::OutputFormat;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Hex length of the key hash embedded in variant file names.
const HASH_LEN: usize = 12;

/// Everything that affects the bytes of one generated variant.
///
/// This is the caching contract: two requests with equal keys must produce
/// (and may share) the same file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantKey<'a> {
    pub source: &'a str,
    pub width: u32,
    pub generator: &'a str,
    pub quality: Option<u32>,
    pub format: Option<OutputFormat>,
}

/// SHA-256 over the variant key, truncated to [`HASH_LEN`] hex chars.
pub fn hash_variant_key(key: &VariantKey) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.source.as_bytes());
    hasher.update(b"\0");
    hasher.update(key.width.to_le_bytes());
    hasher.update(key.generator.as_bytes());
    hasher.update(b"\0");
    match key.quality {
        Some(q) => {
            hasher.update(b"\x01");
            hasher.update(q.to_le_bytes());
        }
        None => hasher.update(b"\x00"),
    }
    match key.format {
        Some(f) => {
            hasher.update(b"\x01");
            hasher.update(f.extension().as_bytes());
        }
        None => hasher.update(b"\x00"),
    }
    let digest = format!("{:x}", hasher.finalize());
    digest[..HASH_LEN].to_string()
}

/// File name for a variant: `{stem}.{hash}.{ext}`.
///
/// The extension comes from the key's format when set, else from the source
/// path (format inheritance).
pub fn variant_file_name(source_path: &Path, key: &VariantKey) -> String {
    let stem = source_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    let ext = key
        .format
        .map(|f| f.extension().to_string())
        .unwrap_or_else(|| {
            source_path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_else(|| "img".to_string())
        });
    format!("{}.{}.{}", stem, hash_variant_key(key), ext)
}

/// Recover the source file stem from a variant file name by stripping the
/// hash segment. Returns `None` for names that don't follow the scheme.
pub fn source_stem(variant_name: &str) -> Option<&str> {
    let mut parts = variant_name.rsplitn(3, '.');
    let _ext = parts.next()?;
    let hash = parts.next()?;
    let stem = parts.next()?;
    (hash.len() == HASH_LEN && hash.chars().all(|c| c.is_ascii_hexdigit()) && !stem.is_empty())
        .then_some(stem)
}

/// Summary of a cleanup run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CleanupStats {
    pub scanned: u32,
    pub deleted: u32,
}

impl fmt::Display for CleanupStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} deleted ({} scanned)", self.deleted, self.scanned)
    }
}

/// Delete variants whose source no longer exists under `media_root`.
///
/// Walks `variant_dir`, skips files that don't follow the naming scheme,
/// and removes every variant whose recovered stem matches no file in
/// `media_root`. With `dry_run` nothing is removed; the returned list shows
/// what would go.
pub fn cleanup(
    variant_dir: &Path,
    media_root: &Path,
    dry_run: bool,
) -> io::Result<(CleanupStats, Vec<PathBuf>)> {
    let source_stems: HashSet<String> = WalkDir::new(media_root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            e.path()
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
        })
        .collect();

    let mut stats = CleanupStats::default();
    let mut removed = Vec::new();

    for entry in WalkDir::new(variant_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let name = entry.file_name().to_string_lossy();
        let Some(stem) = source_stem(&name) else {
            continue;
        };
        stats.scanned += 1;
        if !source_stems.contains(stem) {
            if !dry_run {
                std::fs::remove_file(entry.path())?;
            }
            stats.deleted += 1;
            removed.push(entry.path().to_path_buf());
        }
    }

    Ok((stats, removed))
}
