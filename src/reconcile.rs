//! Reconciling the image directory against the post index.
//!
//! Every `.jpg`/`.jpeg` file under the image source directory should be
//! referenced by some post. Images that aren't get a placeholder post so they
//! show up in the feed straight away and can be written up later.
//!
//! ## Discovery order
//!
//! Filesystem enumeration order is platform dependent, so unregistered images
//! are collected into a set ordered by filename. Placeholders are then
//! prepended in reverse of that order: with camera-style names
//! (`IMG_0041.jpg`, `IMG_0042.jpg`) the newest shot lands at the top.
//!
//! Only the base filename is compared and registered. An image in a nested
//! directory is registered under its bare name, and two nested images with the
//! same name collapse into one entry.

use crate::types::PostIndex;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Failed to scan image directory {path}: {source}")]
    Scan {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// Extensions picked up by the scan. Matched case-sensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Filenames already claimed by a post.
pub fn registered_images(index: &PostIndex) -> HashSet<&str> {
    index.posts.iter().map(|p| p.image.as_str()).collect()
}

/// Image filenames under `images_dir` that no post references, sorted.
///
/// Any error while walking the tree aborts the scan.
pub fn find_unregistered(
    index: &PostIndex,
    images_dir: &Path,
) -> Result<Vec<String>, ReconcileError> {
    let used = registered_images(index);
    let mut unused = BTreeSet::new();

    for entry in WalkDir::new(images_dir) {
        let entry = entry.map_err(|source| ReconcileError::Scan {
            path: images_dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() || !is_candidate(entry.path()) {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            log::warn!("skipping non UTF-8 filename {}", entry.path().display());
            continue;
        };
        if !used.contains(name) {
            log::debug!("unregistered image {}", entry.path().display());
            unused.insert(name.to_string());
        }
    }

    Ok(unused.into_iter().collect())
}

/// Register every unreferenced image as a placeholder post.
///
/// Returns the newly registered filenames in the order they now appear in
/// the index. The index is only modified in memory; persisting it is up to
/// the caller.
pub fn reconcile(
    index: &mut PostIndex,
    images_dir: &Path,
) -> Result<Vec<String>, ReconcileError> {
    let unused = find_unregistered(index, images_dir)?;
    index.prepend_placeholders(&unused);
    Ok(unused.into_iter().rev().collect())
}

fn is_candidate(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e))
}
