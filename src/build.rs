//! One full build: reconcile the index, render the page, publish images.
//!
//! ```text
//! 1. Load      index.json                →  PostIndex
//! 2. Reconcile source/images vs. index   →  placeholders prepended, index.json rewritten
//! 3. Render    template + PostIndex      →  public/index.html
//! 4. Process   PostIndex + source/images →  public/images/*.jpg
//! ```
//!
//! Steps 1–3 and the creation of the image output directory are
//! all-or-nothing: the first error aborts the build and is returned as a
//! [`BuildError`]. Step 4 is best-effort per image and reports each outcome
//! in the [`BuildReport`].

use crate::config::PathsConfig;
use crate::imaging::{ImageBackend, RustBackend};
use crate::process::{self, ImageReport, ImageStatus, ProcessError};
use crate::reconcile::{self, ReconcileError};
use crate::render::{PageTemplate, RenderError};
use crate::types::{IndexError, PostIndex};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Process(#[from] ProcessError),
}

/// What a completed build did.
#[derive(Debug)]
pub struct BuildReport {
    /// Images registered as placeholder posts, in index order. Non-empty
    /// means the index file was rewritten.
    pub registered: Vec<String>,
    pub index_path: PathBuf,
    pub html_path: PathBuf,
    pub post_count: usize,
    /// One entry per post, in index order.
    pub images: Vec<ImageReport>,
}

impl BuildReport {
    pub fn index_rewritten(&self) -> bool {
        !self.registered.is_empty()
    }

    pub fn written(&self) -> usize {
        self.count(|s| matches!(s, ImageStatus::Written(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, ImageStatus::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.images.iter().filter(|r| r.is_failed()).count()
    }

    fn count(&self, pred: impl Fn(&ImageStatus) -> bool) -> usize {
        self.images.iter().filter(|r| pred(&r.status)).count()
    }
}

pub fn build(paths: &PathsConfig) -> Result<BuildReport, BuildError> {
    build_with_backend(&RustBackend::new(), paths)
}

/// Run a build with a specific image backend (allows testing with mock).
pub fn build_with_backend(
    backend: &impl ImageBackend,
    paths: &PathsConfig,
) -> Result<BuildReport, BuildError> {
    let mut index = PostIndex::load(&paths.index)?;
    log::debug!(
        "loaded {} posts from {}",
        index.len(),
        paths.index.display()
    );

    let registered = reconcile::reconcile(&mut index, &paths.images)?;
    if !registered.is_empty() {
        index.save(&paths.index)?;
        log::info!(
            "registered {} new image(s) in {}",
            registered.len(),
            paths.index.display()
        );
    }

    if index.is_empty() {
        log::warn!(
            "no posts in {} and no images under {}",
            paths.index.display(),
            paths.images.display()
        );
    }

    let template = PageTemplate::load(&paths.template)?;
    template.render_to_file(&index, &paths.output_html)?;

    let images = process::process_images(backend, &index, &paths.images, &paths.output_images)?;

    Ok(BuildReport {
        registered,
        index_path: paths.index.clone(),
        html_path: paths.output_html.clone(),
        post_count: index.len(),
        images,
    })
}

/// Dry run of the reconcile step: which images would be registered, in the
/// order they would appear at the top of the index. Nothing is written.
pub fn check(paths: &PathsConfig) -> Result<Vec<String>, BuildError> {
    let index = PostIndex::load(&paths.index)?;
    let mut unused = reconcile::find_unregistered(&index, &paths.images)?;
    unused.reverse();
    Ok(unused)
}
