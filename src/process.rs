//! Publishing images into the output directory.
//!
//! Second half of a build. Every post's image is decoded, scaled to
//! [`TARGET_WIDTH`](crate::imaging::TARGET_WIDTH) and written as JPEG under
//! the output directory, keyed by its base filename.
//!
//! ## Skip rule
//!
//! If the destination file already exists the post is skipped outright:
//! nothing is decoded, and the existing file is never overwritten, even when
//! the source has changed since. Delete the output file to force a rebuild.
//!
//! ## Failures
//!
//! Per-image failures don't stop the loop. Each post yields an
//! [`ImageReport`]; the caller decides what to do with failures.

use crate::imaging::{BackendError, Dimensions, ImageBackend, ResizeParams};
use crate::types::PostIndex;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that stop image processing altogether.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateOutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors confined to a single post's image.
#[derive(Error, Debug)]
pub enum ItemError {
    #[error("Image name {0:?} has no file name component")]
    InvalidName(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Debug)]
pub enum ImageStatus {
    /// Decoded, resized and written.
    Written(Dimensions),
    /// Destination already present; left untouched.
    Skipped,
    Failed(ItemError),
}

/// Outcome for one post, in index order.
#[derive(Debug)]
pub struct ImageReport {
    /// `Post.image` as written in the index.
    pub image: String,
    /// Where the output was (or would have been) written.
    pub destination: Option<PathBuf>,
    pub status: ImageStatus,
}

impl ImageReport {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, ImageStatus::Failed(_))
    }
}

/// Materialize every post's image under `output_dir`.
///
/// Creates `output_dir` (and parents) first; that is the only fatal error.
pub fn process_images(
    backend: &impl ImageBackend,
    index: &PostIndex,
    source_dir: &Path,
    output_dir: &Path,
) -> Result<Vec<ImageReport>, ProcessError> {
    std::fs::create_dir_all(output_dir).map_err(|source| ProcessError::CreateOutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let reports = index
        .posts
        .iter()
        .map(|p| process_one(backend, &p.image, source_dir, output_dir))
        .collect();
    Ok(reports)
}

fn process_one(
    backend: &impl ImageBackend,
    image: &str,
    source_dir: &Path,
    output_dir: &Path,
) -> ImageReport {
    let Some(file_name) = Path::new(image).file_name() else {
        log::warn!("post image {image:?} has no file name, skipping");
        return ImageReport {
            image: image.to_string(),
            destination: None,
            status: ImageStatus::Failed(ItemError::InvalidName(image.to_string())),
        };
    };
    let destination = output_dir.join(file_name);

    if destination.exists() {
        log::debug!("{} exists, skipping", destination.display());
        return ImageReport {
            image: image.to_string(),
            destination: Some(destination),
            status: ImageStatus::Skipped,
        };
    }

    let params = ResizeParams::new(source_dir.join(image), &destination);
    let status = match backend.resize(&params) {
        Ok(dims) => {
            log::info!(
                "resized {} -> {} ({}x{})",
                image,
                destination.display(),
                dims.width,
                dims.height
            );
            ImageStatus::Written(dims)
        }
        Err(e) => {
            log::warn!("{e}");
            ImageStatus::Failed(e.into())
        }
    };

    ImageReport {
        image: image.to_string(),
        destination: Some(destination),
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::types::Post;
    use std::fs;
    use tempfile::TempDir;

    fn index_of(images: &[&str]) -> PostIndex {
        PostIndex {
            posts: images
                .iter()
                .map(|i| Post {
                    title: "T".to_string(),
                    caption: "C".to_string(),
                    image: i.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn creates_output_directory_with_parents() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("public/images/deep");

        let backend = MockBackend::new();
        let index = PostIndex::default();

        let reports = process_images(&backend, &index, tmp.path(), &output).unwrap();

        assert!(reports.is_empty());
        assert!(output.is_dir());
    }

    #[test]
    fn output_directory_blocked_by_file_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("images");
        fs::write(&output, b"").unwrap();

        let index = index_of(&["a.jpg"]);

        let result = process_images(&MockBackend::new(), &index, tmp.path(), &output);
        assert!(matches!(result, Err(ProcessError::CreateOutputDir { .. })));
    }

    #[test]
    fn processes_posts_in_index_order() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        let output = tmp.path().join("output");
        let backend = MockBackend::new();

        let index = index_of(&["b.jpg", "a.jpg"]);

        let reports = process_images(&backend, &index, &source, &output).unwrap();

        assert_eq!(backend.resized_sources(), vec!["b.jpg", "a.jpg"]);
        assert!(reports
            .iter()
            .all(|r| matches!(r.status, ImageStatus::Written(_))));
        assert_eq!(reports[0].destination, Some(output.join("b.jpg")));
    }

    #[test]
    fn source_keeps_subpath_destination_uses_base_name() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        let output = tmp.path().join("output");
        let backend = MockBackend::new();

        let index = index_of(&["2024/x.jpg"]);

        let reports = process_images(&backend, &index, &source, &output).unwrap();

        let ops = backend.get_operations();
        let RecordedOp::Resize {
            source: src,
            output: out,
            width,
        } = &ops[0];
        assert_eq!(Path::new(src), source.join("2024/x.jpg"));
        assert_eq!(Path::new(out), output.join("x.jpg"));
        assert_eq!(*width, 1440);
        assert_eq!(reports[0].destination, Some(output.join("x.jpg")));
    }

    #[test]
    fn existing_destination_is_skipped_without_decoding() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("output");
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("a.jpg"), b"already here").unwrap();
        let backend = MockBackend::new();
        let index = index_of(&["a.jpg", "b.jpg"]);

        let reports = process_images(&backend, &index, tmp.path(), &output).unwrap();

        assert!(matches!(reports[0].status, ImageStatus::Skipped));
        assert!(matches!(reports[1].status, ImageStatus::Written(_)));
        assert_eq!(backend.resized_sources(), vec!["b.jpg"]);
        assert_eq!(fs::read(output.join("a.jpg")).unwrap(), b"already here");
    }

    #[test]
    fn second_pass_skips_everything() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("output");
        let index = index_of(&["a.jpg", "b.jpg"]);

        process_images(&MockBackend::new(), &index, tmp.path(), &output).unwrap();
        let backend = MockBackend::new();
        let reports = process_images(&backend, &index, tmp.path(), &output).unwrap();

        assert!(backend.get_operations().is_empty());
        assert!(reports
            .iter()
            .all(|r| matches!(r.status, ImageStatus::Skipped)));
    }

    #[test]
    fn duplicate_image_is_processed_once() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("output");
        let backend = MockBackend::new();

        let index = index_of(&["a.jpg", "a.jpg"]);

        let reports = process_images(&backend, &index, tmp.path(), &output).unwrap();

        assert_eq!(backend.resized_sources(), vec!["a.jpg"]);
        assert!(matches!(reports[1].status, ImageStatus::Skipped));
    }

    #[test]
    fn failure_does_not_stop_later_posts() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("output");
        let backend = MockBackend::failing_on(&["bad.jpg"]);

        let reports = process_images(
            &backend,
            &index_of(&["a.jpg", "bad.jpg", "c.jpg"]),
            tmp.path(),
            &output,
        )
        .unwrap();

        assert!(matches!(reports[0].status, ImageStatus::Written(_)));
        assert!(matches!(
            reports[1].status,
            ImageStatus::Failed(ItemError::Backend(BackendError::Decode { .. }))
        ));
        assert!(matches!(reports[2].status, ImageStatus::Written(_)));
        assert!(reports[1].is_failed());
        assert!(!output.join("bad.jpg").exists());
    }

    #[test]
    fn image_without_file_name_fails_that_post_only() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("output");
        let backend = MockBackend::new();

        let index = index_of(&["", "a.jpg"]);

        let reports = process_images(&backend, &index, tmp.path(), &output).unwrap();

        assert!(matches!(
            reports[0].status,
            ImageStatus::Failed(ItemError::InvalidName(_))
        ));
        assert_eq!(reports[0].destination, None);
        assert_eq!(backend.resized_sources(), vec!["a.jpg"]);
    }
}
