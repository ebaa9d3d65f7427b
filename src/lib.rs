//! # photofeed
//!
//! A tiny static site generator for a single-page photo feed. A JSON index
//! lists the posts; a Handlebars template turns them into one HTML page; every
//! post's photo is scaled to a fixed width and copied next to it.
//!
//! # Build Pipeline
//!
//! ```text
//! 1. Reconcile  source/images  →  source/index.json  (register unknown photos)
//! 2. Render     index + template  →  public/index.html
//! 3. Process    index + source/images  →  public/images/  (1440px JPEGs)
//! ```
//!
//! A photo dropped into `source/images/` shows up at the top of the feed on
//! the next build as a placeholder post ("New" / "Meaningful caption"), and
//! the index file is rewritten so the placeholder can be edited by hand.
//!
//! Builds are idempotent: an output image that already exists is never
//! re-encoded, so re-running a build only does work for new photos.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `Post` and `PostIndex`, loading and saving the index |
//! | [`reconcile`] | Finds unregistered photos and prepends placeholder posts |
//! | [`render`] | Renders the page template |
//! | [`process`] | Per-post image publishing with per-item outcomes |
//! | [`imaging`] | Decode / resize / encode behind the [`imaging::ImageBackend`] trait |
//! | [`build`] | Runs the pipeline and separates fatal errors from per-image failures |
//! | [`config`] | `config.toml` loading and validation |
//! | [`serve`] | Static file server for the output directory |
//! | [`output`] | CLI output formatting |

pub mod build;
pub mod config;
pub mod imaging;
pub mod output;
pub mod process;
pub mod reconcile;
pub mod render;
pub mod serve;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
