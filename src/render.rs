//! HTML rendering from a Handlebars template.
//!
//! The template receives the whole index as its context:
//!
//! ```handlebars
//! {{#each posts}}
//!   <figure>
//!     <img src="images/{{image}}" alt="{{title}}">
//!     <figcaption>{{caption}}</figcaption>
//!   </figure>
//! {{/each}}
//! ```
//!
//! Interpolated values are HTML-escaped. The page is rendered to a string
//! before anything touches disk, so a template error never leaves a
//! half-written page behind.

use crate::types::PostIndex;
use handlebars::Handlebars;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const TEMPLATE_NAME: &str = "index";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to read template {path}: {source}")]
    ReadTemplate {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse template {path}: {source}")]
    Parse {
        path: PathBuf,
        source: Box<handlebars::TemplateError>,
    },
    #[error("Failed to execute template {path}: {source}")]
    Execute {
        path: PathBuf,
        source: Box<handlebars::RenderError>,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A parsed page template.
pub struct PageTemplate {
    registry: Handlebars<'static>,
    path: PathBuf,
}

impl PageTemplate {
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let source = fs::read_to_string(path).map_err(|source| RenderError::ReadTemplate {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_source(&source, path)
    }

    /// Parse template text; `path` is only used in error messages.
    pub fn from_source(source: &str, path: &Path) -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        registry
            .register_template_string(TEMPLATE_NAME, source)
            .map_err(|e| RenderError::Parse {
                path: path.to_path_buf(),
                source: Box::new(e),
            })?;
        Ok(Self {
            registry,
            path: path.to_path_buf(),
        })
    }

    pub fn render(&self, index: &PostIndex) -> Result<String, RenderError> {
        self.registry
            .render(TEMPLATE_NAME, index)
            .map_err(|e| RenderError::Execute {
                path: self.path.clone(),
                source: Box::new(e),
            })
    }

    /// Render and write the page, creating its parent directory if needed.
    pub fn render_to_file(&self, index: &PostIndex, output: &Path) -> Result<(), RenderError> {
        let html = self.render(index)?;
        let write_err = |source| RenderError::Write {
            path: output.to_path_buf(),
            source,
        };
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(output, html).map_err(write_err)?;
        log::info!("rendered {} -> {}", self.path.display(), output.display());
        Ok(())
    }
}
