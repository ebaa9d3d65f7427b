//! Site configuration module.
//!
//! Loads the optional `config.toml` at the project root. Every key has a
//! default matching the conventional layout, so a project without a config
//! file builds as-is:
//!
//! ```text
//! project/
//! ├── config.toml              # Optional
//! ├── source/
//! │   ├── index.json           # Post index (rewritten when images are added)
//! │   └── images/              # Original photos
//! ├── template/
//! │   └── index.html           # Handlebars page template
//! └── public/                  # Build output, served over HTTP
//!     ├── index.html
//!     └── images/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! index = "source/index.json"
//! images = "source/images"
//! template = "template/index.html"
//! output_html = "public/index.html"
//! output_images = "public/images"
//!
//! [server]
//! address = "0.0.0.0"
//! port = 8080
//! root = "public"
//! ```
//!
//! Relative paths are resolved against the project root. Unknown keys are
//! rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Input and output locations for a build.
    pub paths: PathsConfig,
    /// Static file server settings.
    pub server: ServerSettings,
}

/// Where a build reads from and writes to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Post index JSON. Rewritten in place when new images are registered.
    pub index: PathBuf,
    /// Directory scanned for `.jpg`/`.jpeg` originals.
    pub images: PathBuf,
    /// Handlebars template for the page.
    pub template: PathBuf,
    /// Rendered page.
    pub output_html: PathBuf,
    /// Directory receiving resized images.
    pub output_images: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            index: PathBuf::from("source/index.json"),
            images: PathBuf::from("source/images"),
            template: PathBuf::from("template/index.html"),
            output_html: PathBuf::from("public/index.html"),
            output_images: PathBuf::from("public/images"),
        }
    }
}

/// Static file server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    /// Interface to bind.
    pub address: String,
    pub port: u16,
    /// Directory served at `/`.
    pub root: PathBuf,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 8080,
            root: PathBuf::from("public"),
        }
    }
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let paths = [
            ("paths.index", &self.paths.index),
            ("paths.images", &self.paths.images),
            ("paths.template", &self.paths.template),
            ("paths.output_html", &self.paths.output_html),
            ("paths.output_images", &self.paths.output_images),
            ("server.root", &self.server.root),
        ];
        for (key, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.paths.output_images == self.paths.images {
            return Err(ConfigError::Validation(
                "paths.output_images must differ from paths.images".into(),
            ));
        }
        if self.server.address.trim().is_empty() {
            return Err(ConfigError::Validation(
                "server.address must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Resolve every relative path against `root`. Absolute paths are kept.
    pub fn resolve(&self, root: &Path) -> SiteConfig {
        let paths = &self.paths;
        SiteConfig {
            paths: PathsConfig {
                index: root.join(&paths.index),
                images: root.join(&paths.images),
                template: root.join(&paths.template),
                output_html: root.join(&paths.output_html),
                output_images: root.join(&paths.output_images),
            },
            server: ServerSettings {
                root: root.join(&self.server.root),
                ..self.server.clone()
            },
        }
    }
}

/// Load and validate a config file. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = if path.exists() {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)?
    } else {
        log::debug!("no config at {}, using defaults", path.display());
        SiteConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// A documented `config.toml` with every option at its default.
pub fn stock_config_toml() -> &'static str {
    r#"# photofeed configuration
# All options are optional. Relative paths resolve against the project root.

[paths]
# Post index. New images found under `images` are registered here as
# placeholder posts, and the file is rewritten.
index = "source/index.json"
# Originals. Only .jpg and .jpeg files are picked up (case-sensitive).
images = "source/images"
# Handlebars template rendered with { posts: [{ title, caption, image }] }.
template = "template/index.html"
# Rendered page.
output_html = "public/index.html"
# Resized copies, 1440px wide. Existing files are never overwritten.
output_images = "public/images"

[server]
address = "0.0.0.0"
port = 8080
# Directory served at /.
root = "public"
"#
}
