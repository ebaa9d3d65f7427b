//! The post index: the one piece of persisted state a build reads and writes.
//!
//! ```json
//! {
//!   "posts": [
//!     { "title": "Dawn", "caption": "First light over the ridge", "image": "dawn.jpg" }
//!   ]
//! }
//! ```
//!
//! Order matters: posts render in index order, and newly discovered images
//! are prepended so they show up first.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Title given to a post synthesized for an unregistered image.
pub const PLACEHOLDER_TITLE: &str = "New";
/// Caption given to a post synthesized for an unregistered image.
pub const PLACEHOLDER_CAPTION: &str = "Meaningful caption";

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to read index {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse index {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to serialize index: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write index {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A single entry in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub caption: String,
    /// Image filename, relative to the image source directory.
    pub image: String,
}

impl Post {
    /// A stand-in post for an image nobody has written up yet.
    pub fn placeholder(image: impl Into<String>) -> Self {
        Self {
            title: PLACEHOLDER_TITLE.to_string(),
            caption: PLACEHOLDER_CAPTION.to_string(),
            image: image.into(),
        }
    }
}

/// Ordered list of posts, persisted as `{ "posts": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostIndex {
    #[serde(default)]
    pub posts: Vec<Post>,
}

impl PostIndex {
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let content = fs::read_to_string(path).map_err(|source| IndexError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| IndexError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String, IndexError> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Overwrite the index file.
    ///
    /// The JSON goes to a sibling temp file first and is renamed into place,
    /// so a failed write leaves the previous index untouched.
    pub fn save(&self, path: &Path) -> Result<(), IndexError> {
        let json = self.to_json()?;
        let tmp_path = temp_sibling(path);
        let write_err = |source| IndexError::Write {
            path: path.to_path_buf(),
            source,
        };

        fs::write(&tmp_path, json).map_err(write_err)?;
        if let Err(source) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(write_err(source));
        }
        Ok(())
    }

    /// Prepend one placeholder post per image name.
    ///
    /// `images` is in discovery order; the last discovered image ends up
    /// first in the index. Existing posts keep their relative order after
    /// the new ones.
    pub fn prepend_placeholders(&mut self, images: &[String]) {
        let mut posts: Vec<Post> = images.iter().rev().map(Post::placeholder).collect();
        posts.append(&mut self.posts);
        self.posts = posts;
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn post(title: &str, image: &str) -> Post {
        Post {
            title: title.to_string(),
            caption: "c".to_string(),
            image: image.to_string(),
        }
    }

    #[test]
    fn parse_index_ignores_unknown_fields() {
        let json = r#"{
            "site": "ignored",
            "posts": [
                {"title": "A", "caption": "c", "image": "a.jpg", "tags": ["x"]}
            ]
        }"#;
        let index: PostIndex = serde_json::from_str(json).unwrap();
        assert_eq!(index.posts, vec![post("A", "a.jpg")]);
    }

    #[test]
    fn parse_index_missing_posts_is_empty() {
        let index: PostIndex = serde_json::from_str("{}").unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn parse_post_missing_field_is_error() {
        let result: Result<PostIndex, _> =
            serde_json::from_str(r#"{"posts": [{"title": "A", "image": "a.jpg"}]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn placeholder_post_values() {
        let p = Post::placeholder("b.jpg");
        assert_eq!(p.title, "New");
        assert_eq!(p.caption, "Meaningful caption");
        assert_eq!(p.image, "b.jpg");
    }

    #[test]
    fn prepend_reverses_discovery_order() {
        let mut index = PostIndex {
            posts: vec![post("A", "a.jpg"), post("B", "b.jpg")],
        };
        index.prepend_placeholders(&["c.jpg".to_string(), "d.jpg".to_string()]);

        let images: Vec<&str> = index.posts.iter().map(|p| p.image.as_str()).collect();
        assert_eq!(images, vec!["d.jpg", "c.jpg", "a.jpg", "b.jpg"]);
        assert_eq!(index.posts[2], post("A", "a.jpg"));
        assert_eq!(index.posts[3], post("B", "b.jpg"));
    }

    #[test]
    fn prepend_nothing_is_noop() {
        let mut index = PostIndex {
            posts: vec![post("A", "a.jpg")],
        };
        index.prepend_placeholders(&[]);
        assert_eq!(index.posts, vec![post("A", "a.jpg")]);
    }

    #[test]
    fn to_json_uses_two_space_indent_in_field_order() {
        let index = PostIndex {
            posts: vec![post("A", "a.jpg")],
        };
        let json = index.to_json().unwrap();
        assert_eq!(
            json,
            "{\n  \"posts\": [\n    {\n      \"title\": \"A\",\n      \"caption\": \"c\",\n      \"image\": \"a.jpg\"\n    }\n  ]\n}\n"
        );
    }

    #[test]
    fn save_then_load_preserves_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("index.json");
        let index = PostIndex {
            posts: vec![post("Z", "z.jpg"), post("A", "a.jpg")],
        };

        index.save(&path).unwrap();
        assert_eq!(PostIndex::load(&path).unwrap(), index);
        assert!(!tmp.path().join("index.json.tmp").exists());
    }

    #[test]
    fn save_into_missing_directory_is_write_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing/index.json");
        let result = PostIndex::default().save(&path);
        assert!(matches!(result, Err(IndexError::Write { .. })));
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let result = PostIndex::load(&tmp.path().join("nope.json"));
        assert!(matches!(result, Err(IndexError::Read { .. })));
    }

    #[test]
    fn load_invalid_json_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("index.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            PostIndex::load(&path),
            Err(IndexError::Parse { .. })
        ));
    }
}
