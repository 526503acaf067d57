//! Default overlay assets.
//!
//! Template overlays are plain image files under one root directory. They
//! decode exactly like uploads, and each name decodes once: every overlay
//! created from the same template shares one pixel buffer.

use crate::decode::decode_image;
use crate::error::AssetError;
use crate::model::DecodedImage;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Extension tried when a bare name has no file of its own.
const DEFAULT_EXTENSION: &str = "png";

/// A directory of named template images with a decode cache.
#[derive(Debug)]
pub struct TemplateLibrary {
    root: PathBuf,
    cache: HashMap<String, DecodedImage>,
}

impl TemplateLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fetch a template by name, decoding it on first use.
    ///
    /// `name` is a relative path under the root; `"badge"` also finds
    /// `badge.png`.
    ///
    /// # Errors
    /// `InvalidName` for absolute or escaping paths, `NotFound`, `Io`, or
    /// `Decode` when the file is not an image.
    pub fn load(&mut self, name: &str) -> Result<DecodedImage, AssetError> {
        let (key, path) = self.resolve(&normalize_name(name)?)?;
        if let Some(image) = self.cache.get(&key) {
            log::trace!("template {key:?} served from cache");
            return Ok(image.clone());
        }

        let bytes = std::fs::read(&path).map_err(|source| AssetError::Io {
            path: path.clone(),
            source,
        })?;
        let image = decode_image(&bytes).map_err(|source| AssetError::Decode {
            name: key.clone(),
            source,
        })?;
        log::info!(
            "loaded template {key:?} ({}×{}) from {}",
            image.width(),
            image.height(),
            path.display()
        );

        self.cache.insert(key, image.clone());
        Ok(image)
    }

    /// Whether the file `name` resolves to has already been decoded.
    pub fn is_cached(&self, name: &str) -> bool {
        normalize_name(name)
            .and_then(|name| self.resolve(&name))
            .is_ok_and(|(key, _)| self.cache.contains_key(&key))
    }

    /// Image files directly under the root, sorted, without extension.
    ///
    /// # Errors
    /// `Io` when the root cannot be listed.
    pub fn names(&self) -> Result<Vec<String>, AssetError> {
        let entries = std::fs::read_dir(&self.root).map_err(|source| AssetError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| AssetError::Io {
                    path: self.root.clone(),
                    source,
                })?
                .path();
            let is_image = path.is_file()
                && image::ImageFormat::from_path(&path).is_ok_and(|f| f.can_read());
            if let (true, Some(stem)) = (is_image, path.file_stem().and_then(|s| s.to_str())) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Find the file behind a normalized name. Returns the cache key, the
    /// file's path relative to the root, alongside the full path.
    fn resolve(&self, name: &str) -> Result<(String, PathBuf), AssetError> {
        let exact = self.root.join(name);
        if exact.is_file() {
            return Ok((name.to_string(), exact));
        }
        if Path::new(name).extension().is_none() {
            let with_ext = exact.with_extension(DEFAULT_EXTENSION);
            if with_ext.is_file() {
                return Ok((format!("{name}.{DEFAULT_EXTENSION}"), with_ext));
            }
        }
        Err(AssetError::NotFound {
            name: name.to_string(),
            root: self.root.clone(),
        })
    }
}

/// Normalize to `/`-separated segments, rejecting anything that could leave
/// the root.
fn normalize_name(name: &str) -> Result<String, AssetError> {
    let invalid = || AssetError::InvalidName(name.to_string());
    let unified = name.trim().replace('\\', "/");
    if unified.starts_with('/') || unified.contains(':') {
        return Err(invalid());
    }

    let mut parts = Vec::new();
    for part in unified.split('/') {
        match part {
            "" | "." => {}
            ".." => return Err(invalid()),
            part => parts.push(part),
        }
    }
    if parts.is_empty() {
        return Err(invalid());
    }
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalizes_separators_and_dots() {
        assert_eq!(normalize_name("a\\b.png").unwrap(), "a/b.png");
        assert_eq!(normalize_name("./a//b").unwrap(), "a/b");
        assert_eq!(normalize_name(" badge ").unwrap(), "badge");
    }

    #[test]
    fn rejects_escaping_names() {
        for name in ["../secret", "/etc/passwd", "a/../../b", "", "  ", "C:/x", "./"] {
            assert!(
                matches!(normalize_name(name), Err(AssetError::InvalidName(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn missing_template_reports_root() {
        let mut library = TemplateLibrary::new("/nonexistent-template-root");
        let err = library.load("badge").unwrap_err();
        assert!(matches!(err, AssetError::NotFound { ref name, .. } if name == "badge"));
    }

    #[test]
    fn aliases_of_one_file_share_a_cache_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut png = std::io::Cursor::new(Vec::new());
        image::RgbaImage::new(3, 2)
            .write_to(&mut png, image::ImageFormat::Png)
            .unwrap();
        std::fs::write(dir.path().join("badge.png"), png.into_inner()).unwrap();

        let mut library = TemplateLibrary::new(dir.path());
        let bare = library.load("badge").unwrap();
        assert!(library.is_cached("./badge.png"));

        for alias in ["badge.png", "./badge", "badge/", " badge "] {
            let again = library.load(alias).unwrap();
            assert!(again.shares_pixels(&bare), "{alias:?} decoded a second copy");
        }
        assert_eq!(library.cache.len(), 1);
    }
}
