//! Resolving billboard image references to bytes.

use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("asset reference escapes the media root: {0}")]
    OutsideRoot(String),

    #[error("failed to read asset {reference}: {source}")]
    Io {
        reference: String,
        #[source]
        source: io::Error,
    },

    #[error("unusable image: {0}")]
    Image(#[from] pdf_canvas::ImageError),
}

/// Where image bytes come from. Implementations may fail freely; the
/// layout engine treats every failure as a missing picture.
pub trait AssetStore {
    fn load(&self, reference: &str) -> Result<Vec<u8>, AssetError>;
}

/// Serves assets from a media directory, the way uploaded files sit on
/// disk under `MEDIA_ROOT`.
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsAssetStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a reference to a path under the root. Absolute paths and
    /// `..` segments are refused.
    pub fn resolve(&self, reference: &str) -> Result<PathBuf, AssetError> {
        let rel = Path::new(reference);
        let safe = rel
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !safe {
            return Err(AssetError::OutsideRoot(reference.to_string()));
        }
        Ok(self.root.join(rel))
    }
}

impl AssetStore for FsAssetStore {
    fn load(&self, reference: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.resolve(reference)?;
        std::fs::read(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => AssetError::NotFound(reference.to_string()),
            _ => AssetError::Io {
                reference: reference.to_string(),
                source,
            },
        })
    }
}

/// An asset store with nothing in it. Every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetStore for NoAssets {
    fn load(&self, reference: &str) -> Result<Vec<u8>, AssetError> {
        Err(AssetError::NotFound(reference.to_string()))
    }
}
