use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{AssetLoader, LoadedAsset, LoadedAssets};
use crate::config::{expand_path, AssetSettings};
use crate::error::ExportError;
use crate::render::{AssetRef, RenderedDocument};

/// Loads logos and font directories from the local filesystem.
///
/// Assets with no configured path are skipped and the bill is drawn
/// without them. A configured path that cannot be read fails the load.
#[derive(Debug, Clone, Default)]
pub struct FileAssets {
    logos: HashMap<AssetRef, PathBuf>,
    font_dirs: Vec<PathBuf>,
}

impl FileAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(settings: &AssetSettings) -> Self {
        let mut assets = Self::new();
        if let Some(path) = &settings.milk_logo {
            assets = assets.with_logo(AssetRef::MilkLogo, expand_path(path));
        }
        if let Some(path) = &settings.goat_logo {
            assets = assets.with_logo(AssetRef::GoatLogo, expand_path(path));
        }
        for dir in &settings.font_dirs {
            assets = assets.with_font_dir(expand_path(dir));
        }
        assets
    }

    pub fn with_logo(mut self, asset: AssetRef, path: impl Into<PathBuf>) -> Self {
        self.logos.insert(asset, path.into());
        self
    }

    pub fn with_font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.font_dirs.push(dir.into());
        self
    }
}

fn file_name_for(asset: AssetRef, source: &Path) -> String {
    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png");
    format!("{}.{}", asset.key(), ext.to_ascii_lowercase())
}

impl AssetLoader for FileAssets {
    async fn load(&self, document: &RenderedDocument) -> Result<LoadedAssets, ExportError> {
        let mut wanted = document.assets();
        wanted.dedup();

        let mut images = Vec::new();
        for asset in wanted {
            let Some(path) = self.logos.get(&asset) else {
                debug!(asset = asset.key(), "no file configured, skipping");
                continue;
            };
            let bytes = tokio::fs::read(path).await.map_err(|e| {
                ExportError::CaptureFailure(format!("cannot load {}: {e}", path.display()))
            })?;
            debug!(asset = asset.key(), bytes = bytes.len(), "asset loaded");
            images.push(LoadedAsset {
                asset,
                file_name: file_name_for(asset, path),
                bytes,
            });
        }

        for dir in &self.font_dirs {
            let meta = tokio::fs::metadata(dir).await.map_err(|e| {
                ExportError::CaptureFailure(format!("cannot load fonts from {}: {e}", dir.display()))
            })?;
            if !meta.is_dir() {
                return Err(ExportError::CaptureFailure(format!(
                    "font path {} is not a directory",
                    dir.display()
                )));
            }
        }

        Ok(LoadedAssets {
            images,
            font_dirs: self.font_dirs.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::{compute_totals, BillDraft};
    use crate::render::render_document;
    use tempfile::TempDir;

    fn document() -> RenderedDocument {
        let draft = BillDraft::new();
        render_document(&draft, &compute_totals(&draft))
    }

    #[tokio::test]
    async fn loads_configured_logos() {
        let temp_dir = TempDir::new().unwrap();
        let logo = temp_dir.path().join("kanhas_milk_logo.PNG");
        std::fs::write(&logo, b"png-bytes").unwrap();

        let loaded = FileAssets::new()
            .with_logo(AssetRef::MilkLogo, &logo)
            .with_font_dir(temp_dir.path())
            .load(&document())
            .await
            .unwrap();

        assert_eq!(loaded.images.len(), 1);
        assert_eq!(loaded.images[0].asset, AssetRef::MilkLogo);
        assert_eq!(loaded.images[0].file_name, "milk_logo.png");
        assert_eq!(loaded.images[0].bytes, b"png-bytes");
        assert_eq!(loaded.font_dirs, vec![temp_dir.path().to_path_buf()]);
    }

    #[tokio::test]
    async fn unconfigured_logos_are_skipped() {
        let loaded = FileAssets::new().load(&document()).await.unwrap();
        assert!(loaded.images.is_empty());
    }

    #[tokio::test]
    async fn unreadable_logo_fails_the_load() {
        let temp_dir = TempDir::new().unwrap();
        let err = FileAssets::new()
            .with_logo(AssetRef::GoatLogo, temp_dir.path().join("missing.png"))
            .load(&document())
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::CaptureFailure(ref msg) if msg.contains("missing.png")));
    }

    #[tokio::test]
    async fn font_path_must_be_a_directory() {
        let temp_dir = TempDir::new().unwrap();
        let not_dir = temp_dir.path().join("font.ttf");
        std::fs::write(&not_dir, b"").unwrap();

        let err = FileAssets::new()
            .with_font_dir(&not_dir)
            .load(&document())
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::CaptureFailure(ref msg) if msg.contains("not a directory")));
    }
}
