mod assets;
mod delivery;
mod typst;

pub use assets::FileAssets;
pub use delivery::{open_path, FileDelivery};
pub use typst::TypstRasterizer;

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage, RgbaImage};
use std::path::PathBuf;
use tracing::{debug, error, info};

use crate::error::{ExportError, Result};
use crate::render::{AssetRef, RenderedDocument};

/// Name of the delivered file
pub const EXPORT_FILE_NAME: &str = "bill.jpg";

/// JPEG quality used for every export (maximum)
pub const JPEG_QUALITY: u8 = 100;

/// An asset that finished loading and can be handed to the rasterizer
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedAsset {
    pub asset: AssetRef,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Everything the rasterizer may reference while capturing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedAssets {
    pub images: Vec<LoadedAsset>,
    pub font_dirs: Vec<PathBuf>,
}

/// JPEG bytes of a captured bill
#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Resolves once every asset a document references has been loaded.
#[allow(async_fn_in_trait)]
pub trait AssetLoader {
    async fn load(&self, document: &RenderedDocument) -> std::result::Result<LoadedAssets, ExportError>;
}

/// Turns a rendered document into pixels.
#[allow(async_fn_in_trait)]
pub trait Rasterizer {
    async fn capture(
        &self,
        document: &RenderedDocument,
        assets: &LoadedAssets,
    ) -> std::result::Result<RgbaImage, ExportError>;
}

/// Hands finished bytes to the operator as a named file.
pub trait Delivery {
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf>;
}

pub struct ExportService<A, R> {
    assets: A,
    rasterizer: R,
}

impl<A: AssetLoader, R: Rasterizer> ExportService<A, R> {
    pub fn new(assets: A, rasterizer: R) -> Self {
        Self { assets, rasterizer }
    }

    /// Capture `target` as a white-background JPEG.
    ///
    /// Capture starts only after the asset loader resolves. Failures are
    /// logged and returned; nothing is retried.
    pub async fn export_as_image(
        &self,
        target: Option<&RenderedDocument>,
    ) -> std::result::Result<ExportedImage, ExportError> {
        let Some(document) = target else {
            return Err(logged(ExportError::MissingRenderTarget));
        };

        debug!(assets = document.assets().len(), "waiting for bill assets");
        let assets = self.assets.load(document).await.map_err(logged)?;

        debug!(loaded = assets.images.len(), "assets ready, capturing bill");
        let raster = self
            .rasterizer
            .capture(document, &assets)
            .await
            .map_err(logged)?;

        encode_jpeg(&raster).map_err(logged)
    }

    /// Export `target` and deliver it as `bill.jpg`. No delivery is
    /// attempted when the export fails.
    pub async fn download(
        &self,
        target: Option<&RenderedDocument>,
        delivery: &impl Delivery,
    ) -> Result<PathBuf> {
        let image = self.export_as_image(target).await?;
        let path = delivery.deliver(EXPORT_FILE_NAME, &image.bytes)?;
        info!(
            path = %path.display(),
            width = image.width,
            height = image.height,
            "bill delivered"
        );
        Ok(path)
    }
}

fn logged(err: ExportError) -> ExportError {
    error!(error = %err, "bill export failed");
    err
}

/// Flatten a raster onto solid white and encode it at maximum JPEG quality.
pub fn encode_jpeg(raster: &RgbaImage) -> std::result::Result<ExportedImage, ExportError> {
    let (width, height) = raster.dimensions();
    let mut flat = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));

    for (x, y, pixel) in raster.enumerate_pixels() {
        let alpha = pixel[3] as f32 / 255.0;
        let inv_alpha = 1.0 - alpha;
        let dest = flat.get_pixel_mut(x, y);
        for c in 0..3 {
            dest[c] = (pixel[c] as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        }
    }

    let mut bytes = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
        encoder
            .encode_image(&flat)
            .map_err(|e| ExportError::CaptureFailure(e.to_string()))?;
    }

    Ok(ExportedImage {
        bytes,
        width,
        height,
    })
}
