pub mod bill;
pub mod config;
pub mod error;
pub mod export;
pub mod render;

pub use bill::{compute_totals, BillDraft, LineField, LineItem, Product, Totals};
pub use config::{AssetSettings, Config, ExportSettings};
pub use error::{BillError, ExportError, Result};
pub use export::{ExportService, ExportedImage, FileAssets, FileDelivery, TypstRasterizer};
pub use render::{render_document, RenderedDocument};
