use image::RgbaImage;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

use super::{LoadedAssets, Rasterizer};
use crate::config::ExportSettings;
use crate::error::ExportError;
use crate::render::RenderedDocument;

/// Embedded Typst template for the bill layout.
/// Reads the rendered document and the loaded logo file names from data.json.
const BILL_TEMPLATE: &str = r##"// Bill Template
// Data is loaded from JSON file

#let data = json("DATA_JSON_PATH")
#let doc = data.document

#set page(
  paper: doc.page.paper,
  margin: (top: 32pt, bottom: 48pt, left: 42pt, right: 42pt),
  fill: white,
)

#set text(size: 11pt)

#let logo(key, width) = {
  let file = data.logos.at(key, default: none)
  if file != none { image(file, width: width) } else { box(width: width) }
}

#for part in doc.blocks {
  if part.kind == "header" {
    grid(
      columns: (auto, 1fr, auto),
      align: (left + horizon, center + horizon, right + horizon),
      logo(part.left_logo, 72pt),
      [
        #text(size: 20pt, weight: "extrabold")[#part.identity.name]
        #v(0.2em)
        #text(size: 10pt, weight: "medium")[
          #part.identity.address.at(0) \
          #part.identity.address.at(1) \
          Mobile : #part.identity.mobile \
          Email : #part.identity.email
        ]
      ],
      logo(part.right_logo, 60pt),
    )
    v(8pt)
    line(length: 100%, stroke: 0.5pt + gray)
    v(8pt)
  } else if part.kind == "meta_band" {
    block(
      fill: rgb(209, 213, 219),
      inset: 6pt,
      width: 100%,
      grid(
        columns: (1fr, auto),
        [*Invoice Date :* #part.invoice_date],
        [*Bill of Month :* #part.billing_month],
      ),
    )
    v(8pt)
  } else if part.kind == "customer" {
    text(weight: "semibold")[BILL TO]
    linebreak()
    text(size: 13pt, weight: "bold")[#part.name]
    v(8pt)
  } else if part.kind == "line_table" {
    table(
      columns: (2fr, 1fr, 1fr, 1fr),
      align: center + horizon,
      stroke: (x, y) => if y == 0 { (top: 2pt + black, bottom: 2pt + black) } else { (bottom: 1pt + rgb("#cccccc")) },
      inset: 8pt,

      // Header
      [*Product*], [*Quantity*], [*Price (₹)*], [*Total (₹)*],

      // Rows
      ..part.rows.map(row => (
        row.product,
        row.quantity,
        row.price,
        row.total,
      )).flatten()
    )
  } else if part.kind == "grand_total" {
    v(6pt)
    line(length: 100%, stroke: 2pt + black)
    align(right, text(weight: "bold")[Total Amount : ₹#part.amount])
    line(length: 100%, stroke: 2pt + black)
  } else if part.kind == "discount" {
    v(12pt)
    align(right, text(weight: "bold")[Discount : #part.percent%])
  }
}
"##;

/// Data handed to the template
#[derive(Serialize)]
struct CapturePayload<'a> {
    document: &'a RenderedDocument,
    logos: BTreeMap<&'static str, &'a str>,
}

/// Rasterizes bills to PNG with the Typst CLI
#[derive(Debug, Clone)]
pub struct TypstRasterizer {
    binary: PathBuf,
    ppi: f32,
}

impl TypstRasterizer {
    pub fn new(binary: impl Into<PathBuf>, ppi: f32) -> Self {
        Self {
            binary: binary.into(),
            ppi,
        }
    }

    pub fn from_config(settings: &ExportSettings) -> Self {
        Self::new(&settings.typst, settings.ppi)
    }

    async fn compile(&self, dir: &Path, assets: &LoadedAssets) -> Result<Vec<u8>, ExportError> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("compile").arg("--root").arg(dir);
        for font_dir in &assets.font_dirs {
            cmd.arg("--font-path").arg(font_dir);
        }
        cmd.args(["--format", "png", "--ppi"])
            .arg(self.ppi.to_string())
            .arg(dir.join("bill.typ"))
            .arg(dir.join("bill.png"));

        let output = cmd.output().await.map_err(capture_io)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExportError::CaptureFailure(stderr.trim().to_string()));
        }

        tokio::fs::read(dir.join("bill.png")).await.map_err(capture_io)
    }
}

fn capture_io(e: std::io::Error) -> ExportError {
    ExportError::CaptureFailure(e.to_string())
}

impl Rasterizer for TypstRasterizer {
    async fn capture(
        &self,
        document: &RenderedDocument,
        assets: &LoadedAssets,
    ) -> Result<RgbaImage, ExportError> {
        // Check if typst is available
        let typst_check = Command::new(&self.binary).arg("--version").output().await;
        if typst_check.is_err() {
            return Err(ExportError::CaptureFailure(format!(
                "Typst not found at '{}'. Install it from https://typst.app/ or run: cargo install typst-cli",
                self.binary.display()
            )));
        }

        let work_dir = tempfile::Builder::new()
            .prefix("bill-")
            .tempdir()
            .map_err(capture_io)?;
        let dir = work_dir.path();

        for image in &assets.images {
            tokio::fs::write(dir.join(&image.file_name), &image.bytes)
                .await
                .map_err(capture_io)?;
        }

        let payload = CapturePayload {
            document,
            logos: assets
                .images
                .iter()
                .map(|image| (image.asset.key(), image.file_name.as_str()))
                .collect(),
        };
        let json_data = serde_json::to_string(&payload)
            .map_err(|e| ExportError::CaptureFailure(e.to_string()))?;
        tokio::fs::write(dir.join("data.json"), json_data)
            .await
            .map_err(capture_io)?;

        let template_content = BILL_TEMPLATE.replace("DATA_JSON_PATH", "data.json");
        tokio::fs::write(dir.join("bill.typ"), template_content)
            .await
            .map_err(capture_io)?;

        debug!(dir = %dir.display(), ppi = self.ppi, "running typst");
        let png = self.compile(dir, assets).await?;

        let raster = image::load_from_memory(&png)
            .map_err(|e| ExportError::CaptureFailure(e.to_string()))?
            .to_rgba8();
        Ok(raster)
    }
}
