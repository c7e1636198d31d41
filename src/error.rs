use std::path::PathBuf;
use thiserror::Error;

/// Why a single export attempt failed. Both variants are terminal for that
/// attempt; the operator may simply run the export again.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Bill preview not found: nothing to capture")]
    MissingRenderTarget,

    #[error("Error capturing bill: {0}")]
    CaptureFailure(String),
}

#[derive(Error, Debug)]
pub enum BillError {
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config file already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Unknown product '{0}'. Run 'bill products' to see available products.")]
    UnknownProduct(String),

    #[error("Unknown month '{0}'. Run 'bill months' to see accepted names.")]
    UnknownMonth(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD (e.g., '2026-03-01')")]
    InvalidDate(String),

    #[error("Invalid item format '{0}'. Expected 'product[:quantity[:price]]' (e.g., 'milk:10:50')")]
    InvalidItemFormat(String),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BillError>;
