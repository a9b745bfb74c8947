use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("Archive directory not found: {}", .0.display())]
    MissingArchive(PathBuf),
    #[error("Image {image} has no band named {band}")]
    MissingBand { image: String, band: String },
    #[error("No image with id {0} in the archive")]
    UnknownImage(String),
    #[error("Invalid raster dimensions: {width}x{height} for {len} values")]
    InvalidDimensions {
        width: usize,
        height: usize,
        len: usize,
    },
    #[error("Raster grid mismatch: expected geotransform {expected:?}, got {actual:?}")]
    GridMismatch {
        expected: [f64; 6],
        actual: [f64; 6],
    },
    #[error("Raster size mismatch: expected {ew}x{eh}, got {aw}x{ah}")]
    SizeMismatch {
        ew: usize,
        eh: usize,
        aw: usize,
        ah: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
