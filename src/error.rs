use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("PNG metadata error: {0}")]
    PngMetadata(#[from] png::DecodingError),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("Invalid quality value: {0}. Must be between 0 and 95")]
    InvalidQuality(u8),

    #[error("Invalid resize ratio: {0}. Must be a finite number greater than 0")]
    InvalidResizeRatio(f64),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),

    #[error("{0} of {1} images failed to compress")]
    FilesFailed(usize, usize),
}

pub type Result<T> = std::result::Result<T, CompressionError>;
