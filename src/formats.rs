//! Output naming and output format selection.

use crate::constants::{COMPRESSED_SUFFIX, JPEG_EXTENSION};
use crate::error::{CompressionError, Result};
use image::ImageFormat;
use std::path::{Path, PathBuf};

/// Build the path a compressed copy of `input_path` is written to.
///
/// The file keeps its stem with `_compressed` appended. Converted files get a
/// `.jpg` extension, everything else keeps the original one (or none). With
/// `save_to` the file lands in that directory instead of next to the input.
/// Existing files at the returned path are overwritten later on.
///
/// # Arguments
/// * `input_path` - Path of the original image
/// * `to_jpg` - Whether the image is converted to JPEG
/// * `save_to` - Optional directory replacing the input's directory
///
/// # Returns
/// * `Ok(PathBuf)` - The output path
/// * `Err(CompressionError::UnsupportedFormat)` - If `input_path` has no file name
///
/// # Example
/// ```
/// use std::path::{Path, PathBuf};
/// use img_compressor::generate_output_path;
///
/// let path = generate_output_path(Path::new("photos/photo.png"), true, None).unwrap();
/// assert_eq!(path, PathBuf::from("photos/photo_compressed.jpg"));
/// ```
pub fn generate_output_path(input_path: &Path, to_jpg: bool, save_to: Option<&Path>) -> Result<PathBuf> {
    let file_stem = input_path
        .file_stem()
        .ok_or_else(|| CompressionError::UnsupportedFormat(format!("Invalid file name: {}", input_path.display())))?;

    let mut file_name = file_stem.to_os_string();
    file_name.push(COMPRESSED_SUFFIX);

    if to_jpg {
        file_name.push(".");
        file_name.push(JPEG_EXTENSION);
    } else if let Some(ext) = input_path.extension() {
        file_name.push(".");
        file_name.push(ext);
    }

    let directory = match save_to {
        Some(dir) => dir,
        None => input_path.parent().unwrap_or_else(|| Path::new("")),
    };

    Ok(directory.join(file_name))
}

/// Pick the encoder for `output_path` from its extension, falling back to the
/// format the input was decoded from.
///
/// # Arguments
/// * `output_path` - Path the image will be written to
/// * `input_format` - Format detected while decoding the input, if any
///
/// # Returns
/// * `Ok(ImageFormat)` - A format the image crate can write
/// * `Err(CompressionError::UnsupportedFormat)` - If the format is read-only or unknown
pub fn determine_output_format(output_path: &Path, input_format: Option<ImageFormat>) -> Result<ImageFormat> {
    match ImageFormat::from_path(output_path) {
        Ok(format) if format.writing_enabled() => Ok(format),
        Ok(format) => Err(CompressionError::UnsupportedFormat(format!(
            "{:?} images cannot be written",
            format
        ))),
        Err(_) => input_format.ok_or_else(|| {
            CompressionError::UnsupportedFormat(format!(
                "cannot determine output format for {}",
                output_path.display()
            ))
        }),
    }
}
