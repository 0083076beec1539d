pub mod logger;

pub mod batch;
pub mod cli;
pub mod constants;
pub mod error;
pub mod formats;
pub mod processing;
pub mod transparency;
pub mod utils;

pub use batch::compress_images;
pub use error::{CompressionError, Result};
pub use formats::{determine_output_format, generate_output_path};
pub use processing::{
    compress_image, encode_image, load_image_with_metadata, process_and_save_image, resize_image, save_image,
    target_dimensions, validate_file_exists, CompressionOptions, CompressionReport, SourceImage,
};
pub use transparency::{has_transparency, ColorMode, ImageMetadata, Transparency};
pub use utils::{format_size, format_size_with};
