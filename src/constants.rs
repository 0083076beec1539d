pub const DEFAULT_QUALITY: u8 = 90;
pub const MAX_QUALITY: u8 = 95;

pub const DEFAULT_RESIZE_RATIO: f64 = 1.0;

pub const COMPRESSED_SUFFIX: &str = "_compressed";
pub const JPEG_EXTENSION: &str = "jpg";

pub const SIZE_FACTOR: f64 = 1024.0;
pub const SIZE_SUFFIX: &str = "B";
pub const SIZE_UNITS: [&str; 8] = ["", "K", "M", "G", "T", "P", "E", "Z"];
pub const SIZE_OVERFLOW_UNIT: &str = "Y";

pub const OXIPNG_PRESET: u8 = 4;
pub const ZOPFLI_ITERATIONS: u8 = 15;
pub const LIBDEFLATER_HIGH_LEVEL: u8 = 12;
pub const LIBDEFLATER_LOW_LEVEL: u8 = 8;
pub const ZOPFLI_QUALITY_THRESHOLD: u8 = 95;
pub const HIGH_QUALITY_THRESHOLD: u8 = 70;

pub const AVIF_SPEED: u8 = 6;
pub const MIN_AVIF_QUALITY: u8 = 1;

pub const PROGRESS_SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
pub const BANNER_WIDTH: usize = 50;

// Common output message prefixes
pub const SHAPE_PREFIX: &str = "📏 Image shape:";
pub const ORIGINAL_SIZE_PREFIX: &str = "📊 Size before compression:";
pub const NEW_SHAPE_PREFIX: &str = "🔄 New image shape:";
pub const SAVED_PREFIX: &str = "✅ New file saved:";
pub const COMPRESSED_SIZE_PREFIX: &str = "📈 Size after compression:";
pub const SIZE_CHANGE_PREFIX: &str = "🎯 Image size change:";
