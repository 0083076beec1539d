use crate::constants::{
    AVIF_SPEED, COMPRESSED_SIZE_PREFIX, DEFAULT_QUALITY, DEFAULT_RESIZE_RATIO, HIGH_QUALITY_THRESHOLD,
    LIBDEFLATER_HIGH_LEVEL, LIBDEFLATER_LOW_LEVEL, MAX_QUALITY, MIN_AVIF_QUALITY,
    NEW_SHAPE_PREFIX, ORIGINAL_SIZE_PREFIX, OXIPNG_PRESET, SAVED_PREFIX, SHAPE_PREFIX, SIZE_CHANGE_PREFIX,
    ZOPFLI_ITERATIONS, ZOPFLI_QUALITY_THRESHOLD,
};
use crate::error::{CompressionError, Result};
use crate::formats::{determine_output_format, generate_output_path};
use crate::transparency::{has_transparency, read_metadata, ImageMetadata};
use crate::utils::{calculate_size_change, create_progress_spinner, format_size};
use crate::{info, verbose, warn};
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::error::{ImageFormatHint, UnsupportedError, UnsupportedErrorKind};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageEncoder, ImageError, ImageFormat, ImageReader};
use oxipng::{Deflaters, Options};
use std::fs;
use std::io::Cursor;
use std::num::NonZeroU8;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct CompressionOptions {
    pub quality: u8,
    pub resize_ratio: f64,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub to_jpg: bool,
    pub save_to: Option<PathBuf>,
}

impl CompressionOptions {
    pub fn new(
        quality: Option<u8>,
        resize_ratio: Option<f64>,
        width: Option<u32>,
        height: Option<u32>,
        to_jpg: bool,
        save_to: Option<PathBuf>,
    ) -> Result<Self> {
        let quality = quality.unwrap_or(DEFAULT_QUALITY);
        if quality > MAX_QUALITY {
            return Err(CompressionError::InvalidQuality(quality));
        }

        let resize_ratio = resize_ratio.unwrap_or(DEFAULT_RESIZE_RATIO);
        if !resize_ratio.is_finite() || resize_ratio <= 0.0 {
            return Err(CompressionError::InvalidResizeRatio(resize_ratio));
        }

        Ok(Self {
            quality,
            resize_ratio,
            width: width.filter(|&w| w > 0),
            height: height.filter(|&h| h > 0),
            to_jpg,
            save_to,
        })
    }
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            resize_ratio: DEFAULT_RESIZE_RATIO,
            width: None,
            height: None,
            to_jpg: false,
            save_to: None,
        }
    }
}

/// A decoded input together with what was learned about it on disk.
#[derive(Debug)]
pub struct SourceImage {
    pub image: DynamicImage,
    pub format: Option<ImageFormat>,
    pub metadata: ImageMetadata,
    pub file_size: u64,
}

/// Before/after figures for one compressed file.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionReport {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub original_dimensions: (u32, u32),
    pub new_dimensions: Option<(u32, u32)>,
    pub original_size: u64,
    pub new_size: u64,
    pub converted_to_jpg: bool,
}

impl CompressionReport {
    /// `(new - original) / original * 100`, negative when the file shrank.
    pub fn size_change_percent(&self) -> f64 {
        calculate_size_change(self.original_size, self.new_size)
    }
}

/// Validates that a file exists at the given path.
///
/// # Example
/// ```
/// use std::path::Path;
/// use img_compressor::validate_file_exists;
///
/// let result = validate_file_exists(Path::new("nonexistent.jpg"));
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(CompressionError::FileNotFound(path.to_path_buf()));
    }
    Ok(())
}

/// Loads and decodes an image file along with its on-disk size and metadata.
///
/// The format is guessed from the file content first and the extension
/// second. Decoding runs without the image crate's default allocation limit,
/// so any image the decoder understands is accepted.
///
/// # Arguments
/// * `input_path` - Path to the image file to load
///
/// # Returns
/// * `Ok(SourceImage)` - The decoded image, its detected format, size in bytes and metadata
/// * `Err(CompressionError)` - If the file is missing, unreadable or not a decodable image
pub fn load_image_with_metadata(input_path: &Path) -> Result<SourceImage> {
    validate_file_exists(input_path)?;

    let file_size = fs::metadata(input_path)?.len();

    let mut reader = ImageReader::open(input_path)?.with_guessed_format()?;
    reader.no_limits();
    let format = reader.format();
    let image = reader.decode()?;

    let metadata = read_metadata(input_path, format, &image)?;

    Ok(SourceImage {
        image,
        format,
        metadata,
        file_size,
    })
}

/// Decide the new size of a `width` x `height` image.
///
/// A ratio below 1.0 wins over explicit dimensions; explicit dimensions only
/// apply when both are set.
///
/// # Arguments
/// * `width` - Current width in pixels
/// * `height` - Current height in pixels
/// * `options` - Resize ratio and explicit dimensions to apply
///
/// # Returns
/// * `Some((width, height))` - The dimensions to resize to, never zero
/// * `None` - If the image keeps its size
pub fn target_dimensions(width: u32, height: u32, options: &CompressionOptions) -> Option<(u32, u32)> {
    if options.resize_ratio < 1.0 {
        let scale = |dimension: u32| ((dimension as f64 * options.resize_ratio).floor() as u32).max(1);
        return Some((scale(width), scale(height)));
    }

    match (options.width, options.height) {
        (Some(w), Some(h)) => Some((w, h)),
        _ => None,
    }
}

/// Resizes an image in place with a Lanczos3 filter.
///
/// # Arguments
/// * `img` - The image to resize
/// * `options` - Resize ratio and explicit dimensions, see [`target_dimensions`]
///
/// # Returns
/// * `Some((width, height))` - The new dimensions when a resize applies
/// * `None` - If no resize applies and `img` is untouched
pub fn resize_image(img: &mut DynamicImage, options: &CompressionOptions) -> Option<(u32, u32)> {
    let (width, height) = target_dimensions(img.width(), img.height(), options)?;

    if (width, height) != img.dimensions() {
        verbose!("Resizing {}x{} -> {}x{}", img.width(), img.height(), width, height);
        *img = img.resize_exact(width, height, FilterType::Lanczos3);
    }

    Some((width, height))
}

fn is_color_incompatibility(error: &CompressionError) -> bool {
    match error {
        CompressionError::ImageProcessing(ImageError::Unsupported(unsupported)) => {
            matches!(unsupported.kind(), UnsupportedErrorKind::Color(_))
        }
        _ => false,
    }
}

fn optimize_png(data: &[u8], quality: u8) -> Result<Vec<u8>> {
    let mut oxipng_options = Options::from_preset(OXIPNG_PRESET);

    oxipng_options.deflate = if quality >= ZOPFLI_QUALITY_THRESHOLD {
        Deflaters::Zopfli {
            iterations: NonZeroU8::new(ZOPFLI_ITERATIONS).unwrap_or(NonZeroU8::MIN),
        }
    } else if quality >= HIGH_QUALITY_THRESHOLD {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_HIGH_LEVEL,
        }
    } else {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_LOW_LEVEL,
        }
    };

    oxipng::optimize_from_memory(data, &oxipng_options).map_err(|e| CompressionError::PngOptimization(e.to_string()))
}

/// Encodes an image into memory.
///
/// JPEG and AVIF honor `quality`, PNG maps it to an oxipng deflater and other
/// formats ignore it.
///
/// # Arguments
/// * `img` - The image to encode
/// * `format` - The target container
/// * `quality` - Encoder quality from 0 to 95
///
/// # Returns
/// * `Ok(bytes)` - The encoded file content
/// * `Err(CompressionError::ImageProcessing)` - With an unsupported color kind when
///   `format` cannot store the pixel layout of `img`, e.g. alpha in JPEG
pub fn encode_image(img: &DynamicImage, format: ImageFormat, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let (width, height) = img.dimensions();

    match format {
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel
            if img.color().has_alpha() {
                return Err(ImageError::Unsupported(UnsupportedError::from_format_and_kind(
                    ImageFormatHint::Exact(ImageFormat::Jpeg),
                    UnsupportedErrorKind::Color(img.color().into()),
                ))
                .into());
            }
            JpegEncoder::new_with_quality(&mut buffer, quality).write_image(
                img.as_bytes(),
                width,
                height,
                img.color().into(),
            )?;
        }
        ImageFormat::Png => {
            PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, PngFilterType::Adaptive).write_image(
                img.as_bytes(),
                width,
                height,
                img.color().into(),
            )?;
            buffer = optimize_png(&buffer, quality)?;
        }
        ImageFormat::Avif => {
            // the AV1 encoder rejects quality 0
            let avif_quality = quality.max(MIN_AVIF_QUALITY);
            AvifEncoder::new_with_speed_quality(&mut buffer, AVIF_SPEED, avif_quality).write_image(
                img.as_bytes(),
                width,
                height,
                img.color().into(),
            )?;
        }
        _ => {
            img.write_to(&mut Cursor::new(&mut buffer), format)?;
        }
    }

    Ok(buffer)
}

/// Encodes and writes an image, overwriting any existing file.
///
/// When the container cannot hold the pixel format of `img` the image is
/// converted to RGB and encoded once more. Missing parent directories are
/// created.
///
/// # Arguments
/// * `img` - The image to save
/// * `output` - Destination path
/// * `format` - The target container
/// * `quality` - Encoder quality from 0 to 95
///
/// # Returns
/// * `Ok(())` - If the file was written
/// * `Err(CompressionError)` - If encoding fails for any other reason or the file cannot be written
pub fn save_image(img: &DynamicImage, output: &Path, format: ImageFormat, quality: u8) -> Result<()> {
    let bytes = match encode_image(img, format, quality) {
        Err(error) if is_color_incompatibility(&error) => {
            verbose!("{:?} cannot store {:?} pixels, converting to RGB", format, img.color());
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            encode_image(&rgb, format, quality)?
        }
        result => result?,
    };

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|_| CompressionError::DirectoryCreationFailed(parent.to_path_buf()))?;
    }
    fs::write(output, bytes)?;

    Ok(())
}

/// Saves `img` and returns the size of the written file as reported by disk.
///
/// # Arguments
/// * `img` - The image to save
/// * `output_path` - Destination path
/// * `format` - The target container
/// * `quality` - Encoder quality from 0 to 95
///
/// # Returns
/// * `Ok(size)` - Size of the written file in bytes
/// * `Err(CompressionError)` - If [`save_image`] fails or the file cannot be inspected
pub fn process_and_save_image(img: &DynamicImage, output_path: &Path, format: ImageFormat, quality: u8) -> Result<u64> {
    save_image(img, output_path, format, quality)?;
    let compressed_size = fs::metadata(output_path)?.len();
    Ok(compressed_size)
}

/// Compress a single image: load -> inspect -> resize -> save -> report.
///
/// Prints the original shape and size, the new shape when resized, the
/// output path, the new size and the size change, in that order.
///
/// # Arguments
/// * `input` - Path to the image to compress
/// * `options` - Quality, resize and output settings
///
/// # Returns
/// * `Ok(CompressionReport)` - Before/after figures of the written file
/// * `Err(CompressionError)` - If loading, encoding or writing fails
pub fn compress_image(input: &Path, options: &CompressionOptions) -> Result<CompressionReport> {
    verbose!("Loading {}", input.display());

    let SourceImage {
        mut image,
        format,
        metadata,
        file_size: original_size,
    } = load_image_with_metadata(input)?;

    let original_dimensions = image.dimensions();
    info!("{} {:?}", SHAPE_PREFIX, original_dimensions);
    info!("{} {}", ORIGINAL_SIZE_PREFIX, format_size(original_size));
    verbose!("Detected format: {:?}, color: {:?}", format, image.color());

    let transparent = has_transparency(&image, &metadata);
    let to_jpg = options.to_jpg && !transparent;
    if options.to_jpg && transparent {
        warn!("{} has transparency, keeping its original format", input.display());
    }

    let new_dimensions = resize_image(&mut image, options);
    if let Some(dimensions) = new_dimensions {
        info!("{} {:?}", NEW_SHAPE_PREFIX, dimensions);
    }

    let output_path = generate_output_path(input, to_jpg, options.save_to.as_deref())?;
    let output_format = determine_output_format(&output_path, format)?;
    verbose!("Encoding as {:?} (quality {})", output_format, options.quality);

    let pb = create_progress_spinner("Saving compressed image...");
    let saved = process_and_save_image(&image, &output_path, output_format, options.quality);
    pb.finish_and_clear();
    let new_size = saved?;

    info!("{} {}", SAVED_PREFIX, output_path.display());
    info!("{} {}", COMPRESSED_SIZE_PREFIX, format_size(new_size));

    let report = CompressionReport {
        input_path: input.to_path_buf(),
        output_path,
        original_dimensions,
        new_dimensions,
        original_size,
        new_size,
        converted_to_jpg: to_jpg,
    };
    info!(
        "{} {:.2}% of the original image size.",
        SIZE_CHANGE_PREFIX,
        report.size_change_percent()
    );

    Ok(report)
}
