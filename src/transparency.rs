//! Transparency detection for decoded images.
//!
//! The image crate expands palettes while decoding, so the color mode and the
//! raw `tRNS` chunk of PNG inputs are read separately with the `png` crate.

use crate::error::Result;
use image::{DynamicImage, ImageBuffer, ImageFormat, Pixel, Primitive};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Transparency information embedded in the file itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transparency {
    /// First palette entry that is fully transparent.
    Index(u8),
    /// Per-entry palette alpha values without a fully transparent entry.
    Alphas(Vec<u8>),
    /// Single transparent color for grey or RGB images.
    ColorKey(Vec<u8>),
}

/// Pixel layout of the file as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorMode {
    /// Palette-indexed pixels, one index per pixel.
    Palette(Vec<u8>),
    Rgba,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMetadata {
    pub mode: ColorMode,
    pub transparency: Option<Transparency>,
}

impl ImageMetadata {
    /// Metadata for formats without a dedicated reader: the mode follows the
    /// decoded color type and nothing explicit is attached.
    pub fn from_decoded(image: &DynamicImage) -> Self {
        let mode = match image {
            DynamicImage::ImageRgba8(_) | DynamicImage::ImageRgba16(_) | DynamicImage::ImageRgba32F(_) => {
                ColorMode::Rgba
            }
            _ => ColorMode::Other,
        };
        Self {
            mode,
            transparency: None,
        }
    }

    pub fn transparent_index(&self) -> Option<u8> {
        match self.transparency {
            Some(Transparency::Index(index)) => Some(index),
            _ => None,
        }
    }
}

/// Collect the metadata of a freshly decoded image.
pub fn read_metadata(path: &Path, format: Option<ImageFormat>, image: &DynamicImage) -> Result<ImageMetadata> {
    match format {
        Some(ImageFormat::Png) => read_png_metadata(path, image),
        _ => Ok(ImageMetadata::from_decoded(image)),
    }
}

/// Read the PNG header, the `tRNS` chunk and, for indexed images, the raw
/// palette indices.
pub fn read_png_metadata(path: &Path, image: &DynamicImage) -> Result<ImageMetadata> {
    let mut decoder = png::Decoder::new(BufReader::new(File::open(path)?));
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info()?;

    let info = reader.info();
    let color_type = info.color_type;
    let bit_depth = info.bit_depth as u8;
    let trns = info.trns.as_ref().map(|chunk| chunk.to_vec());

    if color_type != png::ColorType::Indexed {
        let mut metadata = ImageMetadata::from_decoded(image);
        metadata.transparency = trns.map(Transparency::ColorKey);
        return Ok(metadata);
    }

    let mut buffer = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buffer)?;
    let indices = unpack_indices(
        &buffer[..frame.buffer_size()],
        frame.width as usize,
        frame.height as usize,
        frame.line_size,
        bit_depth,
    );

    let transparency = trns.map(|alphas| match alphas.iter().position(|&alpha| alpha == 0) {
        Some(index) => Transparency::Index(index as u8),
        None => Transparency::Alphas(alphas),
    });

    Ok(ImageMetadata {
        mode: ColorMode::Palette(indices),
        transparency,
    })
}

/// Expand packed 1/2/4/8-bit palette rows into one index per pixel.
fn unpack_indices(data: &[u8], width: usize, height: usize, line_size: usize, bit_depth: u8) -> Vec<u8> {
    let mut indices = Vec::with_capacity(width * height);
    if line_size == 0 {
        return indices;
    }

    let depth = bit_depth as usize;
    let per_byte = 8 / depth;
    let mask = ((1u16 << depth) - 1) as u8;

    for row in data.chunks(line_size).take(height) {
        if depth == 8 {
            indices.extend_from_slice(&row[..width.min(row.len())]);
            continue;
        }
        for x in 0..width {
            let shift = 8 - depth * (x % per_byte + 1);
            indices.push((row[x / per_byte] >> shift) & mask);
        }
    }
    indices
}

/// (count, index) pairs for every palette index in use.
pub fn color_histogram(indices: &[u8]) -> Vec<(usize, u8)> {
    let mut counts = [0usize; 256];
    for &index in indices {
        counts[index as usize] += 1;
    }
    counts
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(index, &count)| (count, index as u8))
        .collect()
}

/// (min, max) of every channel across all pixels.
pub fn channel_extrema<P: Pixel>(buffer: &ImageBuffer<P, Vec<P::Subpixel>>) -> Vec<(P::Subpixel, P::Subpixel)> {
    let max = <P::Subpixel as Primitive>::DEFAULT_MAX_VALUE;
    let min = <P::Subpixel as Primitive>::DEFAULT_MIN_VALUE;
    let mut extrema = vec![(max, min); P::CHANNEL_COUNT as usize];

    for pixel in buffer.pixels() {
        for (slot, &value) in extrema.iter_mut().zip(pixel.channels()) {
            if value < slot.0 {
                slot.0 = value;
            }
            if value > slot.1 {
                slot.1 = value;
            }
        }
    }
    extrema
}

fn alpha_below_opaque<P: Pixel>(buffer: &ImageBuffer<P, Vec<P::Subpixel>>) -> bool {
    let alpha = P::CHANNEL_COUNT as usize - 1;
    channel_extrema(buffer)
        .get(alpha)
        .is_some_and(|&(min, _)| min < <P::Subpixel as Primitive>::DEFAULT_MAX_VALUE)
}

/// Whether any pixel of `image` is transparent or partially transparent.
pub fn has_transparency(image: &DynamicImage, metadata: &ImageMetadata) -> bool {
    if metadata.transparency.is_some() {
        return true;
    }

    match &metadata.mode {
        ColorMode::Palette(indices) => {
            let transparent = metadata.transparent_index();
            color_histogram(indices)
                .iter()
                .any(|&(_, index)| Some(index) == transparent)
        }
        ColorMode::Rgba => match image {
            DynamicImage::ImageRgba8(buffer) => alpha_below_opaque(buffer),
            DynamicImage::ImageRgba16(buffer) => alpha_below_opaque(buffer),
            DynamicImage::ImageRgba32F(buffer) => alpha_below_opaque(buffer),
            _ => alpha_below_opaque(&image.to_rgba8()),
        },
        ColorMode::Other => false,
    }
}
