use anyhow::Context;
use clap::Parser;
use img_compressor::cli::Args;
use img_compressor::constants::BANNER_WIDTH;
use img_compressor::logger::{self, Verbosity};
use img_compressor::{compress_images, info, CompressionOptions};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::set_verbosity(Verbosity::from_flags(args.quiet, args.verbose));

    print_arguments(&args);

    let options = CompressionOptions::new(
        args.quality,
        args.resize_ratio,
        args.width,
        args.height,
        args.to_jpg,
        args.save_to.clone(),
    )
    .context("invalid compression options")?;

    compress_images(&args.images, &options, args.keep_going).context("image compression failed")?;

    Ok(())
}

fn print_arguments(args: &Args) {
    let images: Vec<String> = args.images.iter().map(|p| p.display().to_string()).collect();

    info!("{}", "=".repeat(BANNER_WIDTH));
    info!("📁 Image: {}", images.join(" "));
    info!("🔁 To JPEG: {}", args.to_jpg);
    info!("🎚️  Quality: {}", display_or_default(args.quality));
    info!("📐 Resizing ratio: {}", display_or_default(args.resize_ratio));
    if let (Some(width), Some(height)) = (args.width, args.height) {
        info!("↔️  Width: {}", width);
        info!("↕️  Height: {}", height);
    }
    info!("{}", "=".repeat(BANNER_WIDTH));
}

fn display_or_default<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "default".to_string(), |v| v.to_string())
}
