use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "img-compressor",
    about = "Compress and resize images, reporting the size before and after",
    long_about = "img-compressor re-encodes images with a quality setting, optionally shrinking them \
                  by a ratio or to explicit dimensions and optionally converting them to JPEG. \
                  Every input is written next to the original as <name>_compressed.<ext> \
                  unless --save-to points elsewhere.",
    version,
    after_help = "EXAMPLES:\n  \
    img-compressor photo.png -q 80\n  \
    img-compressor a.png b.png -j -r 0.5\n  \
    img-compressor scan.bmp -w 1280 -H 720 -s ./compressed"
)]
pub struct Args {
    #[arg(
        required = true,
        num_args = 1..,
        value_name = "IMAGE",
        help = "Target image(s) to compress and/or resize"
    )]
    pub images: Vec<PathBuf>,

    #[arg(
        short = 'j',
        long,
        help = "Convert the images to JPEG",
        long_help = "Convert the images to JPEG. Images with transparent pixels keep their \
                     original format since JPEG cannot store an alpha channel."
    )]
    pub to_jpg: bool,

    #[arg(
        short = 'q',
        long,
        help = "Quality from 0 (worst) to 95 (best), default: 90",
        long_help = "Encoder quality from 0 (worst) to 95 (best). \
                     For PNG output: 95 uses Zopfli, >=70 uses high libdeflate compression, lower uses faster compression."
    )]
    pub quality: Option<u8>,

    #[arg(
        short = 'r',
        long,
        help = "Resizing ratio, 0.5 halves width and height (default: 1.0)",
        long_help = "Resizing ratio from 0 to 1. Setting it to 0.5 multiplies width and height by 0.5. \
                     A ratio below 1.0 takes precedence over --width/--height."
    )]
    pub resize_ratio: Option<f64>,

    #[arg(
        short = 'w',
        long,
        help = "New width, use together with --height",
        long_help = "New width in pixels. Only applied when --height is set too; the aspect ratio is not preserved."
    )]
    pub width: Option<u32>,

    #[arg(
        short = 'H',
        long,
        alias = "hh",
        help = "New height, use together with --width",
        long_help = "New height in pixels. Only applied when --width is set too; the aspect ratio is not preserved."
    )]
    pub height: Option<u32>,

    #[arg(
        short = 's',
        long,
        alias = "st",
        value_name = "DIR",
        help = "Directory to save the compressed images to"
    )]
    pub save_to: Option<PathBuf>,

    #[arg(long, help = "Continue with the remaining images when one fails")]
    pub keep_going: bool,

    #[arg(long, conflicts_with = "verbose", help = "Only print errors")]
    pub quiet: bool,

    #[arg(long, help = "Print diagnostic details while compressing")]
    pub verbose: bool,
}
