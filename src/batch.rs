use crate::error::{CompressionError, Result};
use crate::processing::{compress_image, CompressionOptions, CompressionReport};
use crate::utils::format_size;
use crate::{info, verbose};
use std::path::PathBuf;
use std::time::Instant;

/// Compress every input in order with the same options.
///
/// The first failure aborts the run unless `keep_going` is set, in which case
/// failures are reported and counted and the run ends with
/// [`CompressionError::FilesFailed`].
///
/// # Arguments
/// * `inputs` - Image paths, processed in the given order
/// * `options` - Settings applied to every image
/// * `keep_going` - Continue with the next image after a failure
///
/// # Returns
/// * `Ok(reports)` - One report per input, in input order
/// * `Err(CompressionError)` - The first failure, or `FilesFailed` when `keep_going` is set
pub fn compress_images(
    inputs: &[PathBuf],
    options: &CompressionOptions,
    keep_going: bool,
) -> Result<Vec<CompressionReport>> {
    let start_time = Instant::now();
    let mut reports = Vec::with_capacity(inputs.len());
    let mut failed_count = 0;

    for (position, input) in inputs.iter().enumerate() {
        verbose!("[{}/{}] {}", position + 1, inputs.len(), input.display());

        match compress_image(input, options) {
            Ok(report) => reports.push(report),
            Err(error) if keep_going => {
                crate::error!("Failed to compress {}: {}", input.display(), error);
                failed_count += 1;
            }
            Err(error) => return Err(error),
        }
    }

    if inputs.len() > 1 {
        print_summary(&reports, failed_count, start_time);
    }

    if failed_count > 0 {
        return Err(CompressionError::FilesFailed(failed_count, inputs.len()));
    }

    Ok(reports)
}

fn print_summary(reports: &[CompressionReport], failed_count: usize, start_time: Instant) {
    let total_before: u64 = reports.iter().map(|r| r.original_size).sum();
    let total_after: u64 = reports.iter().map(|r| r.new_size).sum();

    info!("{}", "=".repeat(crate::constants::BANNER_WIDTH));
    info!("📊 Compressed {} files in {:.2?}", reports.len(), start_time.elapsed());
    info!(
        "  📦 Total: {} -> {}",
        format_size(total_before),
        format_size(total_after)
    );
    if failed_count > 0 {
        info!("  ⚠️  Failed files: {}", failed_count);
    }
}
