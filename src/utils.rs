//! Helpers shared by the compression pipeline and the CLI output.
use crate::constants::{PROGRESS_SPINNER_TEMPLATE, SIZE_FACTOR, SIZE_OVERFLOW_UNIT, SIZE_SUFFIX, SIZE_UNITS};
use indicatif::{ProgressBar, ProgressStyle};

/// Format a byte count with the default base (1024) and suffix ("B").
///
/// ```
/// use img_compressor::utils::format_size;
///
/// assert_eq!(format_size(1253656), "1.20MB");
/// assert_eq!(format_size(512), "512.00B");
/// ```
pub fn format_size(bytes: u64) -> String {
    format_size_with(bytes as f64, SIZE_FACTOR, SIZE_SUFFIX)
}

/// Scale `value` by `factor` until it drops below it and append the matching
/// unit prefix and `suffix`. Values past the last prefix use "Y".
pub fn format_size_with(value: f64, factor: f64, suffix: &str) -> String {
    let mut scaled = value;
    for unit in SIZE_UNITS {
        if scaled < factor {
            return format!("{:.2}{}{}", scaled, unit, suffix);
        }
        scaled /= factor;
    }
    format!("{:.2}{}{}", scaled, SIZE_OVERFLOW_UNIT, suffix)
}

/// Percentage change from `original_size` to `new_size`.
///
/// Negative values mean the file shrank. An empty original yields 0.
pub fn calculate_size_change(original_size: u64, new_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    (new_size as f64 - original_size as f64) / original_size as f64 * 100.0
}

/// Create a progress spinner with consistent styling
///
/// Hidden automatically when stderr is not a terminal or output is quiet.
pub fn create_progress_spinner(message: &str) -> ProgressBar {
    if crate::logger::is_quiet() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template(PROGRESS_SPINNER_TEMPLATE) {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb
}
