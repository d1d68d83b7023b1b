//! Formatting helpers.

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Humanize a byte count for file listings: `0 B`, `512 B`, `1.5 KB`.
/// One decimal place, with a trailing `.0` dropped.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_owned();
    }

    let exponent = ((bytes as f64).log(1024.0).floor() as usize).min(SIZE_UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);

    let formatted = format!("{value:.1}");
    let formatted = formatted.strip_suffix(".0").unwrap_or(&formatted);
    format!("{formatted} {}", SIZE_UNITS[exponent])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_byte_counts() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(10 * 1024 * 1024), "10 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024 / 2), "1.5 GB");
    }

    #[test]
    fn huge_sizes_stay_in_the_largest_unit() {
        assert_eq!(format_size(2048 * 1024 * 1024 * 1024), "2048 GB");
    }
}
