//! # Utility Functions and Helper Module
//!
//! Small helpers shared by the samplers, reports and dashboard:
//!
//! - **Statistics**: mean/min/max/standard deviation over latency values
//! - **Rounding**: the 2-decimal rounding applied to every reported figure
//! - **Formatting**: identifier truncation and byte unit conversion
//! - **Display Helpers**: plain-text table rows and separators
//!
//! ## Usage Examples
//!
//! ```rust
//! use codevault_monitor::utils::*;
//!
//! assert_eq!(round2(1.23456), 1.23);
//! assert_eq!(truncate_id("QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG", 20),
//!            "QmYwAPJzv5CZsnA625s3...");
//! assert_eq!(format_megabytes(1_572_864.0), "1.50 MB");
//! ```

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Calculate statistics from a slice of values
///
/// Returns `(mean, min, max, standard_deviation)`, or `None` for an empty
/// slice so callers can never report figures for data that does not exist.
///
/// ## Standard Deviation Calculation
///
/// Uses the sample standard deviation formula:
/// s = √(Σ(x - μ)² / (N - 1))
///
/// A single value has no spread and yields 0.
///
/// ## Examples
///
/// ```rust
/// # use codevault_monitor::utils::calculate_stats;
/// let (mean, min, max, std_dev) = calculate_stats(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert_eq!(mean, 3.0);
/// assert_eq!(min, 1.0);
/// assert_eq!(max, 5.0);
/// assert!((std_dev - 1.5811).abs() < 1e-4);
/// ```
pub fn calculate_stats(values: &[f64]) -> Option<(f64, f64, f64, f64)> {
    if values.is_empty() {
        return None;
    }

    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let std_dev = if values.len() < 2 {
        0.0
    } else {
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (count - 1.0);
        variance.sqrt()
    };

    Some((mean, min, max, std_dev))
}

/// Shorten an identifier for display, marking the cut with "..."
///
/// Counts characters, not bytes, so multi-byte input never splits a
/// code point.
pub fn truncate_id(id: &str, max_chars: usize) -> String {
    match id.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &id[..cut]),
        None => id.to_string(),
    }
}

/// Bytes as megabytes (1024-based), 2 decimals
pub fn format_megabytes(bytes: f64) -> String {
    format!("{:.2} MB", bytes / 1024.0 / 1024.0)
}

/// Bytes per second as kilobytes per second (1024-based), 2 decimals
pub fn format_kilobytes_rate(bytes_per_second: f64) -> String {
    format!("{:.2} KB/s", bytes_per_second / 1024.0)
}

/// Print a table row with specified column widths
///
/// ```text
/// | Kind           | Avg (ms)   |
/// ```
pub fn print_table_row(columns: &[&str], widths: &[usize]) {
    println!("{}", format_table_row(columns, widths));
}

/// Format a table row without printing it
pub fn format_table_row(columns: &[&str], widths: &[usize]) -> String {
    let mut row = String::from("|");
    for (i, column) in columns.iter().enumerate() {
        let width = widths.get(i).copied().unwrap_or(10);
        row.push_str(&format!(" {:width$} |", column, width = width));
    }
    row
}

/// Print a table separator
///
/// ```text
/// +----------------+------------+
/// ```
pub fn print_table_separator(widths: &[usize]) {
    let mut line = String::from("+");
    for &width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    println!("{}", line);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.235_000_1), 1.24);
        assert_eq!(round2(100.000_000_000_01), 100.0);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_calculate_stats() {
        let (mean, min, max, std_dev) = calculate_stats(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(mean, 3.0);
        assert_eq!(min, 1.0);
        assert_eq!(max, 5.0);
        assert!((std_dev - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_calculate_stats_edge_cases() {
        assert!(calculate_stats(&[]).is_none());
        assert_eq!(calculate_stats(&[42.0]), Some((42.0, 42.0, 42.0, 0.0)));
        assert_eq!(
            calculate_stats(&[100.0, 100.0, 100.0]),
            Some((100.0, 100.0, 100.0, 0.0))
        );
    }

    #[test]
    fn test_truncate_id() {
        assert_eq!(truncate_id("short", 20), "short");
        assert_eq!(truncate_id("12345678901234567890", 20), "12345678901234567890");
        assert_eq!(truncate_id("123456789012345678901", 20), "12345678901234567890...");
        assert_eq!(truncate_id("ééééé", 2), "éé...");
    }

    #[test]
    fn test_byte_formatting() {
        assert_eq!(format_megabytes(0.0), "0.00 MB");
        assert_eq!(format_megabytes(5_242_880.0), "5.00 MB");
        assert_eq!(format_kilobytes_rate(1536.0), "1.50 KB/s");
    }

    #[test]
    fn test_format_table_row() {
        assert_eq!(format_table_row(&["a", "bc"], &[3, 4]), "| a   | bc   |");
    }
}
