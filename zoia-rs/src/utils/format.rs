//! Formatting utilities

use chrono::{DateTime, Local};
use std::path::PathBuf;

/// Timestamp format used in default output directory names
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Default output directory for a run started at `now`
pub fn default_output_dir(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("zoia-{}", now.format(OUTPUT_TIMESTAMP_FORMAT)))
}

/// Format a count with its noun, e.g. "1 file" or "3 files"
pub fn format_count(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_output_dir() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 17, 5, 1).unwrap();
        assert_eq!(
            default_output_dir(now),
            PathBuf::from("zoia-2024-03-09_17-05-01")
        );
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0, "file"), "0 files");
        assert_eq!(format_count(1, "file"), "1 file");
        assert_eq!(format_count(64, "file"), "64 files");
    }
}
