//! The two-column per-file report.
//!
//! The format is inherited verbatim from the classic `fincore` tool so
//! existing scripts keep parsing: resident page count, file size in bytes,
//! then the name, each of the first two left-padded to ten columns. A file
//! that could not be scanned prints `failed` and a size of `-1`.

use std::fmt::Display;

/// One successful report line: `"2          4194       /etc/passwd"`.
pub fn count_line(name: impl Display, file_size: u64, resident_pages: u64) -> String {
    format!("{resident_pages:<10} {file_size:<10} {name}")
}

/// One failure report line: `"failed     -1         /etc/shadow"`.
pub fn failure_line(name: impl Display) -> String {
    format!("{:<10} {:<10} {}", "failed", -1, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_line_matches_legacy_columns() {
        assert_eq!(count_line("/etc/passwd", 4194, 2), "2          4194       /etc/passwd");
    }

    #[test]
    fn count_line_wide_fields_push_columns() {
        // Values wider than ten digits still get a single separating space.
        assert_eq!(
            count_line("big", 123456789012, 98765432101),
            "98765432101 123456789012 big"
        );
    }

    #[test]
    fn failure_line_matches_legacy_columns() {
        assert_eq!(failure_line("/etc/shadow"), "failed     -1         /etc/shadow");
    }
}
