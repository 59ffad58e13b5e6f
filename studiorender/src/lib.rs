pub mod error;
pub mod output;
pub mod pdf;
pub mod screen;

pub use output::{
    OutputMode,
    PdfOutput,
};

use chrono::{
    DateTime,
    Utc,
};

/// Formats a `createdAt` value as `YYYY-MM-DD HH:MM` in UTC; values out
/// of range render empty.
pub fn format_created_at(created_at: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(created_at)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn created_at() {
        assert_eq!(format_created_at(1234567890000), "2009-02-13 23:31");
        assert_eq!(format_created_at(0), "1970-01-01 00:00");
        assert_eq!(format_created_at(i64::MAX), "");
    }
}
