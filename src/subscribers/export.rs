//! CSV export of the subscriber list.

use crate::subscribers::models::SubscriberRecord;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

const HEADER: [&str; 3] = ["Email", "Subscription Date", "Status"];

/// Encode one CSV field.
///
/// Fields containing a comma, a double quote or a line break are quoted and
/// embedded quotes are doubled. Anything else is written as-is.
pub fn encode_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn encode_row<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    fields
        .into_iter()
        .map(encode_field)
        .collect::<Vec<_>>()
        .join(",")
}

/// Serialize records to CSV text.
///
/// # Arguments
/// * `records` - Records to export, in order
///
/// # Returns
/// * `String` - Header row plus one row per record, joined by `\n`
pub fn to_csv(records: &[SubscriberRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(encode_row(HEADER));
    for record in records {
        let joined = record.format_joined();
        lines.push(encode_row([
            record.email.as_str(),
            joined.as_str(),
            record.status.as_str(),
        ]));
    }
    lines.join("\n")
}

/// Export file name for a given day, e.g. `subscribers-list-2024-03-16.csv`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("subscribers-list-{}.csv", date.format("%Y-%m-%d"))
}

/// Write records to `<dir>/subscribers-list-<date>.csv`.
///
/// # Arguments
/// * `records` - Records to export
/// * `dir` - Target directory (created if missing)
/// * `date` - Date used in the file name
///
/// # Returns
/// * `Result<PathBuf>` - Path of the written file or error
///
/// # Details
/// Overwrites an export from the same day.
pub fn write_export(records: &[SubscriberRecord], dir: &Path, date: NaiveDate) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;

    let path = dir.join(export_file_name(date));
    fs::write(&path, to_csv(records))
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscribers::store::seed_subscribers;
    use tempfile::TempDir;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 16).unwrap()
    }

    #[test]
    fn test_to_csv_layout() {
        let records = seed_subscribers();
        let csv = to_csv(&records[..2]);
        assert_eq!(
            csv,
            "Email,Subscription Date,Status\n\
             john.doe@gmail.com,2024-01-15,active\n\
             priya.s@yahoo.com,2024-01-22,active"
        );
    }

    #[test]
    fn test_to_csv_empty_has_header_only() {
        assert_eq!(to_csv(&[]), "Email,Subscription Date,Status");
    }

    #[test]
    fn test_encode_field_escapes() {
        assert_eq!(encode_field("plain"), "plain");
        assert_eq!(encode_field("a,b"), "\"a,b\"");
        assert_eq!(encode_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(encode_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name(day()), "subscribers-list-2024-03-16.csv");
    }

    #[test]
    fn test_write_export_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("downloads");
        let records = seed_subscribers();

        let path = write_export(&records, &target, day()).unwrap();
        assert_eq!(path, target.join("subscribers-list-2024-03-16.csv"));

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), records.len() + 1);
        assert!(content.starts_with("Email,Subscription Date,Status\n"));
    }
}
