use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_change_line<Tz>(time: &DateTime<Tz>, from: &str, to: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("{}: {} => {}", time.format(TIMESTAMP_FORMAT), from, to)
}

/// Appends one timestamped line; the file is opened and closed per call.
pub fn append_change(log_path: &Path, from: &str, to: &str) -> Result<()> {
    let line = format_change_line(&Local::now(), from, to);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("failed to open change log: {}", log_path.display()))?;
    writeln!(file, "{line}")
        .with_context(|| format!("failed to write change log: {}", log_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn line_uses_fixed_timestamp_layout() {
        let time = NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_opt(7, 5, 1))
            .expect("valid date")
            .and_utc();
        assert_eq!(
            format_change_line(&time, "IMG0001.jpg", "PHOTO0001.jpg"),
            "2024-03-09 07:05:01: IMG0001.jpg => PHOTO0001.jpg"
        );
    }

    #[test]
    fn append_keeps_existing_lines() {
        let temp = tempdir().expect("tempdir");
        let log_path = temp.path().join("changes.log");
        fs::write(&log_path, "earlier\n").expect("seed log");

        append_change(&log_path, "a.txt", "b.txt").expect("first append");
        append_change(&log_path, "c.txt", "d.txt").expect("second append");

        let body = fs::read_to_string(&log_path).expect("read log");
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "earlier");
        assert!(lines[1].ends_with(": a.txt => b.txt"));
        assert!(lines[2].ends_with(": c.txt => d.txt"));
        assert_eq!(lines[1].len(), "YYYY-MM-DD HH:MM:SS: a.txt => b.txt".len());
    }

    #[test]
    fn append_fails_for_missing_parent() {
        let temp = tempdir().expect("tempdir");
        let log_path = temp.path().join("missing").join("changes.log");
        let err = append_change(&log_path, "a", "b").expect_err("parent does not exist");
        assert!(err.to_string().contains("failed to open change log"));
    }
}
