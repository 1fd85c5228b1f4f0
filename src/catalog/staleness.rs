//! Age check for the catalog directory.
//!
//! Whatever refreshes the catalogs writes the refresh date (`YYYY-MM-DD`) into
//! `_last_update` next to the DAT files. Catalogs count as stale once a calendar
//! month has passed since then.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

/// Marker file holding the date of the last catalog refresh
pub const LAST_UPDATE_FILE: &str = "_last_update";

/// Date of the last refresh, when it is from an earlier month than `today`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Staleness {
    pub last_update: NaiveDate,
}

/// Check the `_last_update` marker in `dir` against `today`.
///
/// Returns `None` when the catalogs are current, or when the marker is missing
/// or unreadable; staleness is advisory only.
#[must_use]
pub fn catalog_staleness(dir: &Path, today: NaiveDate) -> Option<Staleness> {
    let path = dir.join(LAST_UPDATE_FILE);
    let content = std::fs::read_to_string(&path).ok()?;

    let last_update = match NaiveDate::parse_from_str(content.trim(), "%Y-%m-%d") {
        Ok(date) => date,
        Err(e) => {
            debug!("Ignoring unparseable {}: {e}", path.display());
            return None;
        }
    };

    if (last_update.year(), last_update.month()) < (today.year(), today.month()) {
        Some(Staleness { last_update })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dir_with_marker(content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(LAST_UPDATE_FILE), content).unwrap();
        dir
    }

    #[test]
    fn test_same_month_is_current() {
        let dir = dir_with_marker("2026-10-01\n");
        assert_eq!(catalog_staleness(dir.path(), date(2026, 10, 31)), None);
    }

    #[test]
    fn test_previous_month_is_stale() {
        let dir = dir_with_marker("2026-09-30");
        assert_eq!(
            catalog_staleness(dir.path(), date(2026, 10, 1)),
            Some(Staleness {
                last_update: date(2026, 9, 30)
            })
        );
    }

    #[test]
    fn test_later_month_of_previous_year_is_stale() {
        let dir = dir_with_marker("2025-12-15");
        assert!(catalog_staleness(dir.path(), date(2026, 1, 2)).is_some());
    }

    #[test]
    fn test_missing_or_garbled_marker() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(catalog_staleness(dir.path(), date(2026, 1, 1)), None);

        let dir = dir_with_marker("last tuesday");
        assert_eq!(catalog_staleness(dir.path(), date(2026, 1, 1)), None);
    }
}
