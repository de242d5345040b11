//! Counters for one deduplication run

use std::fmt;
use std::time::Duration;

/// Outcome counts. Every non-header record lands in exactly one bucket.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DedupCounts {
    pub unique: u64,
    pub duplicates: u64,
    pub invalid_umi: u64,
}

impl DedupCounts {
    /// Number of non-header records seen.
    #[inline]
    pub fn total(&self) -> u64 {
        self.unique + self.duplicates + self.invalid_umi
    }

    /// Duplicates as a fraction of records with a valid UMI.
    pub fn duplicate_fraction(&self) -> f64 {
        let valid = self.unique + self.duplicates;
        if valid == 0 {
            0.0
        } else {
            self.duplicates as f64 / valid as f64
        }
    }
}

impl fmt::Display for DedupCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Dedup complete.")?;
        writeln!(f, "Unique reads kept: {}", self.unique)?;
        writeln!(f, "Duplicates removed: {}", self.duplicates)?;
        write!(f, "Invalid UMIs skipped: {}", self.invalid_umi)
    }
}

/// Format elapsed time as "X min Y sec", or "N.N sec" under a minute
pub fn format_elapsed(dur: Duration) -> String {
    let secs = dur.as_secs();
    if secs >= 60 {
        format!("{} min {} sec", secs / 60, secs % 60)
    } else {
        format!("{:.1} sec", dur.as_secs_f64())
    }
}

/// Records per second, 0 for a zero-length run
pub fn records_per_sec(records: u64, dur: Duration) -> f64 {
    let secs = dur.as_secs_f64();
    if secs > 0.0 { records as f64 / secs } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_and_fraction() {
        let counts = DedupCounts {
            unique: 3,
            duplicates: 1,
            invalid_umi: 2,
        };
        assert_eq!(counts.total(), 6);
        assert!((counts.duplicate_fraction() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fraction_empty_run() {
        assert_eq!(DedupCounts::default().duplicate_fraction(), 0.0);
    }

    #[test]
    fn test_summary_text() {
        let counts = DedupCounts {
            unique: 2,
            duplicates: 1,
            invalid_umi: 1,
        };
        assert_eq!(
            counts.to_string(),
            "\nDedup complete.\nUnique reads kept: 2\nDuplicates removed: 1\nInvalid UMIs skipped: 1"
        );
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(125)), "2 min 5 sec");
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "1.5 sec");
    }

    #[test]
    fn test_records_per_sec() {
        assert_eq!(records_per_sec(100, Duration::from_secs(4)), 25.0);
        assert_eq!(records_per_sec(100, Duration::ZERO), 0.0);
    }
}
