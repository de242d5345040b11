use std::path::PathBuf;

use bstr::BString;
use thiserror::Error;

use crate::cigar::CigarError;
use crate::record::RecordError;

/// Errors that abort a deduplication run.
#[derive(Debug, Error)]
pub enum DedupError {
    #[error("file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed record at line {line}: {source}")]
    MalformedRecord { line: u64, source: RecordError },

    #[error("malformed CIGAR {cigar:?} at line {line}: {source}")]
    MalformedCigar {
        line: u64,
        cigar: BString,
        source: CigarError,
    },

    #[error("chromosome {chromosome:?} reappears at line {line}; input is not grouped by chromosome")]
    UngroupedInput { line: u64, chromosome: BString },
}

impl DedupError {
    /// Wrap an `io::Error` with the path it happened on. A missing file
    /// becomes [`DedupError::FileNotFound`].
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_not_found_maps_to_file_not_found() {
        let err = DedupError::io(io::Error::from(io::ErrorKind::NotFound), "/no/such.sam");
        assert!(matches!(err, DedupError::FileNotFound { ref path } if path.ends_with("such.sam")));
        assert_eq!(err.to_string(), "file not found: /no/such.sam");
    }

    #[test]
    fn test_io_other_kind_keeps_source() {
        let err = DedupError::io(io::Error::from(io::ErrorKind::PermissionDenied), "out.sam");
        assert!(matches!(err, DedupError::Io { .. }));
    }

    #[test]
    fn test_messages_carry_line_numbers() {
        let err = DedupError::MalformedRecord {
            line: 12,
            source: RecordError::TooFewFields(3),
        };
        assert!(err.to_string().contains("line 12"));

        let err = DedupError::MalformedCigar {
            line: 7,
            cigar: BString::from("10M5"),
            source: CigarError::TrailingLength,
        };
        assert!(err.to_string().contains("\"10M5\""));
    }
}
