//! SAM text records and the duplicate key derived from them
//!
//! Only QNAME, FLAG, RNAME, POS and CIGAR are looked at. The record borrows
//! from the input line so a retained line can be written back untouched.

use bstr::{BString, ByteSlice};
use thiserror::Error;

use crate::algorithm::{extract_umi, get_5p_pos, is_reverse};
use crate::cigar::CigarError;

/// Minimum number of tab-separated columns: QNAME FLAG RNAME POS MAPQ CIGAR.
pub const MIN_FIELDS: usize = 6;

const QNAME: usize = 0;
const FLAG: usize = 1;
const RNAME: usize = 2;
const POS: usize = 3;
const CIGAR: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("expected at least {min} tab-separated fields, found {0}", min = MIN_FIELDS)]
    TooFewFields(usize),
    #[error("FLAG is not an integer in 0..=65535: {0:?}")]
    InvalidFlag(BString),
    #[error("POS is not a non-negative integer: {0:?}")]
    InvalidPosition(BString),
}

/// Header lines start with `@` and bypass deduplication entirely.
#[inline]
pub fn is_header(line: &[u8]) -> bool {
    line.first() == Some(&b'@')
}

/// The columns of one alignment line that duplicate detection needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentRecord<'a> {
    pub qname: &'a [u8],
    pub flag: u16,
    pub rname: &'a [u8],
    pub pos: i64,
    pub cigar: &'a [u8],
}

impl<'a> AlignmentRecord<'a> {
    /// Parse a non-header SAM line. A trailing `\n` or `\r\n` is ignored.
    pub fn parse(line: &'a [u8]) -> Result<Self, RecordError> {
        let line = line.trim_end_with(|c| c == '\n' || c == '\r');

        let mut fields = [&b""[..]; MIN_FIELDS];
        let mut n = 0;
        for field in line.split_str("\t").take(MIN_FIELDS) {
            fields[n] = field;
            n += 1;
        }
        if n < MIN_FIELDS {
            return Err(RecordError::TooFewFields(n));
        }

        let flag = fields[FLAG]
            .to_str()
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .ok_or_else(|| RecordError::InvalidFlag(BString::from(fields[FLAG])))?;
        let pos = fields[POS]
            .to_str()
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .map(i64::from)
            .ok_or_else(|| RecordError::InvalidPosition(BString::from(fields[POS])))?;

        Ok(Self {
            qname: fields[QNAME],
            flag,
            rname: fields[RNAME],
            pos,
            cigar: fields[CIGAR],
        })
    }

    #[inline]
    pub fn umi(&self) -> &'a [u8] {
        extract_umi(self.qname)
    }

    #[inline]
    pub fn is_reverse(&self) -> bool {
        is_reverse(self.flag)
    }

    pub fn five_prime_pos(&self) -> Result<i64, CigarError> {
        get_5p_pos(self.pos, self.cigar, self.is_reverse())
    }

    /// Build the duplicate key. Fails only on a malformed CIGAR of a reverse read.
    pub fn duplicate_key(&self) -> Result<DuplicateKey, CigarError> {
        Ok(DuplicateKey {
            chromosome: BString::from(self.rname),
            five_prime: self.five_prime_pos()?,
            reverse: self.is_reverse(),
            umi: BString::from(self.umi()),
        })
    }
}

/// Two records are duplicates iff their keys are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateKey {
    pub chromosome: BString,
    pub five_prime: i64,
    pub reverse: bool,
    pub umi: BString,
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &[u8] =
        b"NS500451:154:HWKTMBGXX:1:11101:24260:1121:CTGTTCAC\t0\t2\t76814284\t36\t71M\t*\t0\t0\tTCCACCACAATCTTACCATCC\t6AEEEEEEAEEAEEEEAAEEE\tMD:Z:71\tNH:i:1\n";

    #[test]
    fn test_is_header() {
        assert!(is_header(b"@HD\tVN:1.0\tSO:coordinate\n"));
        assert!(!is_header(LINE));
        assert!(!is_header(b""));
    }

    #[test]
    fn test_parse_full_line() {
        let r = AlignmentRecord::parse(LINE).unwrap();
        assert_eq!(r.flag, 0);
        assert_eq!(r.rname, b"2");
        assert_eq!(r.pos, 76814284);
        assert_eq!(r.cigar, b"71M");
        assert_eq!(r.umi(), b"CTGTTCAC");
        assert!(!r.is_reverse());
    }

    #[test]
    fn test_parse_minimal_six_fields_with_crlf() {
        let r = AlignmentRecord::parse(b"q:AAAA\t16\tchr1\t100\t60\t5M3S\r\n").unwrap();
        assert_eq!(r.cigar, b"5M3S");
        assert!(r.is_reverse());
        assert_eq!(r.five_prime_pos(), Ok(107));
    }

    #[test]
    fn test_parse_too_few_fields() {
        assert_eq!(
            AlignmentRecord::parse(b"q:AAAA\t0\tchr1\t100\t60\n"),
            Err(RecordError::TooFewFields(5))
        );
        assert_eq!(AlignmentRecord::parse(b"\n"), Err(RecordError::TooFewFields(1)));
    }

    #[test]
    fn test_parse_bad_flag() {
        assert!(matches!(
            AlignmentRecord::parse(b"q:AAAA\tx\tchr1\t100\t60\t10M\n"),
            Err(RecordError::InvalidFlag(_))
        ));
        assert!(matches!(
            AlignmentRecord::parse(b"q:AAAA\t70000\tchr1\t100\t60\t10M\n"),
            Err(RecordError::InvalidFlag(_))
        ));
    }

    #[test]
    fn test_parse_bad_position() {
        assert!(matches!(
            AlignmentRecord::parse(b"q:AAAA\t0\tchr1\t1e5\t60\t10M\n"),
            Err(RecordError::InvalidPosition(_))
        ));
        assert!(matches!(
            AlignmentRecord::parse(b"q:AAAA\t0\tchr1\t-5\t60\t10M\n"),
            Err(RecordError::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_duplicate_key_fields() {
        let r = AlignmentRecord::parse(b"q:1:GGTT\t16\tchrX\t200\t60\t3S10M2S\n").unwrap();
        let key = r.duplicate_key().unwrap();
        assert_eq!(key.chromosome, "chrX");
        assert_eq!(key.five_prime, 200 + 10 + 2 - 1);
        assert!(key.reverse);
        assert_eq!(key.umi, "GGTT");
    }

    #[test]
    fn test_keys_differ_by_strand() {
        let fwd = AlignmentRecord::parse(b"a:AAAA\t0\tchr1\t100\t60\t1M\n").unwrap();
        let rev = AlignmentRecord::parse(b"b:AAAA\t16\tchr1\t100\t60\t1M\n").unwrap();
        // same coordinate (1M on reverse ends where it starts), different strand
        assert_eq!(fwd.five_prime_pos(), rev.five_prime_pos());
        assert_ne!(fwd.duplicate_key().unwrap(), rev.duplicate_key().unwrap());
    }
}
