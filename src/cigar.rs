//! CIGAR tokenizer
//!
//! Turns the text CIGAR column of a SAM record into a typed sequence of
//! `noodles` operations. Parsing is strict: anything that is not a run of
//! `<length><operator>` pairs is rejected up front.

use noodles::sam::alignment::record::cigar::Op;
use noodles::sam::alignment::record::cigar::op::Kind;
use thiserror::Error;

/// Largest operation length SAM allows (28 bits, as in the BAM encoding).
pub const MAX_OP_LEN: usize = (1 << 28) - 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CigarError {
    #[error("CIGAR is empty")]
    Empty,
    #[error("operator '{op}' at offset {offset} has no length")]
    MissingLength { op: char, offset: usize },
    #[error("invalid operator '{op}' at offset {offset}")]
    InvalidKind { op: char, offset: usize },
    #[error("trailing length without operator")]
    TrailingLength,
    #[error("zero-length operation at offset {offset}")]
    ZeroLength { offset: usize },
    #[error("operation length exceeds {max} at offset {offset}", max = MAX_OP_LEN)]
    LengthOverflow { offset: usize },
}

/// Map a SAM operator byte onto its `Kind`.
fn kind_from_byte(b: u8) -> Option<Kind> {
    match b {
        b'M' => Some(Kind::Match),
        b'I' => Some(Kind::Insertion),
        b'D' => Some(Kind::Deletion),
        b'N' => Some(Kind::Skip),
        b'S' => Some(Kind::SoftClip),
        b'H' => Some(Kind::HardClip),
        b'P' => Some(Kind::Pad),
        b'=' => Some(Kind::SequenceMatch),
        b'X' => Some(Kind::SequenceMismatch),
        _ => None,
    }
}

/// Tokenize a text CIGAR (e.g. `3S10M2D5M`) into operations, in order.
///
/// The unavailable marker `*` is rejected like any other malformed string;
/// callers that can ignore the CIGAR should not tokenize it.
pub fn parse_cigar(src: &[u8]) -> Result<Vec<Op>, CigarError> {
    if src.is_empty() {
        return Err(CigarError::Empty);
    }

    let mut ops = Vec::new();
    let mut len: Option<usize> = None;

    for (offset, &b) in src.iter().enumerate() {
        if b.is_ascii_digit() {
            let digit = usize::from(b - b'0');
            let next = len
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|n| n.checked_add(digit))
                .filter(|&n| n <= MAX_OP_LEN)
                .ok_or(CigarError::LengthOverflow { offset })?;
            len = Some(next);
            continue;
        }

        let kind = kind_from_byte(b).ok_or(CigarError::InvalidKind {
            op: char::from(b),
            offset,
        })?;
        match len.take() {
            None => {
                return Err(CigarError::MissingLength {
                    op: char::from(b),
                    offset,
                });
            }
            Some(0) => return Err(CigarError::ZeroLength { offset }),
            Some(n) => ops.push(Op::new(kind, n)),
        }
    }

    if len.is_some() {
        return Err(CigarError::TrailingLength);
    }

    Ok(ops)
}
