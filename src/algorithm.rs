//! Strand-aware duplicate signature helpers
//!
//! Everything needed to turn the raw QNAME/FLAG/POS/CIGAR columns of a
//! single-end record into the pieces of its duplicate key.

use bstr::ByteSlice;
use noodles::sam::alignment::record::Flags;
use noodles::sam::alignment::record::cigar::Op;
use noodles::sam::alignment::record::cigar::op::Kind;

use crate::cigar::{CigarError, parse_cigar};

/// True iff the 0x10 (reverse complemented) bit is set. Other bits are ignored.
#[inline]
pub fn is_reverse(flag: u16) -> bool {
    Flags::from(flag).is_reverse_complemented()
}

/// The UMI is whatever follows the last `:` of the read name.
///
/// A name without any `:` is returned whole; validity is decided later by
/// the UMI reference set.
#[inline]
pub fn extract_umi(qname: &[u8]) -> &[u8] {
    qname.rsplit_str(":").next().unwrap_or(qname)
}

/// Calculate the strand-corrected 5' position of a read.
///
/// Forward reads are anchored at `pos` and the CIGAR is never looked at.
/// Reverse reads are tokenized and handed to [`reverse_5p_pos`].
pub fn get_5p_pos(pos: i64, cigar: &[u8], reverse: bool) -> Result<i64, CigarError> {
    if !reverse {
        return Ok(pos);
    }
    let ops = parse_cigar(cigar)?;
    Ok(reverse_5p_pos(pos, &ops))
}

/// 5' end of a reverse-strand alignment.
///
/// `M`, `D` and `N` make up the aligned span. A soft clip counts only when
/// it is the very last operation; a leading clip sits on the 3' end of a
/// reverse read. Hard clips, `=`/`X` and trailing clips hidden behind an `H`
/// are not counted.
///
/// `parse_cigar` caps each length at `MAX_OP_LEN`, so the sum stays far
/// inside `i64` for any line that fits in memory.
pub fn reverse_5p_pos(pos: i64, ops: &[Op]) -> i64 {
    let mut aligned_len = 0i64;
    let mut soft_clip_end = 0i64;
    let last = ops.len().saturating_sub(1);

    for (i, op) in ops.iter().enumerate() {
        match op.kind() {
            Kind::Match | Kind::Deletion | Kind::Skip => aligned_len += op.len() as i64,
            Kind::SoftClip if i == last => soft_clip_end = op.len() as i64,
            _ => {}
        }
    }

    pos + aligned_len + soft_clip_end - 1
}
