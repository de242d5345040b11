//! Single-pass UMI-aware duplicate removal
//!
//! Records are streamed in input order. Each one is either written through
//! untouched or dropped, so the output is always an order-preserving
//! subsequence of the input.
//!
//! The seen-set only covers the chromosome block currently being read. It is
//! cleared whenever RNAME changes, which means the input must be grouped by
//! chromosome (a coordinate-sorted SAM is). A chromosome whose block shows up
//! again later is reported, and with strict grouping enabled it is an error;
//! otherwise duplicates spanning the two blocks go undetected.

use std::collections::HashSet;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use bstr::{BString, ByteSlice};
use log::{debug, info, warn};

use crate::error::DedupError;
use crate::metrics::DedupCounts;
use crate::record::{AlignmentRecord, DuplicateKey, is_header};
use crate::umi::UmiSet;

/// Log progress every this many lines
const PROGRESS_INTERVAL: u64 = 1_000_000;

/// What happened to one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Header,
    Unique,
    Duplicate,
    InvalidUmi,
}

impl Outcome {
    /// Whether the line belongs in the output.
    #[inline]
    pub fn is_kept(self) -> bool {
        matches!(self, Outcome::Header | Outcome::Unique)
    }
}

/// State of one deduplication pass.
pub struct Deduplicator<'a> {
    umis: &'a UmiSet,
    strict_grouping: bool,
    input: PathBuf,
    output: PathBuf,
    /// `None` until the first alignment record.
    current: Option<BString>,
    seen: HashSet<DuplicateKey>,
    finished: HashSet<BString>,
    counts: DedupCounts,
    block_start: DedupCounts,
    line: u64,
}

impl<'a> Deduplicator<'a> {
    pub fn new(umis: &'a UmiSet) -> Self {
        Self {
            umis,
            strict_grouping: false,
            input: PathBuf::from("<input>"),
            output: PathBuf::from("<output>"),
            current: None,
            seen: HashSet::new(),
            finished: HashSet::new(),
            counts: DedupCounts::default(),
            block_start: DedupCounts::default(),
            line: 0,
        }
    }

    /// Fail instead of warning when a chromosome block reappears.
    pub fn strict_grouping(mut self, strict: bool) -> Self {
        self.strict_grouping = strict;
        self
    }

    /// Paths reported in I/O errors.
    pub fn paths(mut self, input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        self.input = input.into();
        self.output = output.into();
        self
    }

    pub fn counts(&self) -> DedupCounts {
        self.counts
    }

    /// Classify one line (terminator included) and update the state.
    pub fn process(&mut self, line: &[u8]) -> Result<Outcome, DedupError> {
        self.line += 1;

        if is_header(line) {
            return Ok(Outcome::Header);
        }

        let record = AlignmentRecord::parse(line).map_err(|source| DedupError::MalformedRecord {
            line: self.line,
            source,
        })?;

        self.enter_chromosome(record.rname)?;

        if !self.umis.contains(record.umi()) {
            self.counts.invalid_umi += 1;
            return Ok(Outcome::InvalidUmi);
        }

        let key = record
            .duplicate_key()
            .map_err(|source| DedupError::MalformedCigar {
                line: self.line,
                cigar: BString::from(record.cigar),
                source,
            })?;

        if self.seen.insert(key) {
            self.counts.unique += 1;
            Ok(Outcome::Unique)
        } else {
            self.counts.duplicates += 1;
            Ok(Outcome::Duplicate)
        }
    }

    /// Reset the seen-set when RNAME differs from the previous record's.
    fn enter_chromosome(&mut self, rname: &[u8]) -> Result<(), DedupError> {
        if self
            .current
            .as_ref()
            .is_some_and(|c| c.as_slice() == rname)
        {
            return Ok(());
        }

        if let Some(prev) = self.current.take() {
            self.log_block(&prev);
            self.finished.insert(prev);
        }

        if self.finished.contains(rname.as_bstr()) {
            if self.strict_grouping {
                return Err(DedupError::UngroupedInput {
                    line: self.line,
                    chromosome: BString::from(rname),
                });
            }
            warn!(
                "chromosome {} reappears at line {}; duplicates across its blocks will not be detected",
                rname.as_bstr(),
                self.line
            );
        }

        self.seen.clear();
        self.current = Some(BString::from(rname));
        self.block_start = self.counts;
        Ok(())
    }

    fn log_block(&self, chromosome: &BString) {
        debug!(
            "{}: kept {}, duplicates {}, invalid UMI {}",
            chromosome,
            self.counts.unique - self.block_start.unique,
            self.counts.duplicates - self.block_start.duplicates,
            self.counts.invalid_umi - self.block_start.invalid_umi
        );
    }

    /// Stream `reader` into `writer`, keeping headers and first-seen records.
    pub fn run<R, W>(mut self, mut reader: R, mut writer: W) -> Result<DedupCounts, DedupError>
    where
        R: BufRead,
        W: Write,
    {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| DedupError::io(e, &self.input))?;
            if n == 0 {
                break;
            }

            if self.process(&buf)?.is_kept() {
                writer
                    .write_all(&buf)
                    .map_err(|e| DedupError::io(e, &self.output))?;
            }

            if self.line % PROGRESS_INTERVAL == 0 {
                info!("processed {} lines", self.line);
            }
        }
        writer.flush().map_err(|e| DedupError::io(e, &self.output))?;

        if let Some(last) = &self.current {
            self.log_block(last);
        }

        Ok(self.counts)
    }
}
