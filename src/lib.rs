//! umidedup - UMI-aware PCR duplicate removal for single-end SAM files
//!
//! A single streaming pass over a chromosome-grouped (usually
//! coordinate-sorted) SAM file. Two reads are duplicates when they share
//! chromosome, strand, strand-corrected 5' position and UMI; the first one
//! seen is kept and the rest are dropped. Reads whose UMI is not in the
//! reference list are dropped as well and counted separately.
//!
//! # Example
//!
//! ```ignore
//! use umidedup::{Args, run_dedup};
//!
//! let args = Args {
//!     input: "sorted.sam".into(),
//!     output: "dedup.sam".into(),
//!     umis: "STL96.txt".into(),
//!     strict_grouping: false,
//! };
//!
//! let counts = run_dedup(&args)?;
//! println!("{counts}");
//! ```

pub mod algorithm;
pub mod args;
pub mod cigar;
pub mod dedup;
pub mod error;
pub mod io;
pub mod metrics;
pub mod record;
pub mod umi;

use log::info;

// Re-export commonly used items
pub use algorithm::{extract_umi, get_5p_pos, is_reverse};
pub use args::Args;
pub use cigar::{CigarError, parse_cigar};
pub use dedup::{Deduplicator, Outcome};
pub use error::DedupError;
pub use metrics::DedupCounts;
pub use record::{AlignmentRecord, DuplicateKey};
pub use umi::UmiSet;

/// Deduplicate `args.input` into `args.output` using the UMIs in `args.umis`.
///
/// The output file is only created once the whole input has been processed.
pub fn run_dedup(args: &Args) -> Result<DedupCounts, DedupError> {
    let umis = io::load_umis(&args.umis)?;
    info!("loaded {} UMIs from {}", umis.len(), args.umis.display());

    let reader = io::open_input(&args.input)?;
    let mut output = io::AtomicOutput::create(&args.output)?;

    let counts = Deduplicator::new(&umis)
        .strict_grouping(args.strict_grouping)
        .paths(&args.input, output.path())
        .run(reader, &mut output)?;

    output.commit()?;
    Ok(counts)
}
