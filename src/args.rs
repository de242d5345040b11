// Command-line argument parsing
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "umidedup",
    version,
    about = "Remove PCR duplicates from a sorted single-end SAM using UMIs"
)]
pub struct Args {
    /// Sorted SAM file to deduplicate
    #[arg(short = 'f', long)]
    pub input: PathBuf,
    /// Deduplicated SAM file to write
    #[arg(short, long)]
    pub output: PathBuf,
    /// File listing the valid UMIs, one per line
    #[arg(short, long)]
    pub umis: PathBuf,
    /// Abort when a chromosome reappears after another one instead of warning
    #[arg(long)]
    pub strict_grouping: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_short_flags() {
        let args = Args::try_parse_from([
            "umidedup", "-f", "in.sam", "-o", "out.sam", "-u", "STL96.txt",
        ])
        .unwrap();
        assert_eq!(args.input, PathBuf::from("in.sam"));
        assert_eq!(args.output, PathBuf::from("out.sam"));
        assert_eq!(args.umis, PathBuf::from("STL96.txt"));
        assert!(!args.strict_grouping);
    }

    #[test]
    fn test_args_long_flags() {
        let args = Args::try_parse_from([
            "umidedup",
            "--input",
            "in.sam",
            "--output",
            "out.sam",
            "--umis",
            "umis.txt",
            "--strict-grouping",
        ])
        .unwrap();
        assert!(args.strict_grouping);
    }

    #[test]
    fn test_args_all_paths_required() {
        assert!(Args::try_parse_from(["umidedup", "-f", "in.sam", "-o", "out.sam"]).is_err());
        assert!(Args::try_parse_from(["umidedup", "-u", "umis.txt"]).is_err());
    }
}
