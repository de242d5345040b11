//! SAM file I/O utilities
//!
//! Opening the input and UMI list, and writing the output through a
//! temporary file so that a failed run never leaves a truncated SAM behind.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};

use crate::error::DedupError;
use crate::umi::UmiSet;

const READ_BUFFER: usize = 1 << 18;
const WRITE_BUFFER: usize = 1 << 20;

/// Open a SAM file for buffered line reading
pub fn open_input(path: &Path) -> Result<BufReader<File>, DedupError> {
    let file = File::open(path).map_err(|e| DedupError::io(e, path))?;
    Ok(BufReader::with_capacity(READ_BUFFER, file))
}

/// Load the UMI reference list, one UMI per line
pub fn load_umis(path: &Path) -> Result<UmiSet, DedupError> {
    let file = File::open(path).map_err(|e| DedupError::io(e, path))?;
    UmiSet::from_reader(BufReader::new(file)).map_err(|e| DedupError::io(e, path))
}

/// Output file that only appears at its final path once [`commit`](Self::commit) succeeds.
///
/// Data goes to a hidden temporary file next to the destination, so the final
/// rename stays on one filesystem. Dropping without committing removes it.
pub struct AtomicOutput {
    path: PathBuf,
    writer: BufWriter<NamedTempFile>,
}

impl AtomicOutput {
    pub fn create(path: &Path) -> Result<Self, DedupError> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut builder = Builder::new();
        builder.prefix(".umidedup").suffix(".sam.tmp");
        // same mode as a plain File::create, instead of tempfile's 0600
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }
        let tmp = builder
            .tempfile_in(dir)
            .map_err(|e| DedupError::io(e, dir))?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::with_capacity(WRITE_BUFFER, tmp),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and move the temporary file over the destination.
    pub fn commit(self) -> Result<(), DedupError> {
        let tmp = self
            .writer
            .into_inner()
            .map_err(|e| DedupError::io(e.into_error(), &self.path))?;
        tmp.persist(&self.path)
            .map_err(|e| DedupError::io(e.error, &self.path))?;
        Ok(())
    }
}

impl Write for AtomicOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.writer.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
