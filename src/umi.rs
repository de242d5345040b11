//! The reference list of valid UMIs

use std::collections::HashSet;
use std::io::BufRead;

use bstr::io::BufReadExt;
use bstr::{BString, ByteSlice};

/// Exact-match set of known UMIs. No error tolerance.
#[derive(Debug, Default, Clone)]
pub struct UmiSet {
    umis: HashSet<BString>,
}

impl UmiSet {
    /// Read one UMI per line. Surrounding whitespace is stripped and blank
    /// lines are skipped.
    pub fn from_reader<R: BufRead>(mut reader: R) -> std::io::Result<Self> {
        let mut umis = HashSet::new();
        reader.for_byte_line(|line| {
            let umi = line.trim();
            if !umi.is_empty() {
                umis.insert(BString::from(umi));
            }
            Ok(true)
        })?;
        Ok(Self { umis })
    }

    #[inline]
    pub fn contains(&self, umi: &[u8]) -> bool {
        self.umis.contains(umi.as_bstr())
    }

    pub fn len(&self) -> usize {
        self.umis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.umis.is_empty()
    }
}

impl<T: Into<BString>> FromIterator<T> for UmiSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            umis: iter.into_iter().map(Into::into).collect(),
        }
    }
}
