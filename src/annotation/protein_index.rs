use crate::error::{ReportError, ReportResult};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Protein id -> byte offset of the first sequence line of its record.
///
/// Built with one scan of the FASTA. Every lookup opens its own handle,
/// seeks, reads one record and drops the handle again, so no descriptor is
/// held between lookups.
#[derive(Debug)]
pub struct ProteinIndex {
    path: PathBuf,
    offsets: HashMap<String, u64>,
}

impl ProteinIndex {
    pub fn build(path: &Path) -> ReportResult<Self> {
        let file = File::open(path).map_err(|e| ReportError::input(path, e))?;
        let mut reader = BufReader::new(file);
        let mut offsets = HashMap::new();
        let mut offset = 0u64;
        let mut line = String::new();

        loop {
            line.clear();
            let read = reader
                .read_line(&mut line)
                .map_err(|e| ReportError::io(path, e))?;
            if read == 0 {
                break;
            }
            offset += read as u64;
            if let Some(header) = line.strip_prefix('>') {
                if let Some(id) = header.split_whitespace().next() {
                    offsets.insert(id.to_string(), offset);
                }
            }
        }

        Ok(ProteinIndex {
            path: path.to_path_buf(),
            offsets,
        })
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.offsets.contains_key(id)
    }

    pub fn offset(&self, id: &str) -> Option<u64> {
        self.offsets.get(id).copied()
    }

    /// The translation of `id` with line breaks removed, or `None` if the
    /// id was never indexed.
    pub fn fetch(&self, id: &str) -> ReportResult<Option<String>> {
        let Some(offset) = self.offset(id) else {
            return Ok(None);
        };

        let mut file = File::open(&self.path).map_err(|e| ReportError::input(&self.path, e))?;
        file.seek(SeekFrom::Start(offset))
            .map_err(|e| ReportError::io(&self.path, e))?;

        let mut sequence = String::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| ReportError::io(&self.path, e))?;
            if line.starts_with('>') {
                break;
            }
            sequence.push_str(line.trim());
        }
        Ok(Some(sequence))
    }
}
