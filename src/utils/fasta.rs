use crate::error::{ReportError, ReportResult};
use bio::io::fasta;
use niffler::get_reader;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub type FastaReader = fasta::Reader<BufReader<Box<dyn Read>>>;

/// Open a plain or compressed FASTA for sequential record reading.
pub fn open_fasta(path: &Path) -> ReportResult<FastaReader> {
    let file = File::open(path).map_err(|e| ReportError::input(path, e))?;
    let (inner_reader, _compression) = get_reader(Box::new(file))
        .map_err(|e| ReportError::io(path, std::io::Error::other(e.to_string())))?;
    Ok(fasta::Reader::new(inner_reader))
}
