use datafusion_seq_format_core::record::{SequenceRecord, split_definition};
use datafusion_seq_format_core::scan::SequenceSource;
use needletail::parse_fastx_file;
use needletail::parser::{FastxReader, SequenceRecord as FastxRecord};
use std::io::{Error, ErrorKind};

/// Filename suffixes recognized as FASTA, gzip variants included.
pub const FASTA_SUFFIXES: &[&str] = &[".fa", ".fasta", ".fa.gz", ".fasta.gz"];

/// Extension tag for FASTA copy targets.
pub const FASTA_EXTENSION: &str = "fasta";

/// Record reader over one local FASTA file.
///
/// Backed by needletail, which detects gzip-compressed input transparently,
/// so `.fa`, `.fasta` and their `.gz` variants all read through the same
/// path. Dropping the reader closes the file handle.
pub struct FastaLocalReader {
    inner: Box<dyn FastxReader>,
}

impl FastaLocalReader {
    /// Opens `file_path` for record-at-a-time reading.
    pub fn new(file_path: &str) -> Result<Self, Error> {
        let inner = parse_fastx_file(file_path)
            .map_err(|e| Error::new(ErrorKind::InvalidData, e.to_string()))?;
        Ok(Self { inner })
    }
}

fn map_record(record: FastxRecord<'_>) -> Result<SequenceRecord, Error> {
    let header = std::str::from_utf8(record.id())
        .map_err(|e| Error::new(ErrorKind::InvalidData, e))?;
    let (id, description) = split_definition(header);
    let sequence = std::str::from_utf8(&record.seq())
        .map_err(|e| Error::new(ErrorKind::InvalidData, e))?
        .to_string();
    Ok(SequenceRecord {
        id,
        description,
        sequence,
        quality_scores: None,
    })
}

impl SequenceSource for FastaLocalReader {
    fn read_burst(&mut self, max_records: usize) -> Result<Vec<SequenceRecord>, Error> {
        let mut records = Vec::with_capacity(max_records);
        while records.len() < max_records {
            match self.inner.next() {
                Some(Ok(record)) => records.push(map_record(record)?),
                Some(Err(e)) => return Err(Error::new(ErrorKind::InvalidData, e.to_string())),
                None => break,
            }
        }
        Ok(records)
    }
}
