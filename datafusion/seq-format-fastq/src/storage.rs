use datafusion_seq_format_core::record::{SequenceRecord, split_definition};
use datafusion_seq_format_core::scan::SequenceSource;
use needletail::parse_fastx_file;
use needletail::parser::{FastxReader, SequenceRecord as FastxRecord};
use std::io::{Error, ErrorKind};

/// Filename suffixes recognized as FASTQ, gzip variants included.
pub const FASTQ_SUFFIXES: &[&str] = &[".fq", ".fastq", ".fq.gz", ".fastq.gz"];

/// Extension tag for FASTQ copy targets.
pub const FASTQ_EXTENSION: &str = "fastq";

/// Record reader over one local FASTQ file.
///
/// Backed by needletail, which detects gzip-compressed input transparently.
/// Dropping the reader closes the file handle.
pub struct FastqLocalReader {
    inner: Box<dyn FastxReader>,
}

impl FastqLocalReader {
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
    // An empty quality string maps to None so it surfaces as NULL, mirroring
    // the description policy.
    let quality_scores = match record.qual() {
        Some(qual) if !qual.is_empty() => Some(
            std::str::from_utf8(qual)
                .map_err(|e| Error::new(ErrorKind::InvalidData, e))?
                .to_string(),
        ),
        _ => None,
    };
    Ok(SequenceRecord {
        id,
        description,
        sequence,
        quality_scores,
    })
}

impl SequenceSource for FastqLocalReader {
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
