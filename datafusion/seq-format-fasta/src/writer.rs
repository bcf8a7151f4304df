//! Writer for FASTA files with compression support
//!
//! Output compression is chosen from the destination path: `.gz` means GZIP,
//! anything else is written as plain text.

use datafusion::common::{DataFusionError, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use noodles_fasta as fasta;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Compression applied to FASTA output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FastaCompressionType {
    /// Plain text output.
    #[default]
    Plain,
    /// Standard GZIP compression.
    Gzip,
}

impl FastaCompressionType {
    /// Determines the compression type from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path_str = path.as_ref().to_string_lossy().to_lowercase();
        if path_str.ends_with(".gz") {
            FastaCompressionType::Gzip
        } else {
            FastaCompressionType::Plain
        }
    }
}

/// A unified writer for FASTA files supporting both compression formats.
///
/// `finish` consumes the writer, so the output stream is finalized exactly
/// once; there is no way to write past it or finalize twice.
pub enum FastaLocalWriter {
    /// Writer for uncompressed FASTA files.
    Plain(fasta::io::Writer<BufWriter<File>>),
    /// Writer for GZIP-compressed FASTA files.
    Gzip(fasta::io::Writer<GzEncoder<BufWriter<File>>>),
}

impl FastaLocalWriter {
    /// Creates a writer for `path` with compression detected from its
    /// extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let compression = FastaCompressionType::from_path(&path);
        Self::with_compression(path, compression)
    }

    /// Creates a writer with an explicit compression type.
    pub fn with_compression<P: AsRef<Path>>(
        path: P,
        compression: FastaCompressionType,
    ) -> Result<Self> {
        let file = File::create(path.as_ref()).map_err(|e| {
            DataFusionError::Execution(format!("Failed to create output file: {e}"))
        })?;
        let buf_writer = BufWriter::new(file);

        match compression {
            FastaCompressionType::Plain => {
                Ok(FastaLocalWriter::Plain(fasta::io::Writer::new(buf_writer)))
            }
            FastaCompressionType::Gzip => {
                let encoder = GzEncoder::new(buf_writer, Compression::default());
                Ok(FastaLocalWriter::Gzip(fasta::io::Writer::new(encoder)))
            }
        }
    }

    /// Writes a single FASTA record.
    pub fn write_record(&mut self, record: &fasta::Record) -> Result<()> {
        match self {
            FastaLocalWriter::Plain(writer) => writer.write_record(record),
            FastaLocalWriter::Gzip(writer) => writer.write_record(record),
        }
        .map_err(|e| DataFusionError::Execution(format!("Failed to write FASTA record: {e}")))
    }

    /// Writes records in order.
    pub fn write_records(&mut self, records: &[fasta::Record]) -> Result<()> {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Flushes buffered output, finishes the compression stream for gzip
    /// output, and closes the file. Consumes the writer.
    pub fn finish(self) -> Result<()> {
        match self {
            FastaLocalWriter::Plain(writer) => {
                let mut buf_writer = writer.into_inner();
                buf_writer
                    .flush()
                    .map_err(|e| DataFusionError::Execution(format!("Failed to flush writer: {e}")))
            }
            FastaLocalWriter::Gzip(writer) => {
                let encoder = writer.into_inner();
                encoder.finish().map_err(|e| {
                    DataFusionError::Execution(format!("Failed to finish GZIP stream: {e}"))
                })?;
                Ok(())
            }
        }
    }
}
