//! Writer for FASTQ files with compression support
//!
//! Output compression is chosen from the destination path: `.gz` means GZIP,
//! anything else is written as plain text.

use datafusion::common::{DataFusionError, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use noodles_fastq as fastq;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Compression applied to FASTQ output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FastqCompressionType {
    /// Plain text output.
    #[default]
    Plain,
    /// Standard GZIP compression.
    Gzip,
}

impl FastqCompressionType {
    /// Determines the compression type from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path_str = path.as_ref().to_string_lossy().to_lowercase();
        if path_str.ends_with(".gz") {
            FastqCompressionType::Gzip
        } else {
            FastqCompressionType::Plain
        }
    }
}

/// A unified writer for FASTQ files supporting both compression formats.
///
/// `finish` consumes the writer, so the output stream is finalized exactly
/// once; there is no way to write past it or finalize twice.
pub enum FastqLocalWriter {
    /// Writer for uncompressed FASTQ files.
    Plain(fastq::io::Writer<BufWriter<File>>),
    /// Writer for GZIP-compressed FASTQ files.
    Gzip(fastq::io::Writer<GzEncoder<BufWriter<File>>>),
}

impl FastqLocalWriter {
    /// Creates a writer for `path` with compression detected from its
    /// extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let compression = FastqCompressionType::from_path(&path);
        Self::with_compression(path, compression)
    }

    /// Creates a writer with an explicit compression type.
    pub fn with_compression<P: AsRef<Path>>(
        path: P,
        compression: FastqCompressionType,
    ) -> Result<Self> {
        let file = File::create(path.as_ref()).map_err(|e| {
            DataFusionError::Execution(format!("Failed to create output file: {e}"))
        })?;
        let buf_writer = BufWriter::new(file);

        match compression {
            FastqCompressionType::Plain => {
                Ok(FastqLocalWriter::Plain(fastq::io::Writer::new(buf_writer)))
            }
            FastqCompressionType::Gzip => {
                let encoder = GzEncoder::new(buf_writer, Compression::default());
                Ok(FastqLocalWriter::Gzip(fastq::io::Writer::new(encoder)))
            }
        }
    }

    /// Writes a single FASTQ record.
    pub fn write_record(&mut self, record: &fastq::Record) -> Result<()> {
        match self {
            FastqLocalWriter::Plain(writer) => writer.write_record(record),
            FastqLocalWriter::Gzip(writer) => writer.write_record(record),
        }
        .map_err(|e| DataFusionError::Execution(format!("Failed to write FASTQ record: {e}")))
    }

    /// Writes records in order.
    pub fn write_records(&mut self, records: &[fastq::Record]) -> Result<()> {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Flushes buffered output, finishes the compression stream for gzip
    /// output, and closes the file. Consumes the writer.
    pub fn finish(self) -> Result<()> {
        match self {
            FastqLocalWriter::Plain(writer) => {
                let mut buf_writer = writer.into_inner();
                buf_writer
                    .flush()
                    .map_err(|e| DataFusionError::Execution(format!("Failed to flush writer: {e}")))
            }
            FastqLocalWriter::Gzip(writer) => {
                let encoder = writer.into_inner();
                encoder.finish().map_err(|e| {
                    DataFusionError::Execution(format!("Failed to finish GZIP stream: {e}"))
                })?;
                Ok(())
            }
        }
    }
}
