//! Serializer for converting Arrow record batches to FASTQ records
//!
//! Binding a FASTQ copy validates the destination and the input schema
//! before any file handle is opened; sinking converts batches row-by-row,
//! in order.

use datafusion::arrow::array::{Array, RecordBatch, StringArray};
use datafusion::arrow::datatypes::{DataType, Schema};
use datafusion::common::{DataFusionError, Result};
use datafusion_seq_format_core::errors::BindError;
use noodles_fastq as fastq;
use noodles_fastq::record::Definition;
use std::path::Path;

/// The two accepted column layouts for FASTQ output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FastqColumnShape {
    /// `(id, description, sequence, quality_scores)`
    IdDescriptionSequenceQuality,
    /// `(id, sequence, quality_scores)`; records are written with an empty
    /// description.
    IdSequenceQuality,
}

/// Validates a FASTQ copy before any I/O.
///
/// The destination must not already exist, and the input schema must be one
/// of the accepted shapes. The existence check runs first; neither check
/// opens a file handle.
pub fn bind_fastq_copy(output_path: &str, schema: &Schema) -> Result<FastqColumnShape> {
    if Path::new(output_path).exists() {
        return Err(BindError::DestinationExists {
            path: output_path.to_string(),
        }
        .into());
    }
    validate_fastq_write_schema(schema)
}

/// Checks `schema` against the accepted FASTQ column layouts.
///
/// Column names must be exactly `(id, description, sequence, quality_scores)`
/// or `(id, sequence, quality_scores)`, order- and case-sensitive, and
/// every column must be Utf8.
pub fn validate_fastq_write_schema(schema: &Schema) -> Result<FastqColumnShape> {
    let names: Vec<&str> = schema
        .fields()
        .iter()
        .map(|field| field.name().as_str())
        .collect();
    let shape = match names.as_slice() {
        ["id", "description", "sequence", "quality_scores"] => {
            FastqColumnShape::IdDescriptionSequenceQuality
        }
        ["id", "sequence", "quality_scores"] => FastqColumnShape::IdSequenceQuality,
        _ => {
            return Err(BindError::SchemaMismatch(format!(
                "invalid column names for FASTQ output, expected \
                 (id, description, sequence, quality_scores) or \
                 (id, sequence, quality_scores), got ({})",
                names.join(", ")
            ))
            .into());
        }
    };
    for field in schema.fields() {
        if field.data_type() != &DataType::Utf8 {
            return Err(BindError::SchemaMismatch(format!(
                "invalid type for FASTQ column {}: expected Utf8, got {}",
                field.name(),
                field.data_type()
            ))
            .into());
        }
    }
    Ok(shape)
}

/// Converts a record batch of the validated `shape` into FASTQ records.
///
/// Rows map to records in order: no reordering, deduplication, or
/// filtering. A null description writes as a bare header; empty ids,
/// sequences, or quality strings are malformed and abort the copy, as does
/// a sequence/quality length mismatch.
pub fn batch_to_fastq_records(
    batch: &RecordBatch,
    shape: FastqColumnShape,
) -> Result<Vec<fastq::Record>> {
    let ids = string_column(batch, 0, "id")?;
    let (descriptions, sequences, quality_scores) = match shape {
        FastqColumnShape::IdDescriptionSequenceQuality => (
            Some(string_column(batch, 1, "description")?),
            string_column(batch, 2, "sequence")?,
            string_column(batch, 3, "quality_scores")?,
        ),
        FastqColumnShape::IdSequenceQuality => (
            None,
            string_column(batch, 1, "sequence")?,
            string_column(batch, 2, "quality_scores")?,
        ),
    };

    let mut records = Vec::with_capacity(batch.num_rows());
    for i in 0..batch.num_rows() {
        let id = ids.value(i);
        if id.is_empty() {
            return Err(DataFusionError::Execution(format!(
                "Row {i}: id cannot be empty"
            )));
        }

        let sequence = sequences.value(i);
        if sequence.is_empty() {
            return Err(DataFusionError::Execution(format!(
                "Row {i}: sequence cannot be empty"
            )));
        }

        let quality = if quality_scores.is_null(i) {
            ""
        } else {
            quality_scores.value(i)
        };
        if quality.is_empty() {
            return Err(DataFusionError::Execution(format!(
                "Row {i}: quality_scores cannot be empty"
            )));
        }
        if sequence.len() != quality.len() {
            return Err(DataFusionError::Execution(format!(
                "Row {i}: sequence length ({}) must match quality_scores length ({})",
                sequence.len(),
                quality.len()
            )));
        }

        let description = descriptions
            .filter(|column| !column.is_null(i))
            .map(|column| column.value(i))
            .unwrap_or("");

        let record = fastq::Record::new(
            Definition::new(id, description),
            sequence.as_bytes().to_vec(),
            quality.as_bytes().to_vec(),
        );
        records.push(record);
    }

    Ok(records)
}

fn string_column<'a>(batch: &'a RecordBatch, index: usize, name: &str) -> Result<&'a StringArray> {
    batch
        .column(index)
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| {
            DataFusionError::Execution(format!("Column {index} ({name}) must be Utf8 type"))
        })
}
