//! Serializer for converting Arrow record batches to FASTA records
//!
//! Binding a FASTA copy validates the destination and the input schema
//! before any file handle is opened; sinking converts batches row-by-row,
//! in order.

use datafusion::arrow::array::{Array, RecordBatch, StringArray};
use datafusion::arrow::datatypes::{DataType, Schema};
use datafusion::common::{DataFusionError, Result};
use datafusion_seq_format_core::errors::BindError;
use noodles_fasta as fasta;
use noodles_fasta::record::{Definition, Sequence};
use std::path::Path;

/// The two accepted column layouts for FASTA output.
///
/// Validation closes over these at bind time, so the sink never needs to
/// re-inspect the input schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FastaColumnShape {
    /// `(id, description, sequence)`
    IdDescriptionSequence,
    /// `(id, sequence)`; records are written with an empty description.
    IdSequence,
}

/// Validates a FASTA copy before any I/O.
///
/// The destination must not already exist, and the input schema must be one
/// of the accepted shapes. The existence check runs first; neither check
/// opens a file handle.
pub fn bind_fasta_copy(output_path: &str, schema: &Schema) -> Result<FastaColumnShape> {
    if Path::new(output_path).exists() {
        return Err(BindError::DestinationExists {
            path: output_path.to_string(),
        }
        .into());
    }
    validate_fasta_write_schema(schema)
}

/// Checks `schema` against the accepted FASTA column layouts.
///
/// Column names must be exactly `(id, description, sequence)` or
/// `(id, sequence)`, order- and case-sensitive, and every column must be
/// Utf8.
pub fn validate_fasta_write_schema(schema: &Schema) -> Result<FastaColumnShape> {
    let names: Vec<&str> = schema
        .fields()
        .iter()
        .map(|field| field.name().as_str())
        .collect();
    let shape = match names.as_slice() {
        ["id", "description", "sequence"] => FastaColumnShape::IdDescriptionSequence,
        ["id", "sequence"] => FastaColumnShape::IdSequence,
        _ => {
            return Err(BindError::SchemaMismatch(format!(
                "invalid column names for FASTA output, expected (id, description, sequence) \
                 or (id, sequence), got ({})",
                names.join(", ")
            ))
            .into());
        }
    };
    for field in schema.fields() {
        if field.data_type() != &DataType::Utf8 {
            return Err(BindError::SchemaMismatch(format!(
                "invalid type for FASTA column {}: expected Utf8, got {}",
                field.name(),
                field.data_type()
            ))
            .into());
        }
    }
    Ok(shape)
}

/// Converts a record batch of the validated `shape` into FASTA records.
///
/// Rows map to records in order: no reordering, deduplication, or
/// filtering. A null description writes as a bare header; empty ids or
/// sequences are malformed and abort the copy.
pub fn batch_to_fasta_records(
    batch: &RecordBatch,
    shape: FastaColumnShape,
) -> Result<Vec<fasta::Record>> {
    let ids = string_column(batch, 0, "id")?;
    let (descriptions, sequences) = match shape {
        FastaColumnShape::IdDescriptionSequence => (
            Some(string_column(batch, 1, "description")?),
            string_column(batch, 2, "sequence")?,
        ),
        FastaColumnShape::IdSequence => (None, string_column(batch, 1, "sequence")?),
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

        let description = descriptions
            .filter(|column| !column.is_null(i))
            .map(|column| column.value(i))
            .filter(|description| !description.is_empty());
        let definition = match description {
            Some(description) => Definition::new(id, Some(description.as_bytes().to_vec().into())),
            None => Definition::new(id, None),
        };

        records.push(fasta::Record::new(
            definition,
            Sequence::from(sequence.as_bytes().to_vec()),
        ));
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
