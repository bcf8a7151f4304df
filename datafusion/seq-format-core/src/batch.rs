use crate::record::SequenceRecord;
use datafusion::arrow::array::{ArrayRef, NullArray, RecordBatch, StringBuilder};
use datafusion::arrow::datatypes::SchemaRef;
use datafusion::common::DataFusionError;
use std::sync::Arc;

/// Accumulates mapped records into Arrow string columns up to a pull's
/// capacity.
///
/// The builder governs the null policy for optional fields: an absent
/// description or quality string becomes a null entry, never a zero-length
/// string, so that absence survives a round-trip through the host engine.
pub struct SequenceBatchBuilder {
    ids: StringBuilder,
    descriptions: StringBuilder,
    sequences: StringBuilder,
    quality_scores: Option<StringBuilder>,
    file_names: Option<StringBuilder>,
    rows: usize,
}

impl SequenceBatchBuilder {
    /// Creates a builder for `capacity` rows. `with_quality_scores` adds the
    /// FASTQ column, `with_file_name` the trailing multi-file column.
    pub fn new(capacity: usize, with_quality_scores: bool, with_file_name: bool) -> Self {
        let string_builder = || StringBuilder::with_capacity(capacity, capacity * 16);
        Self {
            ids: string_builder(),
            descriptions: string_builder(),
            sequences: string_builder(),
            quality_scores: with_quality_scores.then(string_builder),
            file_names: with_file_name.then(string_builder),
            rows: 0,
        }
    }

    /// Appends one record. `file_name` is ignored unless the builder carries
    /// the multi-file column.
    pub fn append(&mut self, record: &SequenceRecord, file_name: &str) {
        self.ids.append_value(&record.id);
        self.descriptions.append_option(record.description.as_deref());
        self.sequences.append_value(&record.sequence);
        if let Some(quality_scores) = &mut self.quality_scores {
            quality_scores.append_option(record.quality_scores.as_deref());
        }
        if let Some(file_names) = &mut self.file_names {
            file_names.append_value(file_name);
        }
        self.rows += 1;
    }

    /// Number of rows appended since the last seal.
    pub fn len(&self) -> usize {
        self.rows
    }

    /// True when no rows are pending.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Seals the pending rows into a record batch for `schema`, selecting
    /// columns per the scan projection.
    ///
    /// Sealing resets the builder; sealing again without new appends yields
    /// an empty batch rather than duplicating rows.
    pub fn seal(
        &mut self,
        schema: SchemaRef,
        projection: Option<&Vec<usize>>,
    ) -> datafusion::common::Result<RecordBatch> {
        let rows = self.rows;
        self.rows = 0;

        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(self.ids.finish()),
            Arc::new(self.descriptions.finish()),
            Arc::new(self.sequences.finish()),
        ];
        if let Some(quality_scores) = &mut self.quality_scores {
            columns.push(Arc::new(quality_scores.finish()));
        }
        if let Some(file_names) = &mut self.file_names {
            columns.push(Arc::new(file_names.finish()));
        }

        let arrays: Vec<ArrayRef> = match projection {
            None => columns,
            Some(indices) if indices.is_empty() => {
                vec![Arc::new(NullArray::new(rows)) as ArrayRef]
            }
            Some(indices) => indices
                .iter()
                .map(|&i| {
                    columns
                        .get(i)
                        .cloned()
                        .unwrap_or_else(|| Arc::new(NullArray::new(rows)) as ArrayRef)
                })
                .collect(),
        };

        RecordBatch::try_new(schema, arrays)
            .map_err(|e| DataFusionError::Execution(format!("Error creating batch: {e:?}")))
    }
}
