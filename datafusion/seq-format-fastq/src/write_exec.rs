//! Write execution plan for FASTQ files
//!
//! The plan consumes its input stream, encodes every row into the output
//! file, and reports the total written row count as its single output row.

use crate::serializer::{FastqColumnShape, batch_to_fastq_records};
use crate::writer::{FastqCompressionType, FastqLocalWriter};
use datafusion::arrow::array::{RecordBatch, UInt64Array};
use datafusion::arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use datafusion::common::{DataFusionError, Result};
use datafusion::execution::{SendableRecordBatchStream, TaskContext};
use datafusion::physical_expr::{Distribution, EquivalenceProperties, Partitioning};
use datafusion::physical_plan::stream::RecordBatchStreamAdapter;
use datafusion::physical_plan::{
    DisplayAs, DisplayFormatType, ExecutionPlan, PlanProperties,
    execution_plan::{Boundedness, EmissionType},
};
use futures::StreamExt;
use log::debug;
use std::any::Any;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Physical execution plan for writing FASTQ files.
///
/// Requires a single input partition, so all rows flow through one writer in
/// order and the on-disk stream is never interleaved.
pub struct FastqWriteExec {
    input: Arc<dyn ExecutionPlan>,
    output_path: String,
    shape: FastqColumnShape,
    compression: FastqCompressionType,
    cache: PlanProperties,
}

impl FastqWriteExec {
    /// Creates a FASTQ write plan over the validated input.
    ///
    /// `shape` comes from bind-time validation; `compression` defaults to
    /// detection from the output path.
    pub fn new(
        input: Arc<dyn ExecutionPlan>,
        output_path: String,
        shape: FastqColumnShape,
        compression: Option<FastqCompressionType>,
    ) -> Self {
        let compression =
            compression.unwrap_or_else(|| FastqCompressionType::from_path(&output_path));

        let output_schema = Arc::new(Schema::new(vec![Field::new(
            "count",
            DataType::UInt64,
            false,
        )]));

        let cache = PlanProperties::new(
            EquivalenceProperties::new(output_schema),
            Partitioning::UnknownPartitioning(1),
            EmissionType::Final,
            Boundedness::Bounded,
        );

        Self {
            input,
            output_path,
            shape,
            compression,
            cache,
        }
    }

    /// The output file path.
    pub fn output_path(&self) -> &str {
        &self.output_path
    }

    /// The compression applied to the output.
    pub fn compression(&self) -> FastqCompressionType {
        self.compression
    }

    fn schema(&self) -> SchemaRef {
        self.cache.eq_properties.schema().clone()
    }
}

impl Debug for FastqWriteExec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastqWriteExec")
            .field("output_path", &self.output_path)
            .field("compression", &self.compression)
            .finish()
    }
}

impl DisplayAs for FastqWriteExec {
    fn fmt_as(&self, _t: DisplayFormatType, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "FastqWriteExec: path={}, compression={:?}",
            self.output_path, self.compression
        )
    }
}

impl ExecutionPlan for FastqWriteExec {
    fn name(&self) -> &str {
        "FastqWriteExec"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn properties(&self) -> &PlanProperties {
        &self.cache
    }

    fn required_input_distribution(&self) -> Vec<Distribution> {
        vec![Distribution::SinglePartition]
    }

    fn children(&self) -> Vec<&Arc<dyn ExecutionPlan>> {
        vec![&self.input]
    }

    fn with_new_children(
        self: Arc<Self>,
        children: Vec<Arc<dyn ExecutionPlan>>,
    ) -> Result<Arc<dyn ExecutionPlan>> {
        if children.len() != 1 {
            return Err(DataFusionError::Internal(
                "FastqWriteExec requires exactly one child".to_string(),
            ));
        }
        Ok(Arc::new(FastqWriteExec::new(
            children[0].clone(),
            self.output_path.clone(),
            self.shape,
            Some(self.compression),
        )))
    }

    fn execute(
        &self,
        partition: usize,
        context: Arc<TaskContext>,
    ) -> Result<SendableRecordBatchStream> {
        debug!(
            "FastqWriteExec::execute partition={}, path={}",
            partition, self.output_path
        );

        let output_path = self.output_path.clone();
        let shape = self.shape;
        let compression = self.compression;
        let input = self.input.execute(0, context)?;
        let output_schema = self.schema();

        let stream = futures::stream::once(async move {
            write_fastq_stream(input, output_path, shape, compression, output_schema).await
        });

        Ok(Box::pin(RecordBatchStreamAdapter::new(
            self.schema(),
            stream,
        )))
    }
}

/// Drains `input` into the output file and finalizes it exactly once.
///
/// The writer is created before the first batch and finished after the last,
/// so even a zero-row input leaves a valid (empty) output file.
async fn write_fastq_stream(
    mut input: SendableRecordBatchStream,
    output_path: String,
    shape: FastqColumnShape,
    compression: FastqCompressionType,
    output_schema: SchemaRef,
) -> Result<RecordBatch> {
    let mut writer = FastqLocalWriter::with_compression(&output_path, compression)?;
    let mut total_count: u64 = 0;

    while let Some(batch_result) = input.next().await {
        let batch = batch_result?;

        if batch.num_rows() == 0 {
            continue;
        }

        let records = batch_to_fastq_records(&batch, shape)?;
        total_count += records.len() as u64;
        writer.write_records(&records)?;
    }

    writer.finish()?;

    debug!("FastqWriteExec: wrote {total_count} records to {output_path}");

    let count_array = Arc::new(UInt64Array::from(vec![total_count]));
    RecordBatch::try_new(output_schema, vec![count_array])
        .map_err(|e| DataFusionError::Execution(format!("Failed to create result batch: {e}")))
}
