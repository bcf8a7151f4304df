use crate::storage::FastaLocalReader;
use async_stream::try_stream;
use datafusion::arrow::datatypes::SchemaRef;
use datafusion::execution::{SendableRecordBatchStream, TaskContext};
use datafusion::physical_plan::stream::RecordBatchStreamAdapter;
use datafusion::physical_plan::{DisplayAs, DisplayFormatType, ExecutionPlan, PlanProperties};
use datafusion_seq_format_core::batch::SequenceBatchBuilder;
use datafusion_seq_format_core::file_set::FileSet;
use datafusion_seq_format_core::scan::MultiFileScanCursor;
use log::debug;
use std::any::Any;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Physical plan for FASTA scans.
///
/// Executes as a single partition; the scan cursor is owned by that
/// partition's stream and advances file-by-file through the bound file set.
#[allow(dead_code)]
pub struct FastaExec {
    pub(crate) file_set: FileSet,
    pub(crate) schema: SchemaRef,
    pub(crate) projection: Option<Vec<usize>>,
    pub(crate) cache: PlanProperties,
    pub(crate) limit: Option<usize>,
}

impl Debug for FastaExec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastaExec")
            .field("files", &self.file_set.paths())
            .finish()
    }
}

impl DisplayAs for FastaExec {
    fn fmt_as(&self, _t: DisplayFormatType, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "FastaExec: files={}", self.file_set.len())
    }
}

impl ExecutionPlan for FastaExec {
    fn name(&self) -> &str {
        "FastaExec"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn properties(&self) -> &PlanProperties {
        &self.cache
    }

    fn children(&self) -> Vec<&Arc<dyn ExecutionPlan>> {
        vec![]
    }

    fn with_new_children(
        self: Arc<Self>,
        _children: Vec<Arc<dyn ExecutionPlan>>,
    ) -> datafusion::common::Result<Arc<dyn ExecutionPlan>> {
        Ok(self)
    }

    fn execute(
        &self,
        _partition: usize,
        context: Arc<TaskContext>,
    ) -> datafusion::common::Result<SendableRecordBatchStream> {
        debug!("FastaExec::execute");
        debug!("Projection: {:?}", self.projection);
        let batch_size = context.session_config().batch_size();
        let schema = self.schema.clone();
        let projection = self.projection.clone();
        let file_set = self.file_set.clone();
        let with_file_name = file_set.is_multi_file();

        let stream = try_stream! {
            let mut cursor = MultiFileScanCursor::open(file_set, |path| FastaLocalReader::new(path))?;
            loop {
                let chunk = cursor.pull(batch_size)?;
                if chunk.is_empty() {
                    break;
                }
                let mut builder =
                    SequenceBatchBuilder::new(chunk.records.len(), false, with_file_name);
                for record in &chunk.records {
                    builder.append(record, &chunk.file_name);
                }
                yield builder.seal(schema.clone(), projection.as_ref())?;
            }
        };
        Ok(Box::pin(RecordBatchStreamAdapter::new(
            self.schema.clone(),
            stream,
        )))
    }
}
