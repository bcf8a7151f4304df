use crate::physical_exec::FastqExec;
use crate::serializer::bind_fastq_copy;
use crate::storage::FASTQ_SUFFIXES;
use crate::write_exec::FastqWriteExec;
use async_trait::async_trait;
use datafusion::arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use datafusion::catalog::{Session, TableProvider};
use datafusion::common::DataFusionError;
use datafusion::datasource::TableType;
use datafusion::logical_expr::{Expr, dml::InsertOp};
use datafusion::physical_expr::{EquivalenceProperties, Partitioning};
use datafusion::physical_plan::{
    ExecutionPlan, PlanProperties,
    execution_plan::{Boundedness, EmissionType},
};
use datafusion_seq_format_core::file_set::{FileSet, has_recognized_suffix};
use log::debug;
use std::any::Any;
use std::sync::Arc;

/// Determines the Arrow schema for FASTQ records.
///
/// `quality_scores` is nullable: a record whose quality string is empty at
/// source surfaces as NULL. Glob-resolved tables carry a trailing
/// `file_name` column; single-file tables do not.
fn determine_schema(multi_file: bool) -> SchemaRef {
    let mut fields = vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("description", DataType::Utf8, true),
        Field::new("sequence", DataType::Utf8, false),
        Field::new("quality_scores", DataType::Utf8, true),
    ];
    if multi_file {
        fields.push(Field::new("file_name", DataType::Utf8, false));
    }
    Arc::new(Schema::new(fields))
}

/// DataFusion table provider for FASTQ files.
///
/// A provider binds one scan argument (a literal path or a glob pattern)
/// and resolves it into an ordered file set up front, so missing files and
/// empty globs fail at registration rather than mid-query.
#[derive(Clone, Debug)]
pub struct FastqTableProvider {
    pattern: String,
    file_set: Option<FileSet>,
    schema: SchemaRef,
}

impl FastqTableProvider {
    /// Resolves `pattern` (a literal path or glob) and creates the provider.
    pub fn new(pattern: String) -> datafusion::common::Result<Self> {
        let file_set = FileSet::resolve(&pattern)?;
        debug!("FastqTableProvider file set: {:?}", file_set.paths());
        let schema = determine_schema(file_set.is_multi_file());
        Ok(Self {
            pattern,
            file_set: Some(file_set),
            schema,
        })
    }

    /// Creates a provider for writing to `output_path`.
    ///
    /// The path is not resolved against the filesystem here; bind-time
    /// validation happens when the insert plan is built, and rejects an
    /// existing destination.
    pub fn new_for_write(output_path: String) -> Self {
        let schema = determine_schema(false);
        Self {
            pattern: output_path,
            file_set: None,
            schema,
        }
    }
}

/// Auto-resolution hook for bare table identifiers.
///
/// Returns a provider when `table_name` carries a recognized FASTQ suffix
/// and resolves to at least one file. Declines with `None`, not an error,
/// when the suffix does not match or the glob is empty, so the host can try
/// other resolution strategies.
pub fn try_resolve_fastq_table(table_name: &str) -> Option<FastqTableProvider> {
    if !has_recognized_suffix(table_name, FASTQ_SUFFIXES) {
        return None;
    }
    FastqTableProvider::new(table_name.to_string()).ok()
}

#[async_trait]
impl TableProvider for FastqTableProvider {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    fn table_type(&self) -> TableType {
        TableType::Base
    }

    async fn scan(
        &self,
        _state: &dyn Session,
        projection: Option<&Vec<usize>>,
        _filters: &[Expr],
        limit: Option<usize>,
    ) -> datafusion::common::Result<Arc<dyn ExecutionPlan>> {
        debug!("FastqTableProvider::scan");

        fn project_schema(schema: &SchemaRef, projection: Option<&Vec<usize>>) -> SchemaRef {
            match projection {
                Some(indices) if indices.is_empty() => {
                    Arc::new(Schema::new(vec![Field::new("dummy", DataType::Null, true)]))
                }
                Some(indices) => {
                    let projected_fields: Vec<Field> =
                        indices.iter().map(|&i| schema.field(i).clone()).collect();
                    Arc::new(Schema::new(projected_fields))
                }
                None => schema.clone(),
            }
        }

        let schema = project_schema(&self.schema, projection);
        let file_set = match &self.file_set {
            Some(file_set) => file_set.clone(),
            None => FileSet::resolve(&self.pattern)?,
        };

        Ok(Arc::new(FastqExec {
            cache: PlanProperties::new(
                EquivalenceProperties::new(schema.clone()),
                Partitioning::UnknownPartitioning(1),
                EmissionType::Final,
                Boundedness::Bounded,
            ),
            file_set,
            schema,
            projection: projection.cloned(),
            limit,
        }))
    }

    async fn insert_into(
        &self,
        _state: &dyn Session,
        input: Arc<dyn ExecutionPlan>,
        insert_op: InsertOp,
    ) -> datafusion::common::Result<Arc<dyn ExecutionPlan>> {
        debug!("FastqTableProvider::insert_into path={}", self.pattern);

        if insert_op != InsertOp::Overwrite {
            return Err(DataFusionError::NotImplemented(
                "FASTQ write only supports INSERT OVERWRITE".to_string(),
            ));
        }

        let shape = bind_fastq_copy(&self.pattern, input.schema().as_ref())?;

        Ok(Arc::new(FastqWriteExec::new(
            input,
            self.pattern.clone(),
            shape,
            None,
        )))
    }
}
