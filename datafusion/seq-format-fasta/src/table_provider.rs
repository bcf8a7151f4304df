use crate::physical_exec::FastaExec;
use crate::serializer::bind_fasta_copy;
use crate::storage::FASTA_SUFFIXES;
use crate::write_exec::FastaWriteExec;
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

/// Determines the Arrow schema for FASTA records.
///
/// Glob-resolved tables carry a trailing `file_name` column naming the file
/// each row came from; single-file tables do not.
fn determine_schema(multi_file: bool) -> SchemaRef {
    let mut fields = vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("description", DataType::Utf8, true),
        Field::new("sequence", DataType::Utf8, false),
    ];
    if multi_file {
        fields.push(Field::new("file_name", DataType::Utf8, false));
    }
    Arc::new(Schema::new(fields))
}

/// DataFusion table provider for FASTA files.
///
/// A provider binds one scan argument (a literal path or a glob pattern)
/// and resolves it into an ordered file set up front, so missing files and
/// empty globs fail at registration rather than mid-query.
///
/// # Example
///
/// ```rust,no_run
/// use datafusion::prelude::*;
/// use datafusion_seq_format_fasta::FastaTableProvider;
/// use std::sync::Arc;
///
/// # async fn example() -> datafusion::error::Result<()> {
/// let ctx = SessionContext::new();
/// let table = FastaTableProvider::new("sequences.fasta".to_string())?;
/// ctx.register_table("fasta", Arc::new(table))?;
///
/// let df = ctx.sql("SELECT id, sequence FROM fasta").await?;
/// df.show().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct FastaTableProvider {
    pattern: String,
    file_set: Option<FileSet>,
    schema: SchemaRef,
}

impl FastaTableProvider {
    /// Resolves `pattern` (a literal path or glob) and creates the provider.
    pub fn new(pattern: String) -> datafusion::common::Result<Self> {
        let file_set = FileSet::resolve(&pattern)?;
        debug!("FastaTableProvider file set: {:?}", file_set.paths());
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
/// Returns a provider when `table_name` carries a recognized FASTA suffix
/// and resolves to at least one file. Declines with `None`, not an error,
/// when the suffix does not match or the glob is empty, so the host can try
/// other resolution strategies.
pub fn try_resolve_fasta_table(table_name: &str) -> Option<FastaTableProvider> {
    if !has_recognized_suffix(table_name, FASTA_SUFFIXES) {
        return None;
    }
    FastaTableProvider::new(table_name.to_string()).ok()
}

#[async_trait]
impl TableProvider for FastaTableProvider {
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
        debug!("FastaTableProvider::scan");

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

        Ok(Arc::new(FastaExec {
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
        debug!("FastaTableProvider::insert_into path={}", self.pattern);

        if insert_op != InsertOp::Overwrite {
            return Err(DataFusionError::NotImplemented(
                "FASTA write only supports INSERT OVERWRITE".to_string(),
            ));
        }

        let shape = bind_fasta_copy(&self.pattern, input.schema().as_ref())?;

        Ok(Arc::new(FastaWriteExec::new(
            input,
            self.pattern.clone(),
            shape,
            None,
        )))
    }
}
