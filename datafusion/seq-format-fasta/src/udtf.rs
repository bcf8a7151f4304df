use crate::table_provider::FastaTableProvider;
use datafusion::catalog::{TableFunctionImpl, TableProvider};
use datafusion::common::{DataFusionError, ScalarValue};
use datafusion::logical_expr::Expr;
use std::sync::Arc;

/// Table function backing `read_fasta('<path or glob>')`.
///
/// Register it with [`SessionContext::register_udtf`] to scan FASTA files
/// without creating a named table first:
///
/// ```rust,no_run
/// use datafusion::prelude::*;
/// use datafusion_seq_format_fasta::FastaScanFunction;
/// use std::sync::Arc;
///
/// # async fn example() -> datafusion::error::Result<()> {
/// let ctx = SessionContext::new();
/// ctx.register_udtf("read_fasta", Arc::new(FastaScanFunction::default()));
/// let df = ctx.sql("SELECT * FROM read_fasta('reads/*.fasta')").await?;
/// # Ok(())
/// # }
/// ```
///
/// [`SessionContext::register_udtf`]: datafusion::prelude::SessionContext::register_udtf
#[derive(Debug, Default)]
pub struct FastaScanFunction;

impl TableFunctionImpl for FastaScanFunction {
    fn call(&self, args: &[Expr]) -> datafusion::common::Result<Arc<dyn TableProvider>> {
        let Some(Expr::Literal(ScalarValue::Utf8(Some(pattern)), _)) = args.first() else {
            return Err(DataFusionError::Plan(
                "read_fasta requires a single string argument (a path or glob)".to_string(),
            ));
        };
        Ok(Arc::new(FastaTableProvider::new(pattern.clone())?))
    }
}
