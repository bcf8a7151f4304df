//! FASTQ file format support for Apache DataFusion
//!
//! This crate exposes FASTQ files as DataFusion tables and accepts query
//! results back as FASTQ output.
//!
//! # Features
//!
//! - Direct SQL queries over a FASTQ file or a glob of FASTQ files
//! - GZIP-compressed input and output
//! - A `read_fastq` table function for ad-hoc scans
//! - Schema-validated `INSERT OVERWRITE` into new FASTQ files
//!
//! # Schema
//!
//! | Column | Type | Description |
//! |--------|------|-------------|
//! | id | String | Sequence identifier |
//! | description | String | Header text after the identifier (nullable) |
//! | sequence | String | The sequence itself |
//! | quality_scores | String | Per-base quality scores (nullable) |
//! | file_name | String | Source file, present only for glob scans |
//!
//! # Example
//!
//! ```rust,no_run
//! use datafusion::prelude::*;
//! use datafusion_seq_format_fastq::FastqTableProvider;
//! use std::sync::Arc;
//!
//! # async fn example() -> datafusion::error::Result<()> {
//! let ctx = SessionContext::new();
//! let table = FastqTableProvider::new("reads/*.fastq".to_string())?;
//! ctx.register_table("reads", Arc::new(table))?;
//!
//! let df = ctx.sql("SELECT id, quality_scores FROM reads LIMIT 10").await?;
//! df.show().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Physical execution plan for FASTQ table scans
pub mod physical_exec;
/// Conversion of record batches back into FASTQ records
pub mod serializer;
/// FASTQ reader over local, optionally gzipped files
pub mod storage;
/// DataFusion table provider implementation for FASTQ files
pub mod table_provider;
/// The `read_fastq` table function
pub mod udtf;
/// Physical execution plan for FASTQ output
pub mod write_exec;
/// FASTQ output writer with gzip support
pub mod writer;

pub use table_provider::{FastqTableProvider, try_resolve_fastq_table};
pub use udtf::FastqScanFunction;
