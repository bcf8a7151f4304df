//! FASTA file format support for Apache DataFusion
//!
//! This crate exposes FASTA files as DataFusion tables and accepts query
//! results back as FASTA output.
//!
//! # Features
//!
//! - Direct SQL queries over a FASTA file or a glob of FASTA files
//! - GZIP-compressed input and output
//! - A `read_fasta` table function for ad-hoc scans
//! - Schema-validated `INSERT OVERWRITE` into new FASTA files
//!
//! # Schema
//!
//! | Column | Type | Description |
//! |--------|------|-------------|
//! | id | String | Sequence identifier |
//! | description | String | Header text after the identifier (nullable) |
//! | sequence | String | The sequence itself |
//! | file_name | String | Source file, present only for glob scans |
//!
//! # Example
//!
//! ```rust,no_run
//! use datafusion::prelude::*;
//! use datafusion_seq_format_fasta::FastaTableProvider;
//! use std::sync::Arc;
//!
//! # async fn example() -> datafusion::error::Result<()> {
//! let ctx = SessionContext::new();
//! let table = FastaTableProvider::new("data/*.fasta".to_string())?;
//! ctx.register_table("sequences", Arc::new(table))?;
//!
//! let df = ctx.sql("SELECT id, sequence FROM sequences LIMIT 10").await?;
//! df.show().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Physical execution plan for FASTA table scans
pub mod physical_exec;
/// Conversion of record batches back into FASTA records
pub mod serializer;
/// FASTA reader over local, optionally gzipped files
pub mod storage;
/// DataFusion table provider implementation for FASTA files
pub mod table_provider;
/// The `read_fasta` table function
pub mod udtf;
/// Physical execution plan for FASTA output
pub mod write_exec;
/// FASTA output writer with gzip support
pub mod writer;

pub use table_provider::{FastaTableProvider, try_resolve_fasta_table};
pub use udtf::FastaScanFunction;
