//! Core utilities for DataFusion sequence-format table providers
//!
//! This crate provides the shared infrastructure used by the FASTA and FASTQ
//! table provider crates:
//!
//! - **File-Set Resolution**: expanding glob patterns and literal paths into
//!   the ordered, non-empty list of files a scan will visit
//! - **Multi-File Scan Cursor**: the state machine that advances a scan across
//!   file boundaries while keeping every pull bounded to a single file
//! - **Batch Assembly**: columnar accumulation of records into Arrow record
//!   batches, preserving the null-vs-empty-string distinction for optional
//!   fields
//! - **Bind Errors**: typed errors for everything that can go wrong before
//!   record I/O starts
//!
//! ## Usage
//!
//! This crate is primarily used as a dependency by the format-specific crates
//! in the datafusion-seq-format family. Most users will interact with those
//! crates rather than using this core crate directly.

#![warn(missing_docs)]

/// Columnar batch assembly for scanned records
pub mod batch;
/// Typed bind-time errors shared by the format crates
pub mod errors;
/// Glob and literal path resolution into ordered file sets
pub mod file_set;
/// The sequence record model shared by the FASTA and FASTQ providers
pub mod record;
/// The multi-file scan cursor state machine
pub mod scan;
