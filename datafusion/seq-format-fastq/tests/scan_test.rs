//! Integration tests for FASTQ scans
//!
//! Covers single-file and glob-resolved scans, the file-boundary batching
//! behavior, the null policy for optional columns, and gzip input.

use datafusion::arrow::array::{Array, StringArray};
use datafusion::prelude::*;
use datafusion_seq_format_fastq::{FastqScanFunction, FastqTableProvider, try_resolve_fastq_table};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use std::sync::Arc;
use tempfile::TempDir;

/// Helper: write a FASTQ file with `num_records` records. Even-numbered
/// records carry a description, odd-numbered ones have a bare header.
fn generate_test_fastq(path: &str, num_records: usize) {
    let mut file = std::fs::File::create(path).expect("Failed to create test file");
    for i in 0..num_records {
        if i % 2 == 0 {
            writeln!(file, "@read_{} sample description {}", i, i).unwrap();
        } else {
            writeln!(file, "@read_{}", i).unwrap();
        }
        writeln!(file, "ACGTACGTACGTACGT").unwrap();
        writeln!(file, "+").unwrap();
        writeln!(file, "IIIIIIIIIIIIIIII").unwrap();
    }
}

fn small_batch_context(batch_size: usize) -> SessionContext {
    let config = SessionConfig::new()
        .with_batch_size(batch_size)
        .with_target_partitions(1);
    SessionContext::new_with_config(config)
}

#[tokio::test]
async fn test_single_file_scan_has_four_columns() {
    let tmp_dir = TempDir::new().unwrap();
    let path = tmp_dir.path().join("input.fastq");
    generate_test_fastq(path.to_str().unwrap(), 3);

    let ctx = SessionContext::new();
    let provider = FastqTableProvider::new(path.to_str().unwrap().to_string()).unwrap();
    ctx.register_table("fastq", Arc::new(provider)).unwrap();

    let df = ctx.sql("SELECT * FROM fastq").await.unwrap();
    let batches = df.collect().await.unwrap();

    let total_rows: usize = batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(total_rows, 3);
    for batch in &batches {
        assert_eq!(batch.num_columns(), 4);
    }
}

#[tokio::test]
async fn test_optional_columns_are_null_not_empty() {
    let tmp_dir = TempDir::new().unwrap();
    let path = tmp_dir.path().join("input.fastq");
    generate_test_fastq(path.to_str().unwrap(), 2);

    let ctx = SessionContext::new();
    let provider = FastqTableProvider::new(path.to_str().unwrap().to_string()).unwrap();
    ctx.register_table("fastq", Arc::new(provider)).unwrap();

    let df = ctx
        .sql("SELECT description, quality_scores FROM fastq ORDER BY id")
        .await
        .unwrap();
    let batches = df.collect().await.unwrap();
    assert_eq!(batches.len(), 1);

    let descriptions = batches[0]
        .column(0)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(descriptions.value(0), "sample description 0");
    assert!(descriptions.is_null(1));

    let quality_scores = batches[0]
        .column(1)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(quality_scores.value(0), "IIIIIIIIIIIIIIII");
    assert!(!quality_scores.is_null(1));
}

#[tokio::test]
async fn test_glob_scan_pulls_two_two_zero() {
    // The end-to-end shape from the scan contract: a glob over two
    // two-record files pulled at capacity three yields batches of 2 and 2,
    // never 3 and 1.
    let tmp_dir = TempDir::new().unwrap();
    let reads_dir = tmp_dir.path().join("reads");
    std::fs::create_dir(&reads_dir).unwrap();
    generate_test_fastq(reads_dir.join("a.fastq").to_str().unwrap(), 2);
    generate_test_fastq(reads_dir.join("b.fastq").to_str().unwrap(), 2);

    let ctx = small_batch_context(3);
    let pattern = format!("{}/*.fastq", reads_dir.display());
    let provider = FastqTableProvider::new(pattern).unwrap();
    ctx.register_table("reads", Arc::new(provider)).unwrap();

    let df = ctx.sql("SELECT * FROM reads").await.unwrap();
    let batches = df.collect().await.unwrap();

    let sizes: Vec<usize> = batches.iter().map(|b| b.num_rows()).collect();
    assert_eq!(sizes, vec![2, 2]);

    // Every row's fifth column names its originating file.
    for (batch, file) in batches.iter().zip(["a.fastq", "b.fastq"]) {
        assert_eq!(batch.num_columns(), 5);
        let file_names = batch
            .column(4)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        for i in 0..batch.num_rows() {
            assert!(file_names.value(i).ends_with(file));
        }
    }
}

#[tokio::test]
async fn test_gzip_input_reads_transparently() {
    let tmp_dir = TempDir::new().unwrap();
    let path = tmp_dir.path().join("input.fastq.gz");

    let file = std::fs::File::create(&path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    for i in 0..4 {
        writeln!(encoder, "@read_{i}").unwrap();
        writeln!(encoder, "ACGT").unwrap();
        writeln!(encoder, "+").unwrap();
        writeln!(encoder, "IIII").unwrap();
    }
    encoder.finish().unwrap();

    let ctx = SessionContext::new();
    let provider = FastqTableProvider::new(path.to_str().unwrap().to_string()).unwrap();
    ctx.register_table("fastq", Arc::new(provider)).unwrap();

    let df = ctx.sql("SELECT id FROM fastq").await.unwrap();
    let batches = df.collect().await.unwrap();
    let total_rows: usize = batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(total_rows, 4);
}

#[tokio::test]
async fn test_empty_glob_fails_at_bind() {
    let tmp_dir = TempDir::new().unwrap();
    let pattern = format!("{}/*.fastq", tmp_dir.path().display());

    let err = FastqTableProvider::new(pattern).unwrap_err();
    assert!(err.to_string().contains("no files found for glob"));
}

#[tokio::test]
async fn test_missing_literal_path_fails_at_bind() {
    let err = FastqTableProvider::new("/nonexistent/input.fastq".to_string()).unwrap_err();
    assert!(err.to_string().contains("file not found"));
}

#[tokio::test]
async fn test_read_fastq_table_function() {
    let tmp_dir = TempDir::new().unwrap();
    generate_test_fastq(tmp_dir.path().join("a.fastq").to_str().unwrap(), 2);

    let ctx = SessionContext::new();
    ctx.register_udtf("read_fastq", Arc::new(FastqScanFunction::default()));

    let sql = format!(
        "SELECT id, quality_scores FROM read_fastq('{}')",
        tmp_dir.path().join("a.fastq").display()
    );
    let df = ctx.sql(&sql).await.unwrap();
    let batches = df.collect().await.unwrap();

    let total_rows: usize = batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(total_rows, 2);
}

#[tokio::test]
async fn test_try_resolve_declines_unknown_suffix() {
    assert!(try_resolve_fastq_table("reads.fasta").is_none());
    assert!(try_resolve_fastq_table("notes.txt").is_none());
}

#[tokio::test]
async fn test_try_resolve_accepts_matching_glob() {
    let tmp_dir = TempDir::new().unwrap();
    generate_test_fastq(tmp_dir.path().join("a.fq").to_str().unwrap(), 1);

    let pattern = format!("{}/*.fq", tmp_dir.path().display());
    assert!(try_resolve_fastq_table(&pattern).is_some());

    let empty_pattern = format!("{}/*.fastq", tmp_dir.path().display());
    assert!(try_resolve_fastq_table(&empty_pattern).is_none());
}
