//! Integration tests for FASTQ write functionality
//!
//! Exercises the SQL INSERT OVERWRITE path, gzip output, the direct copy API
//! with the three-column shape, bind-time rejections, and the
//! null-description round trip.

use datafusion::arrow::array::{Array, RecordBatch, StringArray, UInt64Array};
use datafusion::arrow::datatypes::{DataType, Field, Schema};
use datafusion::catalog::TableProvider;
use datafusion::datasource::MemTable;
use datafusion::prelude::*;
use datafusion_seq_format_fastq::FastqTableProvider;
use datafusion_seq_format_fastq::serializer::bind_fastq_copy;
use datafusion_seq_format_fastq::write_exec::FastqWriteExec;
use std::io::Write;
use std::sync::Arc;
use tempfile::TempDir;

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

#[tokio::test]
async fn test_write_round_trip_preserves_all_fields() {
    let tmp_dir = TempDir::new().unwrap();
    let input_path = tmp_dir.path().join("input.fastq");
    let output_path = tmp_dir.path().join("output.fastq");

    generate_test_fastq(input_path.to_str().unwrap(), 2);

    let ctx = SessionContext::new();
    let input_provider =
        FastqTableProvider::new(input_path.to_str().unwrap().to_string()).unwrap();
    ctx.register_table("input_fastq", Arc::new(input_provider))
        .unwrap();
    let output_provider =
        FastqTableProvider::new_for_write(output_path.to_str().unwrap().to_string());
    ctx.register_table("output_fastq", Arc::new(output_provider))
        .unwrap();

    let result = ctx
        .sql("INSERT OVERWRITE output_fastq SELECT * FROM input_fastq")
        .await
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    let count = result[0]
        .column(0)
        .as_any()
        .downcast_ref::<UInt64Array>()
        .unwrap()
        .value(0);
    assert_eq!(count, 2);

    // Read the output back and verify every field, including that the bare
    // header decodes as NULL again.
    let ctx2 = SessionContext::new();
    let read_provider =
        FastqTableProvider::new(output_path.to_str().unwrap().to_string()).unwrap();
    ctx2.register_table("written_fastq", Arc::new(read_provider))
        .unwrap();

    let df = ctx2
        .sql("SELECT id, description, sequence, quality_scores FROM written_fastq ORDER BY id")
        .await
        .unwrap();
    let batches = df.collect().await.unwrap();
    assert_eq!(batches.len(), 1);
    let batch = &batches[0];
    assert_eq!(batch.num_rows(), 2);

    let ids = batch
        .column(0)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    let descriptions = batch
        .column(1)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    let sequences = batch
        .column(2)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    let quality_scores = batch
        .column(3)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();

    assert_eq!(ids.value(0), "read_0");
    assert_eq!(descriptions.value(0), "sample description 0");
    assert_eq!(sequences.value(0), "ACGTACGTACGTACGT");
    assert_eq!(quality_scores.value(0), "IIIIIIIIIIIIIIII");

    assert_eq!(ids.value(1), "read_1");
    assert!(descriptions.is_null(1));
}

#[tokio::test]
async fn test_write_gzip_round_trip() {
    let tmp_dir = TempDir::new().unwrap();
    let input_path = tmp_dir.path().join("input.fastq");
    let output_path = tmp_dir.path().join("output.fastq.gz");

    let num_records = 50;
    generate_test_fastq(input_path.to_str().unwrap(), num_records);

    let ctx = SessionContext::new();
    let input_provider =
        FastqTableProvider::new(input_path.to_str().unwrap().to_string()).unwrap();
    ctx.register_table("input_fastq", Arc::new(input_provider))
        .unwrap();
    let output_provider =
        FastqTableProvider::new_for_write(output_path.to_str().unwrap().to_string());
    ctx.register_table("output_fastq", Arc::new(output_provider))
        .unwrap();

    let result = ctx
        .sql("INSERT OVERWRITE output_fastq SELECT * FROM input_fastq")
        .await
        .unwrap()
        .collect()
        .await
        .unwrap();

    let count = result[0]
        .column(0)
        .as_any()
        .downcast_ref::<UInt64Array>()
        .unwrap()
        .value(0);
    assert_eq!(count, num_records as u64);

    // Read the gzip output back.
    let ctx2 = SessionContext::new();
    let read_provider =
        FastqTableProvider::new(output_path.to_str().unwrap().to_string()).unwrap();
    ctx2.register_table("written_fastq", Arc::new(read_provider))
        .unwrap();

    let df = ctx2.sql("SELECT id FROM written_fastq").await.unwrap();
    let batches = df.collect().await.unwrap();

    let total_rows: usize = batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(total_rows, num_records);
}

#[tokio::test]
async fn test_write_with_sql_filter_preserves_row_order() {
    let tmp_dir = TempDir::new().unwrap();
    let input_path = tmp_dir.path().join("input.fastq");
    let output_path = tmp_dir.path().join("filtered.fastq");

    generate_test_fastq(input_path.to_str().unwrap(), 30);

    // A single partition keeps the filtered rows in scan order end-to-end.
    let config = SessionConfig::new().with_target_partitions(1);
    let ctx = SessionContext::new_with_config(config);
    let input_provider =
        FastqTableProvider::new(input_path.to_str().unwrap().to_string()).unwrap();
    ctx.register_table("input_fastq", Arc::new(input_provider))
        .unwrap();
    let output_provider =
        FastqTableProvider::new_for_write(output_path.to_str().unwrap().to_string());
    ctx.register_table("output_fastq", Arc::new(output_provider))
        .unwrap();

    ctx.sql("INSERT OVERWRITE output_fastq SELECT * FROM input_fastq WHERE id LIKE 'read_2%'")
        .await
        .unwrap()
        .collect()
        .await
        .unwrap();

    // read_2, read_20..read_29 = 11 records, written in scan order.
    let content = std::fs::read_to_string(&output_path).unwrap();
    let headers: Vec<&str> = content
        .lines()
        .filter(|line| line.starts_with('@'))
        .collect();
    assert_eq!(headers.len(), 11);
    assert!(headers[0].starts_with("@read_2"));
    assert!(headers[1].starts_with("@read_20"));
    assert!(headers[10].starts_with("@read_29"));
}

#[tokio::test]
async fn test_write_rejects_existing_destination() {
    let tmp_dir = TempDir::new().unwrap();
    let input_path = tmp_dir.path().join("input.fastq");
    let output_path = tmp_dir.path().join("output.fastq");

    generate_test_fastq(input_path.to_str().unwrap(), 2);
    generate_test_fastq(output_path.to_str().unwrap(), 1);

    let ctx = SessionContext::new();
    let input_provider =
        FastqTableProvider::new(input_path.to_str().unwrap().to_string()).unwrap();
    ctx.register_table("input_fastq", Arc::new(input_provider))
        .unwrap();
    let output_provider =
        FastqTableProvider::new_for_write(output_path.to_str().unwrap().to_string());
    ctx.register_table("output_fastq", Arc::new(output_provider))
        .unwrap();

    let result = async {
        let df = ctx
            .sql("INSERT OVERWRITE output_fastq SELECT * FROM input_fastq")
            .await?;
        df.collect().await
    }
    .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("already exists"));

    let content = std::fs::read_to_string(&output_path).unwrap();
    assert!(content.starts_with("@read_0"));
}

#[tokio::test]
async fn test_direct_copy_with_three_column_shape() {
    let tmp_dir = TempDir::new().unwrap();
    let output_path = tmp_dir.path().join("output.fastq");
    let output_str = output_path.to_str().unwrap().to_string();

    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("sequence", DataType::Utf8, false),
        Field::new("quality_scores", DataType::Utf8, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(vec!["read1", "read2"])),
            Arc::new(StringArray::from(vec!["ACGT", "TGCA"])),
            Arc::new(StringArray::from(vec!["IIII", "HHHH"])),
        ],
    )
    .unwrap();

    let shape = bind_fastq_copy(&output_str, schema.as_ref()).unwrap();

    let ctx = SessionContext::new();
    let mem_table = MemTable::try_new(schema, vec![vec![batch]]).unwrap();
    let input = mem_table
        .scan(&ctx.state(), None, &[], None)
        .await
        .unwrap();

    let write_exec = Arc::new(FastqWriteExec::new(input, output_str, shape, None));
    let result = datafusion::physical_plan::collect(write_exec, ctx.task_ctx())
        .await
        .unwrap();

    let count = result[0]
        .column(0)
        .as_any()
        .downcast_ref::<UInt64Array>()
        .unwrap()
        .value(0);
    assert_eq!(count, 2);

    let content = std::fs::read_to_string(&output_path).unwrap();
    assert_eq!(content, "@read1\nACGT\n+\nIIII\n@read2\nTGCA\n+\nHHHH\n");
}

#[tokio::test]
async fn test_zero_row_copy_still_finalizes_the_output() {
    let tmp_dir = TempDir::new().unwrap();
    let output_path = tmp_dir.path().join("empty.fastq");
    let output_str = output_path.to_str().unwrap().to_string();

    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("sequence", DataType::Utf8, false),
        Field::new("quality_scores", DataType::Utf8, false),
    ]));

    let shape = bind_fastq_copy(&output_str, schema.as_ref()).unwrap();

    let ctx = SessionContext::new();
    let mem_table = MemTable::try_new(schema, vec![vec![]]).unwrap();
    let input = mem_table
        .scan(&ctx.state(), None, &[], None)
        .await
        .unwrap();

    let write_exec = Arc::new(FastqWriteExec::new(input, output_str, shape, None));
    let result = datafusion::physical_plan::collect(write_exec, ctx.task_ctx())
        .await
        .unwrap();

    let count = result[0]
        .column(0)
        .as_any()
        .downcast_ref::<UInt64Array>()
        .unwrap()
        .value(0);
    assert_eq!(count, 0);

    assert!(output_path.exists());
    assert_eq!(std::fs::metadata(&output_path).unwrap().len(), 0);
}

#[tokio::test]
async fn test_schema_mismatch_opens_no_file() {
    let tmp_dir = TempDir::new().unwrap();
    let output_path = tmp_dir.path().join("never_created.fastq");

    let schema = Schema::new(vec![
        Field::new("seq_id", DataType::Utf8, false),
        Field::new("sequence", DataType::Utf8, false),
        Field::new("quality_scores", DataType::Utf8, false),
    ]);

    let err = bind_fastq_copy(output_path.to_str().unwrap(), &schema).unwrap_err();
    assert!(err.to_string().contains("invalid column names"));
    assert!(!output_path.exists());
}
