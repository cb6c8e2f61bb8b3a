// Copyright (c) James Kassemi, SC, US. All rights reserved.

//! Partitioned Parquet sink with a JSON catalog.
//!
//! Each run replaces only the partition directories it produces
//! (dynamic partition overwrite); partitions outside the produced key
//! space keep their bytes and their catalog entries. Catalog
//! registration happens only after every produced partition of a
//! table has been written.

mod artifacts;
mod catalog;

pub use artifacts::{compute_checksum, write_record_batch, ArtifactInfo};
pub use catalog::{CatalogDocument, CatalogStore, PartitionEntry};

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray, UInt64Array};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use chrono::Utc;
use core_types::schema::{product_stat_schema, trend_stat_schema};
use core_types::types::{ProductStatRow, TrendStatRow};
use log::info;
use thiserror::Error;

pub const TREND_PARTITION_KEYS: [&str; 5] = ["version", "year", "month", "day", "hour"];
pub const PRODUCT_PARTITION_KEYS: [&str; 1] = ["version"];
const PART_FILE: &str = "part-00000.parquet";

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy)]
pub struct TableWriteReport {
    pub partitions: usize,
    pub rows: usize,
}

/// Writes result sets under an output root and registers them in the
/// catalog database.
pub struct CatalogSink {
    output_root: PathBuf,
    database: String,
}

impl CatalogSink {
    pub fn new(output_root: impl Into<PathBuf>, database: impl Into<String>) -> Self {
        Self {
            output_root: output_root.into(),
            database: database.into(),
        }
    }

    /// Persist the trend table partitioned by
    /// (version, year, month, day, hour).
    pub fn write_trend_table(
        &self,
        table: &str,
        rows: &[TrendStatRow],
    ) -> Result<TableWriteReport, SinkError> {
        let mut by_partition: BTreeMap<String, Vec<&TrendStatRow>> = BTreeMap::new();
        for row in rows {
            let dir = format!(
                "version={}/year={}/month={}/day={}/hour={}",
                row.version, row.year, row.month, row.day, row.hour
            );
            by_partition.entry(dir).or_default().push(row);
        }

        let mut produced = BTreeMap::new();
        for (dir, partition_rows) in &by_partition {
            let batch = trend_stat_batch(partition_rows)?;
            let info = self.replace_partition(table, dir, &batch)?;
            produced.insert(
                dir.clone(),
                PartitionEntry {
                    relative_path: info.relative_path,
                    checksum: info.checksum,
                    row_count: info.row_count,
                    updated_at: Utc::now(),
                },
            );
        }
        self.register(table, &TREND_PARTITION_KEYS, produced)?;
        info!(
            "wrote {} rows across {} partitions to {}.{}",
            rows.len(),
            by_partition.len(),
            self.database,
            table
        );
        Ok(TableWriteReport {
            partitions: by_partition.len(),
            rows: rows.len(),
        })
    }

    /// Persist the product table under a single fixed version
    /// partition, replaced wholesale on rerun.
    pub fn write_product_table(
        &self,
        table: &str,
        version: &str,
        rows: &[ProductStatRow],
    ) -> Result<TableWriteReport, SinkError> {
        let dir = format!("version={version}");
        let batch = product_stat_batch(rows)?;
        let artifact = self.replace_partition(table, &dir, &batch)?;
        let mut produced = BTreeMap::new();
        produced.insert(
            dir,
            PartitionEntry {
                relative_path: artifact.relative_path,
                checksum: artifact.checksum,
                row_count: artifact.row_count,
                updated_at: Utc::now(),
            },
        );
        self.register(table, &PRODUCT_PARTITION_KEYS, produced)?;
        info!(
            "wrote {} rows to {}.{} (version={})",
            rows.len(),
            self.database,
            table,
            version
        );
        Ok(TableWriteReport {
            partitions: 1,
            rows: rows.len(),
        })
    }

    /// Delete one partition directory and rewrite it from the batch.
    fn replace_partition(
        &self,
        table: &str,
        partition_dir: &str,
        batch: &RecordBatch,
    ) -> Result<ArtifactInfo, SinkError> {
        let absolute = self.output_root.join(table).join(partition_dir);
        if absolute.exists() {
            std::fs::remove_dir_all(&absolute)?;
        }
        let relative_path = format!("{table}/{partition_dir}/{PART_FILE}");
        write_record_batch(&self.output_root, &relative_path, batch)
    }

    fn register(
        &self,
        table: &str,
        partition_keys: &[&str],
        produced: BTreeMap<String, PartitionEntry>,
    ) -> Result<(), SinkError> {
        CatalogStore::new(&self.output_root)
            .merge_partitions(&self.database, table, table, partition_keys, produced)?;
        Ok(())
    }
}

fn trend_stat_batch(rows: &[&TrendStatRow]) -> Result<RecordBatch, SinkError> {
    let schema: SchemaRef = Arc::new(trend_stat_schema());
    let average_helpful = Arc::new(Float64Array::from(
        rows.iter()
            .map(|r| r.average_helpful_rating)
            .collect::<Vec<_>>(),
    )) as ArrayRef;
    let median_helpful = Arc::new(Float64Array::from(
        rows.iter()
            .map(|r| r.median_helpful_rating)
            .collect::<Vec<_>>(),
    )) as ArrayRef;
    let average_overall = Arc::new(Float64Array::from(
        rows.iter()
            .map(|r| r.average_overall_rating)
            .collect::<Vec<_>>(),
    )) as ArrayRef;
    let median_overall = Arc::new(Float64Array::from(
        rows.iter()
            .map(|r| r.median_overall_rating)
            .collect::<Vec<_>>(),
    )) as ArrayRef;
    let arrays = vec![average_helpful, median_helpful, average_overall, median_overall];
    RecordBatch::try_new(schema, arrays).map_err(SinkError::from)
}

fn product_stat_batch(rows: &[ProductStatRow]) -> Result<RecordBatch, SinkError> {
    let schema: SchemaRef = Arc::new(product_stat_schema());
    let product_id = Arc::new(StringArray::from(
        rows.iter().map(|r| r.product_id.clone()).collect::<Vec<_>>(),
    )) as ArrayRef;
    let average_overall = Arc::new(Float64Array::from(
        rows.iter()
            .map(|r| r.average_overall_rating)
            .collect::<Vec<_>>(),
    )) as ArrayRef;
    let median_overall = Arc::new(Float64Array::from(
        rows.iter()
            .map(|r| r.median_overall_rating)
            .collect::<Vec<_>>(),
    )) as ArrayRef;
    let unique_reviewers = Arc::new(UInt64Array::from(
        rows.iter().map(|r| r.unique_reviewers).collect::<Vec<_>>(),
    )) as ArrayRef;
    let average_summary = Arc::new(Float64Array::from(
        rows.iter()
            .map(|r| r.average_summary_length)
            .collect::<Vec<_>>(),
    )) as ArrayRef;
    let median_summary = Arc::new(Float64Array::from(
        rows.iter()
            .map(|r| r.median_summary_length)
            .collect::<Vec<_>>(),
    )) as ArrayRef;
    let arrays = vec![
        product_id,
        average_overall,
        median_overall,
        unique_reviewers,
        average_summary,
        median_summary,
    ];
    RecordBatch::try_new(schema, arrays).map_err(SinkError::from)
}
