// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::SinkError;

/// One registered partition of a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionEntry {
    pub relative_path: String,
    pub checksum: u32,
    pub row_count: usize,
    pub updated_at: DateTime<Utc>,
}

/// Catalog document for one table, persisted as pretty JSON under
/// `_catalog/<database>/<table>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub database: String,
    pub table: String,
    pub location: String,
    pub partition_keys: Vec<String>,
    /// Keyed by the hive-style partition directory, e.g.
    /// `version=v1/year=2014/month=01/day=01/hour=05`.
    pub partitions: BTreeMap<String, PartitionEntry>,
}

pub struct CatalogStore {
    root: PathBuf,
}

impl CatalogStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn document_path(&self, database: &str, table: &str) -> PathBuf {
        self.root
            .join("_catalog")
            .join(database)
            .join(format!("{table}.json"))
    }

    pub fn load(&self, database: &str, table: &str) -> Result<Option<CatalogDocument>, SinkError> {
        let path = self.document_path(database, table);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    /// Merge the produced partitions into the table's document,
    /// leaving entries outside the produced key space untouched.
    pub fn merge_partitions(
        &self,
        database: &str,
        table: &str,
        location: &str,
        partition_keys: &[&str],
        produced: BTreeMap<String, PartitionEntry>,
    ) -> Result<CatalogDocument, SinkError> {
        let mut document = self.load(database, table)?.unwrap_or(CatalogDocument {
            database: database.to_string(),
            table: table.to_string(),
            location: location.to_string(),
            partition_keys: partition_keys.iter().map(|k| k.to_string()).collect(),
            partitions: BTreeMap::new(),
        });
        document.location = location.to_string();
        document.partition_keys = partition_keys.iter().map(|k| k.to_string()).collect();
        document.partitions.extend(produced);
        self.persist(&document)?;
        Ok(document)
    }

    fn persist(&self, document: &CatalogDocument) -> Result<(), SinkError> {
        let path = self.document_path(&document.database, &document.table);
        Self::ensure_parent(&path)?;
        let file = fs::File::create(path)?;
        serde_json::to_writer_pretty(file, document)?;
        Ok(())
    }

    fn ensure_parent(path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(path: &str, checksum: u32) -> PartitionEntry {
        PartitionEntry {
            relative_path: path.to_string(),
            checksum,
            row_count: 1,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn writes_and_loads_document() {
        let dir = tempdir().unwrap();
        let store = CatalogStore::new(dir.path());
        let mut produced = BTreeMap::new();
        produced.insert(
            "version=v1/year=2014/month=01/day=01/hour=05".to_string(),
            entry("t/part-00000.parquet", 7),
        );
        store
            .merge_partitions("reviews", "trend", "trend", &["version", "year"], produced)
            .unwrap();
        let loaded = store.load("reviews", "trend").unwrap().unwrap();
        assert_eq!(loaded.table, "trend");
        assert_eq!(loaded.partition_keys, vec!["version", "year"]);
        assert_eq!(loaded.partitions.len(), 1);
    }

    #[test]
    fn merge_keeps_partitions_outside_produced_key_space() {
        let dir = tempdir().unwrap();
        let store = CatalogStore::new(dir.path());
        let mut first = BTreeMap::new();
        first.insert("version=v1/hour=05".to_string(), entry("a.parquet", 1));
        first.insert("version=v1/hour=06".to_string(), entry("b.parquet", 2));
        store
            .merge_partitions("reviews", "trend", "trend", &["version", "hour"], first)
            .unwrap();

        let mut rerun = BTreeMap::new();
        rerun.insert("version=v1/hour=05".to_string(), entry("a.parquet", 9));
        let merged = store
            .merge_partitions("reviews", "trend", "trend", &["version", "hour"], rerun)
            .unwrap();
        assert_eq!(merged.partitions.len(), 2);
        assert_eq!(merged.partitions["version=v1/hour=05"].checksum, 9);
        assert_eq!(merged.partitions["version=v1/hour=06"].checksum, 2);
    }

    #[test]
    fn missing_document_loads_as_none() {
        let dir = tempdir().unwrap();
        let store = CatalogStore::new(dir.path());
        assert!(store.load("reviews", "absent").unwrap().is_none());
    }
}
