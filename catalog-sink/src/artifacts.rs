// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::{fs::File, io::Read, path::Path};

use arrow::record_batch::RecordBatch;
use crc32fast::Hasher as Crc32;
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};

use crate::SinkError;

pub struct ArtifactInfo {
    pub relative_path: String,
    pub checksum: u32,
    pub row_count: usize,
}

/// Write one batch as a compressed Parquet artifact under the root
/// and return its checksum.
pub fn write_record_batch(
    root: &Path,
    relative_path: &str,
    batch: &RecordBatch,
) -> Result<ArtifactInfo, SinkError> {
    let path = root.join(relative_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(&path)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(batch)?;
    writer.close()?;
    let checksum = compute_checksum(&path)?;
    Ok(ArtifactInfo {
        relative_path: relative_path.to_string(),
        checksum,
        row_count: batch.num_rows(),
    })
}

pub fn compute_checksum(path: &Path) -> Result<u32, SinkError> {
    let mut file = File::open(path)?;
    let mut hasher = Crc32::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize())
}
