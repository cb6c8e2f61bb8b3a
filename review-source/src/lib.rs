// Copyright (c) James Kassemi, SC, US. All rights reserved.

//! Streaming CSV source for raw review rows.
//!
//! Header names are resolved by position lookup rather than serde so an
//! input with extra or reordered columns still loads. Field-level
//! coercion never fails a row; a value that does not parse lands as
//! `None` and downstream stages decide whether that is fatal.

mod errors;

pub use errors::SourceError;

use std::collections::HashMap;
use std::path::Path;

use core_types::raw::RawReviewRecord;
use csv_async::{AsyncReaderBuilder, StringRecord, Trim};
use futures::StreamExt;
use log::{info, warn};
use tokio::fs::File;
use tokio::io::{AsyncRead, BufReader};

pub const REQUIRED_COLUMNS: [&str; 6] = [
    "reviewerId",
    "asin",
    "reviewTime",
    "overall",
    "helpful",
    "summary",
];

#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    reviewer_id: usize,
    product_id: usize,
    review_time: usize,
    overall: usize,
    helpful: usize,
    summary: usize,
}

fn resolve_columns(headers: &StringRecord) -> Result<ColumnIndex, SourceError> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins when a header name repeats.
        positions.entry(name).or_insert(idx);
    }
    let lookup = |column: &'static str| {
        positions
            .get(column)
            .copied()
            .ok_or(SourceError::MissingColumn {
                column: column.to_string(),
            })
    };
    Ok(ColumnIndex {
        reviewer_id: lookup("reviewerId")?,
        product_id: lookup("asin")?,
        review_time: lookup("reviewTime")?,
        overall: lookup("overall")?,
        helpful: lookup("helpful")?,
        summary: lookup("summary")?,
    })
}

fn non_empty(field: Option<&str>) -> Option<String> {
    field.filter(|s| !s.is_empty()).map(str::to_string)
}

fn parse_review_row(record: &StringRecord, columns: &ColumnIndex) -> RawReviewRecord {
    RawReviewRecord {
        reviewer_id: non_empty(record.get(columns.reviewer_id)),
        product_id: non_empty(record.get(columns.product_id)),
        review_time: record
            .get(columns.review_time)
            .and_then(|s| s.parse::<i64>().ok()),
        overall: record
            .get(columns.overall)
            .and_then(|s| s.parse::<f64>().ok()),
        helpful_raw: non_empty(record.get(columns.helpful)),
        summary: non_empty(record.get(columns.summary)),
    }
}

/// Read every review row from a delimited byte stream.
///
/// The header row is required and must contain all of
/// [`REQUIRED_COLUMNS`]. Structurally malformed records (bad quoting,
/// wrong field count) are skipped with a warning rather than aborting
/// the run.
pub async fn read_reviews<R>(reader: R) -> Result<Vec<RawReviewRecord>, SourceError>
where
    R: AsyncRead + Unpin + Send,
{
    let mut csv_reader = AsyncReaderBuilder::new()
        .trim(Trim::All)
        .create_reader(reader);
    let headers = csv_reader.headers().await?.clone();
    let columns = resolve_columns(&headers)?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    let mut records = csv_reader.records();
    while let Some(record) = records.next().await {
        match record {
            Ok(record) => rows.push(parse_review_row(&record, &columns)),
            Err(err) => {
                skipped += 1;
                warn!("skipping malformed record: {}", err);
            }
        }
    }
    info!(
        "loaded {} review rows ({} malformed records skipped)",
        rows.len(),
        skipped
    );
    Ok(rows)
}

pub async fn read_reviews_file(path: &Path) -> Result<Vec<RawReviewRecord>, SourceError> {
    let file = File::open(path).await?;
    read_reviews(BufReader::new(file)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "reviewerId,asin,reviewTime,overall,helpful,summary";

    async fn read_str(input: &str) -> Result<Vec<RawReviewRecord>, SourceError> {
        read_reviews(input.as_bytes()).await
    }

    #[tokio::test]
    async fn parses_well_formed_rows() {
        let input = format!(
            "{}\nA1,B00X,1393545600,5.0,\"[2, 3]\",Great strings\nA2,B00Y,1393549200,3.5,\"[0, 0]\",Okay\n",
            HEADER
        );
        let rows = read_str(&input).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].reviewer_id.as_deref(), Some("A1"));
        assert_eq!(rows[0].product_id.as_deref(), Some("B00X"));
        assert_eq!(rows[0].review_time, Some(1393545600));
        assert_eq!(rows[0].overall, Some(5.0));
        assert_eq!(rows[0].helpful_raw.as_deref(), Some("[2, 3]"));
        assert_eq!(rows[0].summary.as_deref(), Some("Great strings"));
        assert_eq!(rows[1].overall, Some(3.5));
    }

    #[tokio::test]
    async fn reordered_and_extra_columns_resolve_by_name() {
        let input = "extra,overall,summary,asin,helpful,reviewTime,reviewerId\n\
                     x,4.0,Nice,B00Z,\"[1, 1]\",1393545600,A9\n";
        let rows = read_str(input).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].reviewer_id.as_deref(), Some("A9"));
        assert_eq!(rows[0].product_id.as_deref(), Some("B00Z"));
        assert_eq!(rows[0].overall, Some(4.0));
    }

    #[tokio::test]
    async fn missing_column_is_rejected() {
        let input = "reviewerId,asin,overall,helpful,summary\nA1,B00X,5.0,\"[0, 0]\",ok\n";
        let err = read_str(input).await.unwrap_err();
        match err {
            SourceError::MissingColumn { column } => assert_eq!(column, "reviewTime"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unparseable_fields_coerce_to_none() {
        let input = format!(
            "{}\nA1,B00X,not-a-number,excellent,\"[2, 3]\",Great\n,,1393545600,5.0,,\n",
            HEADER
        );
        let rows = read_str(&input).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].review_time, None);
        assert_eq!(rows[0].overall, None);
        assert_eq!(rows[1].reviewer_id, None);
        assert_eq!(rows[1].product_id, None);
        assert_eq!(rows[1].helpful_raw, None);
        assert_eq!(rows[1].summary, None);
        assert_eq!(rows[1].review_time, Some(1393545600));
    }

    #[tokio::test]
    async fn short_rows_are_skipped() {
        let input = format!("{}\nA1,B00X\nA2,B00Y,1393545600,4.0,\"[1, 2]\",fine\n", HEADER);
        let rows = read_str(&input).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].reviewer_id.as_deref(), Some("A2"));
    }

    #[tokio::test]
    async fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        writeln!(file, "A1,B00X,1393545600,5.0,\"[2, 3]\",Great").unwrap();
        drop(file);

        let rows = read_reviews_file(&path).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_id.as_deref(), Some("B00X"));
    }
}
