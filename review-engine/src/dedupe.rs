// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::collections::HashSet;

use core_types::raw::{KeyedReview, RawReviewRecord};

use crate::PipelineError;

/// Collapse duplicate reviews sharing (reviewer_id, product_id,
/// review_time) down to one representative.
///
/// The first occurrence in input order wins. A record missing any of
/// the three key fields fails the run; every other field rides along
/// untouched.
pub fn dedupe_reviews(raw: Vec<RawReviewRecord>) -> Result<Vec<KeyedReview>, PipelineError> {
    let mut seen: HashSet<(String, String, i64)> = HashSet::with_capacity(raw.len());
    let mut unique = Vec::with_capacity(raw.len());
    for (row, record) in raw.into_iter().enumerate() {
        let reviewer_id = record
            .reviewer_id
            .ok_or(PipelineError::MissingKeyField {
                field: "reviewer_id",
                row,
            })?;
        let product_id = record
            .product_id
            .ok_or(PipelineError::MissingKeyField {
                field: "product_id",
                row,
            })?;
        let review_time = record
            .review_time
            .ok_or(PipelineError::MissingKeyField {
                field: "review_time",
                row,
            })?;
        if seen.insert((reviewer_id.clone(), product_id.clone(), review_time)) {
            unique.push(KeyedReview {
                reviewer_id,
                product_id,
                review_time,
                overall: record.overall,
                helpful_raw: record.helpful_raw,
                summary: record.summary,
            });
        }
    }
    Ok(unique)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(reviewer: &str, product: &str, ts: i64, overall: Option<f64>) -> RawReviewRecord {
        RawReviewRecord {
            reviewer_id: Some(reviewer.to_string()),
            product_id: Some(product.to_string()),
            review_time: Some(ts),
            overall,
            helpful_raw: None,
            summary: None,
        }
    }

    #[test]
    fn keeps_first_occurrence_of_duplicate_key() {
        let rows = dedupe_reviews(vec![
            record("A", "B001", 100, Some(4.0)),
            record("A", "B001", 100, Some(1.0)),
            record("A", "B001", 101, Some(2.0)),
        ])
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].overall, Some(4.0));
        assert_eq!(rows[1].review_time, 101);
    }

    #[test]
    fn no_surviving_pair_shares_the_natural_key() {
        let rows = dedupe_reviews(vec![
            record("A", "B001", 100, None),
            record("B", "B001", 100, None),
            record("A", "B002", 100, None),
            record("A", "B001", 100, None),
            record("B", "B001", 100, None),
        ])
        .unwrap();
        let keys: HashSet<_> = rows
            .iter()
            .map(|r| (r.reviewer_id.as_str(), r.product_id.as_str(), r.review_time))
            .collect();
        assert_eq!(keys.len(), rows.len());
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn missing_reviewer_id_names_field_and_row() {
        let mut bad = record("A", "B001", 100, None);
        bad.reviewer_id = None;
        let err = dedupe_reviews(vec![record("B", "B001", 100, None), bad]).unwrap_err();
        match err {
            PipelineError::MissingKeyField { field, row } => {
                assert_eq!(field, "reviewer_id");
                assert_eq!(row, 1);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
