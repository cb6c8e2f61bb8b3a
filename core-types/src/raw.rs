// Copyright (c) James Kassemi, SC, US. All rights reserved.

use serde::{Deserialize, Serialize};

/// One review row as parsed from the delimited input file.
///
/// Field-level coercion failures surface as `None`; whether a missing
/// field is fatal is decided downstream (natural-key fields are, the
/// rest are excluded by null-skipping aggregates).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawReviewRecord {
    pub reviewer_id: Option<String>,
    pub product_id: Option<String>,
    pub review_time: Option<i64>,
    pub overall: Option<f64>,
    pub helpful_raw: Option<String>,
    pub summary: Option<String>,
}

/// A review whose natural-key fields passed dedup validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyedReview {
    pub reviewer_id: String,
    pub product_id: String,
    pub review_time: i64,
    pub overall: Option<f64>,
    pub helpful_raw: Option<String>,
    pub summary: Option<String>,
}

/// Fully normalized review with derived calendar and helpfulness
/// fields. `review_time` keeps the raw epoch so window partitioning
/// is unaffected by the display-form `review_hour_label`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedReview {
    pub reviewer_id: String,
    pub product_id: String,
    pub review_time: i64,
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: String,
    pub review_hour_label: String,
    pub helpful_votes: Option<f64>,
    pub total_votes: Option<f64>,
    pub overall: Option<f64>,
    pub summary_length: Option<f64>,
}
