// Copyright (c) James Kassemi, SC, US. All rights reserved.

use serde::{Deserialize, Serialize};

/// Hour-granularity trend statistics row.
///
/// One row per unique (hour, statistic-tuple) combination: window
/// statistics are attached per input row before the distinct pass, so
/// several rows may share a calendar hour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendStatRow {
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: String,
    pub average_helpful_rating: Option<f64>,
    pub median_helpful_rating: Option<f64>,
    pub average_overall_rating: Option<f64>,
    pub median_overall_rating: Option<f64>,
    pub version: String,
}

/// Per-product rollup row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductStatRow {
    pub product_id: String,
    pub average_overall_rating: Option<f64>,
    pub median_overall_rating: Option<f64>,
    pub unique_reviewers: u64,
    pub average_summary_length: Option<f64>,
    pub median_summary_length: Option<f64>,
}
