// Copyright (c) James Kassemi, SC, US. All rights reserved.

//! Batch aggregation pipeline over normalized review rows.
//!
//! Stages run strictly in order: dedupe -> normalize -> {trend, product}.
//! The trend and product aggregators consume the same normalized set
//! independently and produce independent outputs.

mod dedupe;
mod normalize;
mod product;
mod trend;

pub use dedupe::dedupe_reviews;
pub use normalize::normalize_review;
pub use product::product_rows;
pub use trend::trend_rows;

use core_types::raw::RawReviewRecord;
use core_types::types::{ProductStatRow, TrendStatRow};
use log::info;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("row {row}: missing required key field `{field}`")]
    MissingKeyField { field: &'static str, row: usize },
    #[error("row {row}: review_time {review_time} is outside the representable date range")]
    TimestampOutOfRange { review_time: i64, row: usize },
}

/// Both output tables of a single run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub trend: Vec<TrendStatRow>,
    pub product: Vec<ProductStatRow>,
}

/// Full-batch review aggregation engine.
pub struct ReviewEngine {
    epsilon: f64,
    version: String,
}

impl ReviewEngine {
    pub fn new(epsilon: f64, version: impl Into<String>) -> Self {
        Self {
            epsilon,
            version: version.into(),
        }
    }

    /// Run the whole pipeline over one raw batch.
    pub fn run(&self, raw: Vec<RawReviewRecord>) -> Result<PipelineOutput, PipelineError> {
        let input_count = raw.len();
        let deduped = dedupe_reviews(raw)?;
        let mut normalized = Vec::with_capacity(deduped.len());
        for (row, review) in deduped.into_iter().enumerate() {
            normalized.push(normalize_review(review, row)?);
        }
        info!(
            "normalized {} reviews ({} duplicates collapsed)",
            normalized.len(),
            input_count - normalized.len()
        );

        let trend = trend_rows(&normalized, self.epsilon, &self.version);
        let product = product_rows(&normalized, self.epsilon);
        info!(
            "aggregated {} trend rows and {} product rows",
            trend.len(),
            product.len()
        );
        Ok(PipelineOutput { trend, product })
    }
}

/// Null-skipping mean over already-filtered finite values.
fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Null-skipping approximate median at rank 0.5.
fn approx_median(values: &[f64], epsilon: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    quantile_sketch::quantile_with_options(
        values,
        0.5,
        quantile_sketch::SketchOptions { epsilon },
    )
    .ok()
}
