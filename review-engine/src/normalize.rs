// Copyright (c) James Kassemi, SC, US. All rights reserved.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use core_types::raw::{KeyedReview, NormalizedReview};

use crate::PipelineError;

/// Derive calendar fields, the helpfulness pair, and the summary
/// length for one deduplicated review.
///
/// The raw epoch is kept on the output row; `review_hour_label` only
/// takes over the display role, so downstream windowing still
/// partitions by the exact second.
pub fn normalize_review(review: KeyedReview, row: usize) -> Result<NormalizedReview, PipelineError> {
    let ts: DateTime<Utc> = Utc
        .timestamp_opt(review.review_time, 0)
        .single()
        .ok_or(PipelineError::TimestampOutOfRange {
            review_time: review.review_time,
            row,
        })?;
    let (helpful_votes, total_votes) = parse_helpful_pair(review.helpful_raw.as_deref());
    let summary_length = review
        .summary
        .as_deref()
        .map(|s| s.chars().count() as f64);
    Ok(NormalizedReview {
        reviewer_id: review.reviewer_id,
        product_id: review.product_id,
        review_time: review.review_time,
        year: format!("{:04}", ts.year()),
        month: format!("{:02}", ts.month()),
        day: format!("{:02}", ts.day()),
        hour: format!("{:02}", ts.hour()),
        review_hour_label: ts.format("%Y%m%d %H").to_string(),
        helpful_votes,
        total_votes,
        overall: review.overall,
        summary_length,
    })
}

/// Split a serialized `"[votes_found_helpful, total_votes]"` pair.
///
/// Anything that is not a bracket-enclosed payload yields (None, None);
/// a bracketed single element yields (value, None). Elements that do
/// not parse as numbers coerce to None individually. Never an error.
fn parse_helpful_pair(raw: Option<&str>) -> (Option<f64>, Option<f64>) {
    let Some(raw) = raw else {
        return (None, None);
    };
    let trimmed = raw.trim();
    let Some(inner) = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
    else {
        return (None, None);
    };
    let mut parts = inner.split(',');
    let numerator = parts.next().and_then(parse_element);
    let denominator = parts.next().and_then(parse_element);
    (numerator, denominator)
}

fn parse_element(element: &str) -> Option<f64> {
    element.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
