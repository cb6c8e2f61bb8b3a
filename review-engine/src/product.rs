// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::collections::{BTreeMap, HashSet};

use core_types::raw::NormalizedReview;
use core_types::types::ProductStatRow;

use crate::{approx_median, mean};

#[derive(Default)]
struct ProductGroup {
    ratings: Vec<f64>,
    summary_lengths: Vec<f64>,
    reviewers: HashSet<String>,
}

/// Per-product rollups: a pure reduce-by-key on `product_id`.
///
/// Output order is product_id ascending so reruns emit identical rows.
pub fn product_rows(reviews: &[NormalizedReview], epsilon: f64) -> Vec<ProductStatRow> {
    let mut groups: BTreeMap<&str, ProductGroup> = BTreeMap::new();
    for review in reviews {
        let group = groups.entry(review.product_id.as_str()).or_default();
        if let Some(rating) = review.overall.filter(|v| v.is_finite()) {
            group.ratings.push(rating);
        }
        if let Some(length) = review.summary_length.filter(|v| v.is_finite()) {
            group.summary_lengths.push(length);
        }
        group.reviewers.insert(review.reviewer_id.clone());
    }

    groups
        .into_iter()
        .map(|(product_id, group)| ProductStatRow {
            product_id: product_id.to_string(),
            average_overall_rating: mean(&group.ratings),
            median_overall_rating: approx_median(&group.ratings, epsilon),
            unique_reviewers: group.reviewers.len() as u64,
            average_summary_length: mean(&group.summary_lengths),
            median_summary_length: approx_median(&group.summary_lengths, epsilon),
        })
        .collect()
}
