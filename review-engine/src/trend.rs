// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::collections::{HashMap, HashSet};

use core_types::raw::NormalizedReview;
use core_types::types::TrendStatRow;

use crate::{approx_median, mean};

/// Hour-granularity trend statistics via window-then-distinct.
///
/// Two window keys partition by the raw epoch second (finer than the
/// projected hour): helpfulness stats per `review_time`, rating stats
/// per (`review_time`, `product_id`). Every input row receives the
/// statistics of its partitions, then the projection to calendar
/// fields collapses identical rows. Output is therefore one row per
/// unique (hour, statistic-tuple) combination, not one row per hour.
pub fn trend_rows(reviews: &[NormalizedReview], epsilon: f64, version: &str) -> Vec<TrendStatRow> {
    let mut helpful_by_second: HashMap<i64, Vec<f64>> = HashMap::new();
    let mut overall_by_second_product: HashMap<(i64, &str), Vec<f64>> = HashMap::new();
    for review in reviews {
        if let Some(votes) = review.helpful_votes.filter(|v| v.is_finite()) {
            helpful_by_second
                .entry(review.review_time)
                .or_default()
                .push(votes);
        }
        if let Some(rating) = review.overall.filter(|v| v.is_finite()) {
            overall_by_second_product
                .entry((review.review_time, review.product_id.as_str()))
                .or_default()
                .push(rating);
        }
    }

    let helpful_stats: HashMap<i64, (Option<f64>, Option<f64>)> = helpful_by_second
        .into_iter()
        .map(|(key, values)| (key, (mean(&values), approx_median(&values, epsilon))))
        .collect();
    let overall_stats: HashMap<(i64, &str), (Option<f64>, Option<f64>)> =
        overall_by_second_product
            .into_iter()
            .map(|(key, values)| (key, (mean(&values), approx_median(&values, epsilon))))
            .collect();

    let mut seen: HashSet<(
        String,
        String,
        String,
        String,
        [Option<u64>; 4],
    )> = HashSet::new();
    let mut rows = Vec::new();
    for review in reviews {
        let (average_helpful, median_helpful) = helpful_stats
            .get(&review.review_time)
            .copied()
            .unwrap_or((None, None));
        let (average_overall, median_overall) = overall_stats
            .get(&(review.review_time, review.product_id.as_str()))
            .copied()
            .unwrap_or((None, None));
        // bit-pattern keys keep the distinct pass None-aware and exact
        let key = (
            review.year.clone(),
            review.month.clone(),
            review.day.clone(),
            review.hour.clone(),
            [
                average_helpful.map(f64::to_bits),
                median_helpful.map(f64::to_bits),
                average_overall.map(f64::to_bits),
                median_overall.map(f64::to_bits),
            ],
        );
        if seen.insert(key) {
            rows.push(TrendStatRow {
                year: review.year.clone(),
                month: review.month.clone(),
                day: review.day.clone(),
                hour: review.hour.clone(),
                average_helpful_rating: average_helpful,
                median_helpful_rating: median_helpful,
                average_overall_rating: average_overall,
                median_overall_rating: median_overall,
                version: version.to_string(),
            });
        }
    }
    rows
}
