// Copyright (c) James Kassemi, SC, US. All rights reserved.

//! Arrow schemas for the two output tables.
//!
//! Partition key columns (`version`, `year`, `month`, `day`, `hour`)
//! are carried in the artifact path, hive-style, not in the data
//! files.

use arrow::datatypes::{DataType, Field, Schema};

/// Data-file schema for the trend statistics table.
pub fn trend_stat_schema() -> Schema {
    Schema::new(vec![
        Field::new("average_helpful_rating", DataType::Float64, true),
        Field::new("median_helpful_rating", DataType::Float64, true),
        Field::new("average_overall_rating", DataType::Float64, true),
        Field::new("median_overall_rating", DataType::Float64, true),
    ])
}

/// Data-file schema for the product statistics table.
pub fn product_stat_schema() -> Schema {
    Schema::new(vec![
        Field::new("product_id", DataType::Utf8, false),
        Field::new("average_overall_rating", DataType::Float64, true),
        Field::new("median_overall_rating", DataType::Float64, true),
        Field::new("unique_reviewers", DataType::UInt64, false),
        Field::new("average_summary_length", DataType::Float64, true),
        Field::new("median_summary_length", DataType::Float64, true),
    ])
}
