// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::process;

use catalog_sink::{CatalogSink, SinkError};
use core_types::config::RunConfig;
use review_engine::{PipelineError, ReviewEngine};
use review_source::SourceError;
use thiserror::Error;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("review-abt failed: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let config = RunConfig::load()?;
    println!(
        "review-abt booted; input {}, output root {}, database {}",
        config.input_file.display(),
        config.output_root.display(),
        config.catalog_database
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let raw = runtime.block_on(review_source::read_reviews_file(&config.input_file))?;
    println!("loaded {} raw review rows", raw.len());

    let engine = ReviewEngine::new(config.quantile_epsilon, config.version.clone());
    let output = engine.run(raw)?;

    let sink = CatalogSink::new(&config.output_root, &config.catalog_database);
    let trend_report = sink.write_trend_table(&config.trend_table, &output.trend)?;
    let product_report =
        sink.write_product_table(&config.product_table, &config.version, &output.product)?;
    println!(
        "trend table {}: {} rows across {} partitions",
        config.trend_table, trend_report.rows, trend_report.partitions
    );
    println!(
        "product table {}: {} rows under version={}",
        config.product_table, product_report.rows, config.version
    );
    Ok(())
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("failed to build async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}
