// Copyright (c) James Kassemi, SC, US. All rights reserved.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv_async::Error),
    #[error("input is missing required column: {column}")]
    MissingColumn { column: String },
}
