// Copyright (c) James Kassemi, SC, US. All rights reserved.

//! Shared record types, output schemas, and run configuration for the
//! review analytics pipeline.

pub mod config;
pub mod raw;
pub mod schema;
pub mod types;
