//! Micro-credit risk scoring for smallholder farmers.
//!
//! Historical yield statistics are loaded once from a directory of CSV exports, then combined
//! with a crop-disease diagnosis to project revenue, revenue at risk, and a bounded credit
//! eligibility score.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
