//! infractl library
//!
//! Core functionality for the infractl CLI: EC2 fleet operations,
//! CloudWatch dashboards, cost anomaly detection, cleanup, and the daily
//! report.

pub mod aws_utils;
pub mod cleanup;
pub mod config;
pub mod cost;
pub mod dashboard;
pub mod ec2;
pub mod email;
pub mod error;
pub mod pricing;
pub mod report;
pub mod utils;
pub mod validation;

// Re-export the detector types; they are the crate's core computation
pub use cost::{detect, AnomalyReport};
