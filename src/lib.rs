//! # cpk-forge
//!
//! Process-capability engine for manufacturing test logs: parses tolerant
//! comma-separated logs into test records, computes Cp/Cpk/Pp/Ppk and PPM
//! defect estimates, and derives the histogram, normal-curve and
//! control-limit series a renderer needs.

pub mod api;
pub mod capability;
pub mod chart;
pub mod config;
pub mod defects;
pub mod error;
pub mod records;
pub mod report;
pub mod spec_limits;
pub mod stats;
// cmd and tables are binary modules (see main.rs).
