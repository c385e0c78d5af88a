//! Loan document intake: simulated extraction, legal form matching, and a
//! maker-checker approval trail.

pub mod config;
pub mod error;
pub mod intake;
pub mod telemetry;
