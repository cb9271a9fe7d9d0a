//! Form validation and spreadsheet relay behind the PAWD club website.
//!
//! The site collects two kinds of submissions: membership applications and meeting
//! attendance check-ins. Both are validated here and forwarded as single-row JSON arrays
//! to spreadsheet webhooks.

pub mod config;
pub mod error;
pub mod forms;
pub mod telemetry;
