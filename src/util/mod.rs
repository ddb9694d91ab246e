//! Utility modules for kube-metrics.

mod duration_parser;

pub use duration_parser::{DurationParseError, parse_duration};
