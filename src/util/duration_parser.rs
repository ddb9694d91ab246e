//! Duration parser for CLI arguments.
//!
//! Supports:
//! - Plain seconds: `5`
//! - Single unit: `500ms`, `2s`, `1.5s`, `3m`, `1h`
//! - Compound: `1m30s`, `1h2m3.5s`
//!
//! Units: `ns`, `us`/`µs`, `ms`, `s`, `m`, `h`.

use std::time::Duration;

use thiserror::Error;

/// Error type for duration parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to parse duration '{input}': {message}")]
pub struct DurationParseError {
    pub input: String,
    pub message: String,
}

/// Parse a duration string such as `1s`, `500ms` or `1m30s`.
///
/// A bare number is taken as seconds. Zero durations are rejected since a
/// zero polling interval would spin.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use kube_metrics::util::parse_duration;
///
/// assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
/// assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let input = input.trim();
    let err = |message: &str| DurationParseError {
        input: input.to_string(),
        message: message.to_string(),
    };

    if input.is_empty() {
        return Err(err("empty duration"));
    }

    let duration = if let Some(secs) = try_parse_plain_seconds(input) {
        secs
    } else {
        parse_units(input).map_err(err)?
    };

    if duration.is_zero() {
        return Err(err("duration must be greater than zero"));
    }
    Ok(duration)
}

/// Plain decimal number of seconds (`5`, `0.5`).
fn try_parse_plain_seconds(input: &str) -> Option<Duration> {
    if !input.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let secs: f64 = input.parse().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

/// Sequence of `<number><unit>` terms.
fn parse_units(input: &str) -> Result<Duration, &'static str> {
    let mut total = Duration::ZERO;
    let mut rest = input;

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or("missing unit")?;
        if number_len == 0 {
            return Err("expected a number");
        }
        let number: f64 = rest[..number_len].parse().map_err(|_| "invalid number")?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let nanos_per_unit = match &rest[..unit_len] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return Err("unknown unit (use ns, us, ms, s, m, h)"),
        };
        rest = &rest[unit_len..];

        let term = Duration::try_from_secs_f64(number * nanos_per_unit / 1e9)
            .map_err(|_| "duration out of range")?;
        total = total.checked_add(term).ok_or("duration out of range")?;
    }

    Ok(total)
}
