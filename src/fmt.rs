//! Locale-aware number formatting for plot titles.
//!
//! Separators come from the CLDR tables in `num_format`; this module only
//! adds `%.Nf`-style rounding on top of its integer grouping.

use num_format::{Locale, ToFormattedString};
use thiserror::Error;

/// Error returned for a locale tag `num_format` does not know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown number format language '{0}': expected a tag like 'de-CH' or 'en'")]
pub struct LocaleError(pub String);

/// Number formatter bound to one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    locale: Locale,
}

impl NumberFormat {
    /// Creates a formatter for a locale tag (`"de-CH"`, `"en"`, `"fr_FR"`).
    ///
    /// A region the locale tables lack falls back to its language
    /// (`"de-DE"` formats as `"de"`).
    pub fn new(tag: &str) -> Result<Self, LocaleError> {
        let (language, region) = split_tag(tag).ok_or_else(|| LocaleError(tag.to_string()))?;
        let full = region.map(|region| format!("{language}-{region}"));
        let locale = full
            .iter()
            .map(String::as_str)
            .chain([language.as_str()])
            .find_map(|name| Locale::from_name(name).ok())
            .ok_or_else(|| LocaleError(tag.to_string()))?;
        Ok(Self { locale })
    }

    /// Name of the resolved locale.
    pub fn tag(&self) -> &str {
        self.locale.name()
    }

    /// Formats `value` with `precision` fractional digits and grouped thousands.
    ///
    /// Ties round to even, so `2.25` at one digit is `2.2`.
    pub fn format(&self, value: f64, precision: usize) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 { "∞" } else { "-∞" }.to_string();
        }

        let Some(factor) = u32::try_from(precision)
            .ok()
            .and_then(|p| 10u64.checked_pow(p))
        else {
            return format!("{value:.precision$}");
        };
        let scaled = (value * factor as f64).round_ties_even();
        if scaled.abs() >= u64::MAX as f64 {
            return format!("{value:.precision$}");
        }
        let magnitude = scaled.abs() as u64;

        let mut out = String::new();
        // "-0" is not worth a sign.
        if scaled < 0.0 {
            out.push_str(self.locale.minus_sign());
        }
        out.push_str(&(magnitude / factor).to_formatted_string(&self.locale));
        if precision > 0 {
            out.push_str(self.locale.decimal());
            out.push_str(&format!("{:0precision$}", magnitude % factor));
        }
        out
    }

    /// Formats `value` and appends a unit suffix (`"1’500m"`, `"3.2Gi"`).
    pub fn format_unit(&self, value: f64, precision: usize, unit: &str) -> String {
        let mut s = self.format(value, precision);
        s.push_str(unit);
        s
    }
}

/// Splits `de_ch` / `DE-CH` into `("de", Some("CH"))`.
fn split_tag(tag: &str) -> Option<(String, Option<String>)> {
    let mut parts = tag.trim().split(['-', '_']);
    let language = parts.next().filter(|l| !l.is_empty())?.to_ascii_lowercase();
    let region = parts.next().map(|r| {
        if r.len() == 2 {
            r.to_ascii_uppercase()
        } else {
            r.to_string()
        }
    });
    if parts.next().is_some() {
        return None;
    }
    Some((language, region))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swiss_german() {
        let nf = NumberFormat::new("de-CH").unwrap();
        assert_eq!(nf.format(1500.0, 0), "1’500");
        assert_eq!(nf.format(1234567.891, 1), "1’234’567.9");
        assert_eq!(nf.format_unit(1.5 * 1000.0, 0, "m"), "1’500m");
        assert_eq!(nf.tag(), "de-CH");
    }

    #[test]
    fn test_english_and_german() {
        let en = NumberFormat::new("en").unwrap();
        assert_eq!(en.format(999.0, 0), "999");
        assert_eq!(en.format(1000.0, 0), "1,000");
        assert_eq!(en.format_unit(12.75, 1, "Gi"), "12.8Gi");

        let de = NumberFormat::new("de_de").unwrap();
        assert!(de.tag().starts_with("de"));
        assert_eq!(de.format(12345.5, 1), "12.345,5");
    }

    #[test]
    fn test_ties_round_to_even() {
        let en = NumberFormat::new("en").unwrap();
        assert_eq!(en.format(2.25, 1), "2.2");
        assert_eq!(en.format(2.75, 1), "2.8");
        assert_eq!(en.format(0.5, 0), "0");
        assert_eq!(en.format(1.5, 0), "2");
    }

    #[test]
    fn test_sign_and_padding() {
        let en = NumberFormat::new("en").unwrap();
        assert_eq!(en.format(-0.4, 0), "0");
        assert_eq!(en.format(-1234.0, 0), "-1,234");
        assert_eq!(en.format(0.0, 1), "0.0");
        assert_eq!(en.format(3.05, 2), "3.05");
    }

    #[test]
    fn test_non_finite() {
        let en = NumberFormat::new("en").unwrap();
        assert_eq!(en.format(f64::NAN, 0), "NaN");
        assert_eq!(en.format(f64::INFINITY, 1), "∞");
        assert_eq!(en.format(f64::NEG_INFINITY, 1), "-∞");
    }

    #[test]
    fn test_unknown_tags() {
        assert!(NumberFormat::new("").is_err());
        assert!(NumberFormat::new("german").is_err());
        assert!(NumberFormat::new("xx-YY").is_err());
        assert!(NumberFormat::new("de-CH-x").is_err());
    }
}
