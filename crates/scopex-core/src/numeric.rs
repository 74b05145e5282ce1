use crate::config::NumericConfig;
use crate::error::ScopexError;
use regex::Regex;

/// Punctuation commonly glued to table cells and footnoted figures.
const EDGE_PUNCTUATION: &[char] = &['(', ')', '%', '*', ';', ':', '"', '\''];

/// Decides whether a token is a usable measurement value.
///
/// Rejection is the common case and is not an error: page numbers, years,
/// footnote markers and words all fall through to `None`.
#[derive(Debug, Clone)]
pub struct NumericFilter {
    thousands_separator: String,
    year: Regex,
    min_integer_digits: usize,
    reject_single_digit_point_zero: bool,
}

impl NumericFilter {
    pub fn new(config: &NumericConfig) -> Result<Self, ScopexError> {
        let year = Regex::new(&config.year_pattern).map_err(|e| {
            ScopexError::ConfigInvalid(format!(
                "numeric.year_pattern '{}' is not a valid regex: {e}",
                config.year_pattern
            ))
        })?;
        Ok(NumericFilter {
            thousands_separator: config.thousands_separator.clone(),
            year,
            min_integer_digits: config.min_integer_digits,
            reject_single_digit_point_zero: config.reject_single_digit_point_zero,
        })
    }

    /// Parse `token` as a measurement, or return `None` if it is not plausible.
    pub fn parse(&self, token: &str) -> Option<f64> {
        let trimmed = token.trim().trim_matches(EDGE_PUNCTUATION);
        let stripped = if self.thousands_separator.is_empty() {
            trimmed.to_string()
        } else {
            trimmed.replace(self.thousands_separator.as_str(), "")
        };

        if !is_plain_decimal(&stripped) {
            return None;
        }
        let value: f64 = stripped.parse().ok()?;
        if !value.is_finite() {
            return None;
        }

        if self.year.is_match(&stripped) {
            return None;
        }

        let unsigned = stripped.trim_start_matches(['+', '-']);
        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (unsigned, None),
        };

        if self.reject_single_digit_point_zero {
            if let Some(frac) = frac_part {
                let significant = int_part.trim_start_matches('0');
                if significant.len() == 1 && !frac.is_empty() && frac.chars().all(|c| c == '0') {
                    return None;
                }
            }
        }

        if int_part.len() < self.min_integer_digits {
            return None;
        }

        Some(value)
    }

    /// Parse and render the canonical key used for counting across pages.
    pub fn canonical(&self, token: &str) -> Option<String> {
        self.parse(token).map(canonical_value)
    }
}

/// Shortest display form of a value: `12345`, `0.5`, `-3.25`.
pub fn canonical_value(value: f64) -> String {
    format!("{value}")
}

/// Optional sign, digits, at most one `.` followed by digits.
fn is_plain_decimal(s: &str) -> bool {
    let body = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (body, None),
    };
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match frac_part {
        Some(f) => !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> NumericFilter {
        NumericFilter::new(&NumericConfig::default()).unwrap()
    }

    #[test]
    fn test_year_rejected() {
        assert_eq!(filter().parse("2020"), None);
        assert_eq!(filter().parse("2035"), None);
    }

    #[test]
    fn test_single_digit_point_zero_rejected() {
        assert_eq!(filter().parse("5.0"), None);
        assert_eq!(filter().parse("7.00"), None);
    }

    #[test]
    fn test_single_digit_point_zero_allowed_when_disabled() {
        let config = NumericConfig {
            reject_single_digit_point_zero: false,
            min_integer_digits: 1,
            ..NumericConfig::default()
        };
        let f = NumericFilter::new(&config).unwrap();
        assert_eq!(f.parse("5.0"), Some(5.0));
    }

    #[test]
    fn test_four_digit_value_accepted() {
        assert_eq!(filter().parse("1234"), Some(1234.0));
    }

    #[test]
    fn test_thousands_separator_stripped() {
        assert_eq!(filter().parse("12,345"), Some(12345.0));
        assert_eq!(filter().parse("1,234,567.5"), Some(1234567.5));
    }

    #[test]
    fn test_edge_punctuation_trimmed() {
        assert_eq!(filter().parse("(12,345)"), Some(12345.0));
        assert_eq!(filter().parse("45%"), Some(45.0));
    }

    #[test]
    fn test_too_few_integer_digits_rejected() {
        assert_eq!(filter().parse("1"), None);
        assert_eq!(filter().parse("3.75"), None);
        assert_eq!(filter().parse("12.5"), Some(12.5));
    }

    #[test]
    fn test_non_numeric_rejected() {
        for token in ["CO2", "Scope", "", "inf", "NaN", "1e5", "12.", ".5", "1.2.3", "--12"] {
            assert_eq!(filter().parse(token), None, "{token}");
        }
    }

    #[test]
    fn test_custom_separator() {
        let config = NumericConfig {
            thousands_separator: ".".into(),
            ..NumericConfig::default()
        };
        let f = NumericFilter::new(&config).unwrap();
        assert_eq!(f.parse("12.345"), Some(12345.0));
    }

    #[test]
    fn test_invalid_year_pattern() {
        let config = NumericConfig {
            year_pattern: "(".into(),
            ..NumericConfig::default()
        };
        assert!(NumericFilter::new(&config).is_err());
    }

    #[test]
    fn test_canonical() {
        assert_eq!(filter().canonical("12,345").as_deref(), Some("12345"));
        assert_eq!(filter().canonical("10.50").as_deref(), Some("10.5"));
        assert_eq!(filter().canonical("abc"), None);
    }
}
