pub mod builtin;
pub mod schema;

use crate::error::ScopexError;
use regex::Regex;
pub use schema::{ExtractionConfig, NumericConfig, PeriodConfig, Tolerances};
use std::path::Path;

const MAX_COORDINATE_DECIMALS: u32 = 6;

/// Load an extraction config from a JSON file.
pub fn load_config(path: &Path) -> Result<ExtractionConfig, ScopexError> {
    let content = std::fs::read_to_string(path).map_err(|e| ScopexError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_config(&content, path)
}

/// Parse an extraction config from a JSON string.
pub fn parse_config(json: &str, source: &Path) -> Result<ExtractionConfig, ScopexError> {
    let config: ExtractionConfig =
        serde_json::from_str(json).map_err(|e| ScopexError::ConfigLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse an extraction config from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<ExtractionConfig, ScopexError> {
    let config: ExtractionConfig = serde_json::from_str(json).map_err(ScopexError::Json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate that a config is well-formed.
pub fn validate_config(config: &ExtractionConfig) -> Result<(), ScopexError> {
    if config.keyword_groups.is_empty() {
        return Err(ScopexError::ConfigInvalid(
            "keyword_groups must not be empty".into(),
        ));
    }

    for (group, keywords) in &config.keyword_groups {
        if group.trim().is_empty() {
            return Err(ScopexError::ConfigInvalid(
                "keyword group name must not be empty".into(),
            ));
        }
        if keywords.is_empty() {
            return Err(ScopexError::ConfigInvalid(format!(
                "keyword group '{}' has no keywords",
                group
            )));
        }
        if keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ScopexError::ConfigInvalid(format!(
                "keyword group '{}' contains an empty keyword",
                group
            )));
        }
    }

    if config.units.iter().any(|u| u.is_empty()) {
        return Err(ScopexError::ConfigInvalid("units must not be empty strings".into()));
    }

    let tolerances = [
        ("neighbour", config.tolerances.neighbour),
        ("table_x", config.tolerances.table_x),
        ("table_y", config.tolerances.table_y),
    ];
    for (name, value) in tolerances {
        if !value.is_finite() || value < 0.0 {
            return Err(ScopexError::ConfigInvalid(format!(
                "tolerance '{}' must be a finite number >= 0, got {}",
                name, value
            )));
        }
    }

    if config.top_n == 0 {
        return Err(ScopexError::ConfigInvalid("top_n must be at least 1".into()));
    }

    if config.table_heading_max_len == 0 {
        return Err(ScopexError::ConfigInvalid(
            "table_heading_max_len must be at least 1".into(),
        ));
    }

    if config.short_text_max_len == 0 {
        return Err(ScopexError::ConfigInvalid(
            "short_text_max_len must be at least 1".into(),
        ));
    }

    if let Some(decimals) = config.coordinate_decimals {
        if decimals > MAX_COORDINATE_DECIMALS {
            return Err(ScopexError::ConfigInvalid(format!(
                "coordinate_decimals must be at most {}, got {}",
                MAX_COORDINATE_DECIMALS, decimals
            )));
        }
    }

    for (field, pattern) in [
        ("numeric.year_pattern", &config.numeric.year_pattern),
        ("period.year_pattern", &config.period.year_pattern),
    ] {
        if let Err(e) = Regex::new(pattern) {
            return Err(ScopexError::ConfigInvalid(format!(
                "{} '{}' is not a valid regex: {}",
                field, pattern, e
            )));
        }
    }

    let year = &config.period.default_year;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ScopexError::ConfigInvalid(format!(
            "period.default_year '{}' must be a 4-digit year",
            year
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_valid_config() {
        let json = r#"{
            "name": "Test",
            "keyword_groups": { "Scope1": ["Scope 1"] },
            "search_words": ["CO2"],
            "units": ["t", "kt"]
        }"#;
        let config = parse_config_str(json).unwrap();
        assert_eq!(config.name, "Test");
        assert_eq!(config.keyword_groups["Scope1"], vec!["Scope 1"]);
        assert_eq!(config.tolerances, Tolerances::default());
        assert_eq!(config.top_n, 3);
        assert_eq!(config.table_heading_max_len, 12);
    }

    #[test]
    fn test_partial_tolerances_use_defaults() {
        let json = r#"{
            "name": "Test",
            "keyword_groups": { "Scope1": ["Scope 1"] },
            "tolerances": { "neighbour": 2.0 }
        }"#;
        let config = parse_config_str(json).unwrap();
        assert_eq!(config.tolerances.neighbour, 2.0);
        assert_eq!(config.tolerances.table_x, 3.5);
    }

    #[test]
    fn test_empty_groups_rejected() {
        let json = r#"{ "name": "Bad", "keyword_groups": {} }"#;
        assert!(parse_config_str(json).is_err());
    }

    #[test]
    fn test_empty_keyword_rejected() {
        let json = r#"{ "name": "Bad", "keyword_groups": { "Scope1": ["Scope 1", " "] } }"#;
        assert!(parse_config_str(json).is_err());
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let json = r#"{
            "name": "Bad",
            "keyword_groups": { "Scope1": ["Scope 1"] },
            "tolerances": { "table_y": -0.5 }
        }"#;
        assert!(parse_config_str(json).is_err());
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let json = r#"{
            "name": "Bad",
            "keyword_groups": { "Scope1": ["Scope 1"] },
            "period": { "year_pattern": "20[" }
        }"#;
        assert!(parse_config_str(json).is_err());
    }

    #[test]
    fn test_bad_default_year_rejected() {
        let json = r#"{
            "name": "Bad",
            "keyword_groups": { "Scope1": ["Scope 1"] },
            "period": { "default_year": "FY21" }
        }"#;
        assert!(parse_config_str(json).is_err());
    }

    #[test]
    fn test_sentence_and_rounding_defaults() {
        let json = r#"{ "name": "Test", "keyword_groups": { "Scope1": ["Scope 1"] } }"#;
        let config = parse_config_str(json).unwrap();
        assert_eq!(config.short_text_max_len, 50);
        assert_eq!(config.coordinate_decimals, Some(1));

        let json = r#"{
            "name": "Test",
            "keyword_groups": { "Scope1": ["Scope 1"] },
            "coordinate_decimals": null
        }"#;
        assert_eq!(parse_config_str(json).unwrap().coordinate_decimals, None);
    }

    #[test]
    fn test_out_of_range_decimals_rejected() {
        let json = r#"{
            "name": "Bad",
            "keyword_groups": { "Scope1": ["Scope 1"] },
            "coordinate_decimals": 12
        }"#;
        assert!(parse_config_str(json).is_err());
    }

    #[test]
    fn test_default_year_patterns_are_ascii_only() {
        let config = NumericConfig::default();
        let re = Regex::new(&config.year_pattern).unwrap();
        assert!(re.is_match("2021"));
        assert!(!re.is_match("20\u{0968}\u{0967}"));

        let re = Regex::new(&PeriodConfig::default().year_pattern).unwrap();
        assert!(!re.is_match("report_20\u{0968}\u{0967}.pdf"));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "name": "File", "keyword_groups": {{ "Scope2": ["Scope 2"] }}, "top_n": 1 }}"#
        )
        .unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.name, "File");
        assert_eq!(config.top_n, 1);
    }

    #[test]
    fn test_load_config_reports_path() {
        let err = load_config(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ScopexError::ConfigLoad { .. }));
    }
}
