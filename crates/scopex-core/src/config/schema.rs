use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the extractor needs to search one kind of document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Static descriptive field copied onto every document report.
    #[serde(default)]
    pub label: Option<String>,
    /// Group name -> synonymous keywords searched as one target.
    pub keyword_groups: BTreeMap<String, Vec<String>>,
    /// A candidate sentence must contain at least one of these.
    #[serde(default)]
    pub search_words: Vec<String>,
    /// Candidate units, in priority order for ties.
    #[serde(default)]
    pub units: Vec<String>,
    #[serde(default)]
    pub tolerances: Tolerances,
    /// Lines at least this long are never treated as table headings.
    #[serde(default = "default_table_heading_max_len")]
    pub table_heading_max_len: usize,
    /// Candidate sentences shorter than this (in characters) that carry a
    /// digit are mined for values; longer ones are kept for semantic matching.
    #[serde(default = "default_short_text_max_len")]
    pub short_text_max_len: usize,
    /// Glyph coordinates are rounded to this many decimals before any
    /// window test. `null` disables rounding.
    #[serde(default = "default_coordinate_decimals")]
    pub coordinate_decimals: Option<u32>,
    #[serde(default)]
    pub numeric: NumericConfig,
    #[serde(default)]
    pub period: PeriodConfig,
    /// Number of most frequent values kept per keyword group.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

/// Window expansion ratios, relative to the size of the base box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    pub neighbour: f64,
    pub table_x: f64,
    pub table_y: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Tolerances {
            neighbour: 0.75,
            table_x: 3.5,
            table_y: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericConfig {
    pub thousands_separator: String,
    /// Tokens matching this are years, never values.
    pub year_pattern: String,
    pub min_integer_digits: usize,
    /// Treat "5.0"-style tokens as noise.
    pub reject_single_digit_point_zero: bool,
}

impl Default for NumericConfig {
    fn default() -> Self {
        NumericConfig {
            thousands_separator: ",".into(),
            year_pattern: r"^20[0-9]{2}$".into(),
            min_integer_digits: 2,
            reject_single_digit_point_zero: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodConfig {
    /// Searched in the document name; the last match wins.
    pub year_pattern: String,
    pub default_year: String,
}

impl Default for PeriodConfig {
    fn default() -> Self {
        PeriodConfig {
            year_pattern: "20[0-9]{2}".into(),
            default_year: "2021".into(),
        }
    }
}

fn default_table_heading_max_len() -> usize {
    12
}

fn default_short_text_max_len() -> usize {
    50
}

fn default_coordinate_decimals() -> Option<u32> {
    Some(1)
}

fn default_top_n() -> usize {
    3
}
