use crate::config::PeriodConfig;
use crate::error::ScopexError;
use crate::extraction::PageLayout;
use crate::model::Document;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Where the reporting year of a document was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodSource {
    Filename,
    FirstPage,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    /// Four-digit year, e.g. "2021".
    pub year: String,
    pub source: PeriodSource,
}

impl ReportingPeriod {
    /// Equivalent spellings of the period: "2021", "FY21", "FY2021".
    ///
    /// These double as the table-heading keywords of the document.
    pub fn labels(&self) -> Vec<String> {
        let mut suffix: Vec<char> = self.year.chars().rev().take(2).collect();
        suffix.reverse();
        let suffix: String = suffix.into_iter().collect();
        vec![
            self.year.clone(),
            format!("FY{suffix}"),
            format!("FY{}", self.year),
        ]
    }
}

pub struct PeriodResolver {
    year: Regex,
    default_year: String,
}

impl PeriodResolver {
    pub fn new(config: &PeriodConfig) -> Result<Self, ScopexError> {
        let year = Regex::new(&config.year_pattern).map_err(|e| {
            ScopexError::ConfigInvalid(format!(
                "period.year_pattern '{}' is not a valid regex: {e}",
                config.year_pattern
            ))
        })?;
        Ok(PeriodResolver {
            year,
            default_year: config.default_year.clone(),
        })
    }

    /// Filename first, then the first page, then the configured default.
    pub fn resolve(&self, name: &str, first_page: Option<&PageLayout>) -> ReportingPeriod {
        let from_name = self
            .year
            .find_iter(name)
            .map(|m| m.as_str())
            .filter(|candidate| is_year(candidate))
            .last();
        if let Some(year) = from_name {
            return ReportingPeriod {
                year: year.to_string(),
                source: PeriodSource::Filename,
            };
        }

        if let Some(year) = first_page.and_then(year_on_page) {
            return ReportingPeriod {
                year,
                source: PeriodSource::FirstPage,
            };
        }

        ReportingPeriod {
            year: self.default_year.clone(),
            source: PeriodSource::Default,
        }
    }
}

/// Four ASCII digits starting with "20".
fn is_year(s: &str) -> bool {
    s.len() == 4 && s.starts_with("20") && s.bytes().all(|b| b.is_ascii_digit())
}

/// First standalone year token on the page.
fn year_on_page(page: &PageLayout) -> Option<String> {
    page.lines().find_map(|line| {
        line.text()
            .split_whitespace()
            .find(|w| is_year(w))
            .map(str::to_string)
    })
}

/// Resolve the reporting period of a whole document.
pub fn resolve_period(
    document: &Document,
    config: &PeriodConfig,
) -> Result<ReportingPeriod, ScopexError> {
    let resolver = PeriodResolver::new(config)?;
    let first_page = document.pages.iter().min_by_key(|p| p.page_number);
    Ok(resolver.resolve(&document.name, first_page))
}
