use crate::error::ScopexError;
use crate::extraction::PageLayout;
use crate::period::ReportingPeriod;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A parsed document: its name (file name or path) and its page layouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub pages: Vec<PageLayout>,
}

/// What one page says about one keyword group.
///
/// Value buckets hold canonical numeric strings that passed the plausibility
/// filter. Duplicates are kept; counting happens per document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupFinding {
    /// Number of keyword occurrences (correlation contexts) on the page.
    pub occurrences: usize,
    pub neighbour_values: Vec<String>,
    pub table_values: Vec<String>,
    /// Short candidate sentences that carry a number.
    pub short_texts: Vec<String>,
    /// Longer candidate sentences staged for later semantic matching.
    pub semantic_texts: Vec<String>,
    /// Numbers found inside `short_texts`.
    pub sentence_values: Vec<String>,
}

impl GroupFinding {
    /// All candidate sentences, short ones first.
    pub fn sentences(&self) -> impl Iterator<Item = &String> {
        self.short_texts.iter().chain(&self.semantic_texts)
    }

    pub fn values(&self, bucket: ValueBucket) -> &[String] {
        match bucket {
            ValueBucket::Neighbour => &self.neighbour_values,
            ValueBucket::Table => &self.table_values,
            ValueBucket::Text => &self.sentence_values,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageFinding {
    pub page_number: usize,
    /// Only groups with at least one keyword occurrence or candidate sentence.
    pub groups: BTreeMap<String, GroupFinding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueBucket {
    Neighbour,
    Table,
    Text,
}

impl ValueBucket {
    pub const ALL: [ValueBucket; 3] = [ValueBucket::Neighbour, ValueBucket::Table, ValueBucket::Text];
}

impl fmt::Display for ValueBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueBucket::Neighbour => write!(f, "neighbour"),
            ValueBucket::Table => write!(f, "table"),
            ValueBucket::Text => write!(f, "text"),
        }
    }
}

/// Document-level result for one keyword group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Most frequent values, most frequent first.
    pub values: Vec<String>,
    /// Pages that contributed any value, ascending.
    pub pages: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupReport {
    pub values: Vec<String>,
    pub pages: Vec<usize>,
    pub neighbour: AggregateResult,
    pub table: AggregateResult,
    pub text: AggregateResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFailure {
    pub page_number: usize,
    pub reason: String,
}

/// Final per-document record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReport {
    pub document: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub period: ReportingPeriod,
    pub period_labels: Vec<String>,
    pub unit: Option<String>,
    pub groups: BTreeMap<String, GroupReport>,
    pub pages_processed: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_pages: Vec<PageFailure>,
}

/// Independently computed aggregates, keyed by group.
#[derive(Debug, Clone, Default)]
pub struct GroupAggregates {
    pub combined: BTreeMap<String, AggregateResult>,
    pub neighbour: BTreeMap<String, AggregateResult>,
    pub table: BTreeMap<String, AggregateResult>,
    pub text: BTreeMap<String, AggregateResult>,
}

impl DocumentReport {
    /// Merge aggregates into the final record.
    ///
    /// Every aggregate map must carry exactly the `expected_groups` keys;
    /// anything else is an invariant violation and stops the document.
    pub fn assemble<'g>(
        document: &str,
        label: Option<String>,
        period: ReportingPeriod,
        unit: Option<String>,
        expected_groups: impl IntoIterator<Item = &'g String>,
        mut aggregates: GroupAggregates,
    ) -> Result<DocumentReport, ScopexError> {
        let expected: Vec<&String> = expected_groups.into_iter().collect();
        for map in [
            &aggregates.combined,
            &aggregates.neighbour,
            &aggregates.table,
            &aggregates.text,
        ] {
            let found: Vec<&String> = map.keys().collect();
            if found != expected {
                return Err(ScopexError::GroupMismatch {
                    expected: join_keys(&expected),
                    found: join_keys(&found),
                });
            }
        }

        let mut groups = BTreeMap::new();
        for group in expected {
            let take = |map: &mut BTreeMap<String, AggregateResult>| {
                map.remove(group.as_str()).unwrap_or_default()
            };
            let combined = take(&mut aggregates.combined);
            groups.insert(
                group.clone(),
                GroupReport {
                    values: combined.values,
                    pages: combined.pages,
                    neighbour: take(&mut aggregates.neighbour),
                    table: take(&mut aggregates.table),
                    text: take(&mut aggregates.text),
                },
            );
        }

        let period_labels = period.labels();
        Ok(DocumentReport {
            document: document.to_string(),
            label,
            period,
            period_labels,
            unit,
            groups,
            pages_processed: 0,
            failed_pages: Vec::new(),
        })
    }

    pub fn with_pages(mut self, pages_processed: usize, failed_pages: Vec<PageFailure>) -> Self {
        self.pages_processed = pages_processed;
        self.failed_pages = failed_pages;
        self
    }
}

fn join_keys(keys: &[&String]) -> String {
    keys.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
}
