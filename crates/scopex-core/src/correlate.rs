//! Spatial correlation of keyword occurrences with nearby numeric values.
//!
//! Every page is processed in passes over a flattened [`PageIndex`]:
//!
//! 1. locate keyword occurrences (one [`CorrelationContext`] each) and the
//!    x-extent of compact table-heading cells ("2021", "FY21");
//! 2. register every heading column on every context;
//! 3. scan all words and record the plausible numbers that fall inside a
//!    context's neighbour windows or its table row/column intersection.
//!
//! Candidate sentences are harvested per text container independently of
//! geometry. Contexts never outlive the page that created them.

use crate::config::{ExtractionConfig, Tolerances};
use crate::error::ScopexError;
use crate::extraction::{BBox, LineElement, PageLayout, TextLine};
use crate::geometry::{expand_interval, expand_table_x, Interval, WindowSet};
use crate::locator::{line_words, locate_keywords, Word};
use crate::model::{GroupFinding, PageFinding};
use crate::numeric::NumericFilter;
use crate::sentences::{matching_sentences, sentence_values, split_by_length};
use std::collections::{BTreeMap, HashSet};

/// Per-occurrence state: the tolerance windows around one keyword box and
/// the values collected for it.
#[derive(Debug, Clone)]
pub struct CorrelationContext {
    neighbour_x: WindowSet,
    neighbour_y: WindowSet,
    table_x: WindowSet,
    table_y: WindowSet,
    neighbour_values: Vec<String>,
    table_values: Vec<String>,
}

impl CorrelationContext {
    /// Seed a context with the neighbour windows and table-row window of `base`.
    pub fn new(base: BBox, tolerances: &Tolerances) -> Self {
        CorrelationContext {
            neighbour_x: WindowSet::single(expand_interval(base.x0, base.x1, tolerances.neighbour)),
            neighbour_y: WindowSet::single(expand_interval(base.y0, base.y1, tolerances.neighbour)),
            table_x: WindowSet::new(),
            table_y: WindowSet::single(expand_interval(base.y0, base.y1, tolerances.table_y)),
            neighbour_values: Vec::new(),
            table_values: Vec::new(),
        }
    }

    /// Register the column of a table heading found on the same page.
    pub fn register_table_heading(&mut self, heading_x: Interval, table_x_tolerance: f64) {
        self.table_x
            .push(expand_table_x(heading_x.lo, heading_x.hi, table_x_tolerance));
    }

    /// Inside the neighbour x window OR the neighbour y window.
    pub fn is_neighbour(&self, bbox: &BBox) -> bool {
        self.neighbour_x.contains(bbox.x0, bbox.x1) || self.neighbour_y.contains(bbox.y0, bbox.y1)
    }

    /// Inside a heading column AND the keyword's row.
    pub fn is_table_value(&self, bbox: &BBox) -> bool {
        self.table_x.contains(bbox.x0, bbox.x1) && self.table_y.contains(bbox.y0, bbox.y1)
    }

    pub fn neighbour_values(&self) -> &[String] {
        &self.neighbour_values
    }

    pub fn table_values(&self) -> &[String] {
        &self.table_values
    }
}

struct IndexedLine<'a> {
    line: &'a TextLine,
    text: String,
}

/// Flattened view of one page, built once and reused by every pass.
pub struct PageIndex<'a> {
    page_number: usize,
    lines: Vec<IndexedLine<'a>>,
    words: Vec<Word>,
    container_texts: Vec<String>,
}

impl<'a> PageIndex<'a> {
    /// Index a page, rounding word boxes to `decimals` places when set.
    ///
    /// Fails if any glyph carries non-finite coordinates.
    pub fn build(page: &'a PageLayout, decimals: Option<u32>) -> Result<PageIndex<'a>, ScopexError> {
        let mut lines = Vec::new();
        let mut words = Vec::new();
        let mut container_texts = Vec::with_capacity(page.containers.len());

        for container in &page.containers {
            for line in &container.lines {
                check_line_geometry(page.page_number, line)?;
                words.extend(line_words(line).into_iter().map(|word| Word {
                    bbox: round_box(word.bbox, decimals),
                    ..word
                }));
                lines.push(IndexedLine {
                    line,
                    text: line.text(),
                });
            }
            container_texts.push(container.text());
        }

        Ok(PageIndex {
            page_number: page.page_number,
            lines,
            words,
            container_texts,
        })
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }
}

fn round_box(bbox: BBox, decimals: Option<u32>) -> BBox {
    match decimals {
        Some(d) => bbox.rounded(d),
        None => bbox,
    }
}

fn check_line_geometry(page: usize, line: &TextLine) -> Result<(), ScopexError> {
    for element in &line.elements {
        if let LineElement::Glyph { text, bbox } = element {
            let coords = [bbox.x0, bbox.y0, bbox.x1, bbox.y1];
            if coords.iter().any(|v| !v.is_finite()) {
                return Err(ScopexError::MalformedPage {
                    page,
                    reason: format!("glyph '{}' has non-finite coordinates {:?}", text, coords),
                });
            }
        }
    }
    Ok(())
}

/// Correlates keyword groups with values on single pages.
///
/// Holds only read-only state, so one correlator can serve many pages
/// (and threads).
pub struct Correlator<'c> {
    config: &'c ExtractionConfig,
    filter: NumericFilter,
    table_headings: Vec<String>,
}

impl<'c> Correlator<'c> {
    /// `table_headings` are the column labels of the reporting period.
    pub fn new(config: &'c ExtractionConfig, table_headings: Vec<String>) -> Result<Self, ScopexError> {
        Ok(Correlator {
            config,
            filter: NumericFilter::new(&config.numeric)?,
            table_headings,
        })
    }

    pub fn correlate(&self, page: &PageLayout) -> Result<PageFinding, ScopexError> {
        let index = PageIndex::build(page, self.config.coordinate_decimals)?;
        let headings = self.heading_columns(&index);

        let mut groups = BTreeMap::new();
        for (group, keywords) in &self.config.keyword_groups {
            if let Some(finding) = self.correlate_group(&index, keywords, &headings) {
                groups.insert(group.clone(), finding);
            }
        }

        tracing::debug!(
            page = index.page_number(),
            words = index.words().len(),
            headings = headings.len(),
            groups = groups.len(),
            "correlated page"
        );

        Ok(PageFinding {
            page_number: index.page_number(),
            groups,
        })
    }

    /// x-extents of table-heading occurrences on compact lines.
    fn heading_columns(&self, index: &PageIndex<'_>) -> Vec<Interval> {
        let mut columns = Vec::new();
        for line in &index.lines {
            if line.text.trim().chars().count() >= self.config.table_heading_max_len {
                continue;
            }
            for bbox in locate_keywords(line.line, &self.table_headings) {
                columns.push(round_box(bbox, self.config.coordinate_decimals).x_interval());
            }
        }
        columns
    }

    fn correlate_group(
        &self,
        index: &PageIndex<'_>,
        keywords: &[String],
        headings: &[Interval],
    ) -> Option<GroupFinding> {
        let tolerances = &self.config.tolerances;

        let mut contexts: Vec<CorrelationContext> = index
            .lines
            .iter()
            .flat_map(|line| locate_keywords(line.line, keywords))
            .map(|bbox| round_box(bbox, self.config.coordinate_decimals))
            .map(|bbox| CorrelationContext::new(bbox, tolerances))
            .collect();

        // A context cannot know which column applies to it.
        for context in &mut contexts {
            for heading in headings {
                context.register_table_heading(*heading, tolerances.table_x);
            }
        }

        for word in &index.words {
            let Some(value) = self.filter.canonical(&word.text) else {
                continue;
            };
            for context in &mut contexts {
                if context.is_table_value(&word.bbox) {
                    context.table_values.push(value.clone());
                }
                if context.is_neighbour(&word.bbox) {
                    context.neighbour_values.push(value.clone());
                }
            }
        }

        let mut seen = HashSet::new();
        let mut sentences = Vec::new();
        for text in &index.container_texts {
            for sentence in matching_sentences(text, keywords, &self.config.search_words) {
                if seen.insert(sentence.clone()) {
                    sentences.push(sentence);
                }
            }
        }

        if contexts.is_empty() && sentences.is_empty() {
            return None;
        }

        let (short_texts, semantic_texts) =
            split_by_length(sentences, self.config.short_text_max_len);
        let excluded: Vec<&String> = keywords.iter().chain(&self.table_headings).collect();
        let sentence_numbers = sentence_values(&short_texts, &excluded, &self.filter);

        Some(GroupFinding {
            occurrences: contexts.len(),
            neighbour_values: contexts
                .iter()
                .flat_map(|c| c.neighbour_values().iter().cloned())
                .collect(),
            table_values: contexts
                .iter()
                .flat_map(|c| c.table_values().iter().cloned())
                .collect(),
            short_texts,
            semantic_texts,
            sentence_values: sentence_numbers,
        })
    }
}

/// Correlate a single page with a one-off correlator.
pub fn correlate(
    page: &PageLayout,
    config: &ExtractionConfig,
    table_headings: &[String],
) -> Result<PageFinding, ScopexError> {
    Correlator::new(config, table_headings.to_vec())?.correlate(page)
}
