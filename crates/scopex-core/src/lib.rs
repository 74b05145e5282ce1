pub mod aggregate;
pub mod config;
pub mod correlate;
pub mod error;
pub mod extraction;
pub mod geometry;
pub mod locator;
pub mod model;
pub mod numeric;
pub mod period;
pub mod sentences;
pub mod unit;

use config::{validate_config, ExtractionConfig};
use correlate::Correlator;
use error::ScopexError;
use extraction::{PageLayout, PdfExtractor};
use model::{Document, DocumentReport, PageFailure, PageFinding};

/// Main API entry point: extract reported figures from a PDF.
///
/// The extractor turns the bytes into page layouts; everything after that
/// is [`extract_document`].
pub fn extract_pdf(
    name: &str,
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    config: &ExtractionConfig,
) -> Result<DocumentReport, ScopexError> {
    let pages = extractor.extract_pages(pdf_bytes)?;
    tracing::debug!(
        document = name,
        backend = extractor.backend_name(),
        pages = pages.len(),
        "extracted page layouts"
    );
    let document = Document {
        name: name.to_string(),
        pages,
    };
    extract_document(&document, config)
}

/// Run correlation and aggregation over an already extracted document.
///
/// A page that cannot be correlated is logged, recorded in
/// `failed_pages` and left out; the other pages still count.
pub fn extract_document(
    document: &Document,
    config: &ExtractionConfig,
) -> Result<DocumentReport, ScopexError> {
    validate_config(config)?;

    let period = period::resolve_period(document, &config.period)?;
    tracing::debug!(document = %document.name, year = %period.year, source = ?period.source, "resolved reporting period");

    let correlator = Correlator::new(config, period.labels())?;
    let outcomes = correlate_pages(&correlator, &document.pages);

    let mut findings = Vec::with_capacity(outcomes.len());
    let mut failed_pages = Vec::new();
    for (page_number, outcome) in outcomes {
        match outcome {
            Ok(finding) => findings.push(finding),
            Err(e) => {
                tracing::warn!(document = %document.name, page = page_number, error = %e, "skipping page");
                failed_pages.push(PageFailure {
                    page_number,
                    reason: e.to_string(),
                });
            }
        }
    }

    let groups = config.keyword_groups.keys();
    let aggregates = aggregate::aggregate_all(&findings, groups.clone(), config.top_n);

    let sentences: Vec<&String> = findings
        .iter()
        .flat_map(|f| f.groups.values())
        .flat_map(|g| g.sentences())
        .collect();
    let unit = unit::classify_unit(&sentences, &config.units);

    let report = DocumentReport::assemble(
        &document.name,
        config.label.clone(),
        period,
        unit,
        groups,
        aggregates,
    )?
    .with_pages(findings.len(), failed_pages);

    tracing::info!(
        document = %report.document,
        pages = report.pages_processed,
        failed = report.failed_pages.len(),
        unit = report.unit.as_deref().unwrap_or("-"),
        "extraction complete"
    );

    Ok(report)
}

type PageOutcome = (usize, Result<PageFinding, ScopexError>);

#[cfg(not(feature = "parallel"))]
fn correlate_pages(correlator: &Correlator<'_>, pages: &[PageLayout]) -> Vec<PageOutcome> {
    pages
        .iter()
        .map(|page| (page.page_number, correlator.correlate(page)))
        .collect()
}

/// Pages are independent; results come back in input order.
#[cfg(feature = "parallel")]
fn correlate_pages(correlator: &Correlator<'_>, pages: &[PageLayout]) -> Vec<PageOutcome> {
    use rayon::prelude::*;

    pages
        .par_iter()
        .map(|page| (page.page_number, correlator.correlate(page)))
        .collect()
}
