use scopex_core::config::{builtin, load_config, ExtractionConfig};
use scopex_core::error::ScopexError;
use scopex_core::extraction::pdftotext::PdftotextExtractor;
use scopex_core::model::DocumentReport;
use std::path::PathBuf;

use crate::output;

const DEFAULT_PRESET: &str = "ghg";

pub fn run(
    files: Vec<PathBuf>,
    config_file: Option<PathBuf>,
    preset: Option<String>,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), ScopexError> {
    let config: ExtractionConfig = match (config_file, preset) {
        (Some(path), _) => load_config(&path)?,
        (None, Some(name)) => builtin::load_preset(&name)?,
        (None, None) => builtin::load_preset(DEFAULT_PRESET)?,
    };

    let extractor = PdftotextExtractor::new();
    let mut reports: Vec<DocumentReport> = Vec::new();
    let mut failed = 0usize;

    for path in &files {
        let name = path.display().to_string();
        tracing::info!(file = %name, config = %config.name, "extracting");
        let result = std::fs::read(path)
            .map_err(ScopexError::from)
            .and_then(|bytes| scopex_core::extract_pdf(&name, &bytes, &extractor, &config));

        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                // One bad file must not stop the batch.
                eprintln!("Error: {}: {}", name, e);
                failed += 1;
            }
        }
    }

    match output_format {
        "json" => output::json::print(&reports)?,
        _ => output::table::print(&reports),
    }

    if let Some(path) = output_file {
        let json = serde_json::to_string_pretty(&reports)?;
        std::fs::write(&path, json)?;
        eprintln!(
            "Extracted {} document(s), written to {}",
            reports.len(),
            path.display()
        );
    }

    if failed > 0 && reports.is_empty() {
        return Err(ScopexError::Extraction(format!(
            "all {} input file(s) failed",
            failed
        )));
    }

    Ok(())
}
