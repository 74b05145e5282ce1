use scopex_core::error::ScopexError;
use scopex_core::extraction::pdftotext::PdftotextExtractor;
use scopex_core::extraction::PdfExtractor;
use std::path::PathBuf;

use crate::output;

pub fn run(pdf_file: PathBuf, output_format: &str) -> Result<(), ScopexError> {
    let pdf_bytes = std::fs::read(&pdf_file)?;
    let extractor = PdftotextExtractor::new();
    let pages = extractor.extract_pages(&pdf_bytes)?;

    match output_format {
        "json" => println!("{}", serde_json::to_string_pretty(&pages)?),
        _ => println!("{}", output::table::format_layout(&pages)),
    }

    Ok(())
}
