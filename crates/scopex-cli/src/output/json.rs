use scopex_core::error::ScopexError;
use scopex_core::model::DocumentReport;

pub fn print(reports: &[DocumentReport]) -> Result<(), ScopexError> {
    let json = serde_json::to_string_pretty(reports)?;
    println!("{json}");
    Ok(())
}
