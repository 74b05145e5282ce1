use crate::config::schema::ExtractionConfig;
use crate::config::validate_config;
use crate::error::ScopexError;

const GHG_SCOPES_JSON: &str = include_str!("../../../../presets/ghg.json");

/// Available predefined configs.
pub const PRESETS: &[&str] = &["ghg"];

/// Load a predefined config by name.
pub fn load_preset(name: &str) -> Result<ExtractionConfig, ScopexError> {
    match name {
        "ghg" => {
            let config: ExtractionConfig = serde_json::from_str(GHG_SCOPES_JSON)?;
            validate_config(&config)?;
            Ok(config)
        }
        _ => Err(ScopexError::ConfigInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}
