use scopex_core::config::builtin;
use scopex_core::error::ScopexError;
use std::path::Path;

pub fn list() -> Result<(), ScopexError> {
    println!("Available predefined configs:\n");
    for name in builtin::PRESETS {
        let config = builtin::load_preset(name)?;
        let groups: Vec<&str> = config.keyword_groups.keys().map(String::as_str).collect();
        println!("  {:<8} {} [{}]", name, config.name, groups.join(", "));
        if let Some(ref desc) = config.description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn show(preset: &str) -> Result<(), ScopexError> {
    let config = builtin::load_preset(preset)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), ScopexError> {
    let config = scopex_core::config::load_config(file)?;

    println!("Config '{}' is valid.", config.name);
    println!("  Keyword groups: {}", config.keyword_groups.len());
    for (group, keywords) in &config.keyword_groups {
        println!("    {:<12} {}", group, keywords.join(" | "));
    }
    println!("  Units: {}", config.units.join(", "));
    println!("  Top values per group: {}", config.top_n);

    // Suspicious but legal settings.
    let mut warnings = Vec::new();
    if config.search_words.is_empty() {
        warnings.push("no search_words: no candidate sentences will be collected".to_string());
    }
    if config.units.is_empty() {
        warnings.push("no units: reports will never carry a unit".to_string());
    }
    for (group, keywords) in &config.keyword_groups {
        for other in config.keyword_groups.keys().filter(|g| *g > group) {
            for keyword in keywords {
                if config.keyword_groups[other].contains(keyword) {
                    warnings.push(format!(
                        "keyword '{}' appears in both '{}' and '{}'",
                        keyword, group, other
                    ));
                }
            }
        }
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
