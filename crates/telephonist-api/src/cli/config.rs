//! `telephonist config` -- print the effective configuration.
//!
//! Secrets are never printed: the translator key is skipped during
//! serialization and only reported as present or absent.

use std::path::Path;

use telephonist_types::config::TelephonistConfig;

pub fn show_config(
    config: &TelephonistConfig,
    source: Option<&Path>,
    data_dir: &Path,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        let mut value = serde_json::to_value(config)?;
        value["translator"]["api_key_set"] = config.translator.api_key.is_some().into();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let source = source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| format!("{} (default)", data_dir.join("config.toml").display()));

    println!();
    println!("  {} {}", console::style("config:").bold(), source);
    println!("  {} {}", console::style("data dir:").bold(), data_dir.display());
    println!(
        "  {} {}",
        console::style("translator key:").bold(),
        if config.translator.api_key.is_some() {
            console::style("set").green()
        } else {
            console::style("missing").red()
        }
    );
    println!();
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
