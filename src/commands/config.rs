//! Configuration commands

use anyhow::Result;
use colored::Colorize;

use crate::config::MeasuresConfig;

const REDACTED: &str = "***";

/// Print the effective configuration
pub fn cmd_config_show() -> Result<()> {
    let config = MeasuresConfig::load()?;
    let path = MeasuresConfig::config_path()?;

    let origin = if MeasuresConfig::exists() {
        path.display().to_string()
    } else {
        "defaults (no config file)".to_string()
    };
    println!("{} {}", "#".dimmed(), origin.dimmed());
    print!("{}", toml::to_string_pretty(&redacted(config))?);
    Ok(())
}

/// Mask the source token so it never reaches the terminal
fn redacted(mut config: MeasuresConfig) -> MeasuresConfig {
    if config.source.token.is_some() {
        config.source.token = Some(REDACTED.to_string());
    }
    config
}

/// Print the configuration file location
pub fn cmd_config_path() -> Result<()> {
    println!("{}", MeasuresConfig::config_path()?.display());
    Ok(())
}

/// Write a default configuration file
pub fn cmd_config_init(force: bool) -> Result<()> {
    let path = MeasuresConfig::config_path()?;
    if MeasuresConfig::exists() && !force {
        println!(
            "{} Config already exists at {}",
            "!".yellow(),
            path.display()
        );
        println!("  Use {} to overwrite it", "measures config init --force".cyan());
        return Ok(());
    }

    MeasuresConfig::default().save()?;
    tracing::info!(path = %path.display(), "wrote default config");
    println!("{} Config written to {}", "+".green(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_masks_token() {
        let mut config = MeasuresConfig::default();
        config.source.url = Some("https://sonar.example.com".into());
        config.source.token = Some("squ_secret".into());

        let shown = toml::to_string_pretty(&redacted(config)).unwrap();
        assert!(shown.contains("token = \"***\""));
        assert!(!shown.contains("squ_secret"));
        assert!(shown.contains("https://sonar.example.com"));
    }

    #[test]
    fn test_show_without_token_omits_it() {
        let shown = toml::to_string_pretty(&redacted(MeasuresConfig::default())).unwrap();
        assert!(!shown.contains("token"));
    }
}
