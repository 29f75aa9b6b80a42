use colored::*;
use eyre::Result;

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::Config;

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
    }
}

/// Copy of the config that is safe to print
fn redacted(config: &Config) -> Config {
    let mut shown = config.clone();
    if shown.api.token.is_some() {
        shown.api.token = Some("********".to_string());
    }
    shown
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    let config = redacted(config);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&config)?);
        }
        OutputFormat::Text => {
            println!("{}", "orgcfg Configuration".bold());
            println!();

            println!("{}:", "api".cyan());
            println!("  base_url: {}", config.api.base_url);
            println!(
                "  token: {}",
                config.api.token.as_deref().unwrap_or("(not set)")
            );
            println!("  timeout_secs: {}", config.api.timeout_secs);
            println!("  user_agent: {}", config.api.user_agent);
            println!();

            println!("{}:", "defaults".cyan());
            println!(
                "  organization: {}",
                config.defaults.organization.as_deref().unwrap_or("(not set)")
            );
            println!();

            println!("{}: {}", "log_level".cyan(), config.log_level.as_filter());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_hides_token() {
        let mut config = Config::default();
        config.api.token = Some("sntrys_secret".to_string());

        let shown = redacted(&config);
        assert_eq!(shown.api.token.as_deref(), Some("********"));
        assert!(!serde_json::to_string(&shown).unwrap().contains("sntrys_secret"));
    }

    #[test]
    fn test_redacted_without_token() {
        let shown = redacted(&Config::default());
        assert!(shown.api.token.is_none());
    }
}
