pub mod apply;
pub mod completions;
pub mod config;
pub mod delete;
pub mod id;
pub mod read;
pub mod sync;

use colored::*;
use eyre::{Context, Result};
use serde::Serialize;

use crate::adapter::FrameworkState;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::reconcile::document;
use crate::remote::{ConfigDocument, ConfigValue, HttpClient};

/// Build the HTTP client from the loaded configuration
pub fn connect(config: &Config) -> Result<HttpClient> {
    log::debug!("Connecting to {}", config.api.normalized_base_url());
    HttpClient::new(&config.api).context("Failed to create API client")
}

/// Printable form of a framework state with the document parsed
#[derive(Serialize)]
struct StateView<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    organization: &'a str,
    provider_key: &'a str,
    name: &'a str,
    is_fragment: bool,
    config: ConfigDocument,
}

pub fn print_state(state: &FrameworkState, format: OutputFormat) -> Result<()> {
    let view = StateView {
        id: state.id.as_deref(),
        organization: &state.organization,
        provider_key: &state.provider_key,
        name: &state.name,
        is_fragment: state.is_fragment.unwrap_or(false),
        config: document::from_json(&state.config_data).context("Failed to parse configuration document")?,
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&view)?);
        }
        OutputFormat::Text => {
            println!("{} {}", view.name.bold(), format!("({})", view.provider_key).dimmed());
            if let Some(id) = view.id {
                println!("  {}: {}", "id".cyan(), id);
            }
            println!("  {}: {}", "organization".cyan(), view.organization);
            if view.is_fragment {
                println!("  {}: {}", "fragment".cyan(), "yes".yellow());
            }
            println!("  {}:", "config".cyan());
            print_document(&view.config, 4);
        }
    }

    Ok(())
}

/// Indented key/value listing of a document
pub fn print_document(document: &ConfigDocument, indent: usize) {
    let pad = " ".repeat(indent);
    if document.is_empty() {
        println!("{}{}", pad, "(empty)".dimmed());
        return;
    }

    for (key, value) in document {
        match value {
            ConfigValue::Text(text) => println!("{}{}: {}", pad, key, text),
            ConfigValue::Map(map) => {
                println!("{}{}:", pad, key);
                for (inner_key, inner_value) in map {
                    println!("{}  {}: {}", pad, inner_key, inner_value);
                }
            }
            ConfigValue::Other(other) => println!("{}{}: {}", pad, key, other),
        }
    }
}
