use colored::*;
use eyre::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::adapter::{FrameworkAdapter, FrameworkState, IntegrationIdentity};
use crate::cli::{IdentityArgs, OutputFormat};
use crate::config::Config;
use crate::reconcile::Reconciler;

pub struct ApplyOptions {
    pub identity: IdentityArgs,
    pub data: Option<String>,
    pub file: Option<PathBuf>,
    pub fragment: bool,
    pub id: Option<String>,
    pub format: OutputFormat,
    pub quiet: bool,
}

pub fn run(opts: ApplyOptions, config: &Config) -> Result<()> {
    let organization = config.organization(opts.identity.org.as_deref())?;
    let config_data = load_document(opts.data, opts.file.as_ref())?;

    let state = FrameworkState {
        id: opts.id,
        is_fragment: Some(opts.fragment),
        config_data,
        ..FrameworkState::new(IntegrationIdentity::new(
            organization,
            opts.identity.provider_key,
            opts.identity.name,
        ))
    };

    let reconciler = Reconciler::new(super::connect(config)?, FrameworkAdapter);
    let applied = reconciler
        .apply(&state)
        .context("Failed to update organization integration configuration")?;

    if !opts.quiet && opts.format == OutputFormat::Text {
        let how = if opts.fragment { "Merged into" } else { "Replaced" };
        println!("{} {} integration {}", "✓".green(), how, applied.id.cyan());
    }

    super::print_state(&applied.state, opts.format)
}

fn load_document(data: Option<String>, file: Option<&PathBuf>) -> Result<String> {
    match (data, file) {
        (Some(data), _) => Ok(data),
        (None, Some(path)) => {
            let path = Config::expand_path(path);
            fs::read_to_string(&path).context(format!("Failed to read {}", path.display()))
        }
        (None, None) => eyre::bail!("No configuration document given: pass --data or --file"),
    }
}
